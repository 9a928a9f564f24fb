//! Activity log entity.

pub mod model;

pub use model::{ActivityLogEntry, CreateActivityLogEntry};
