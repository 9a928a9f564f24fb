//! Permission (share capability) entity.

pub mod model;
pub mod role;

pub use model::{CreatePermission, Permission};
pub use role::ShareRole;
