//! File entity and its version history.

pub mod model;
pub mod version;

pub use model::{CreateFile, File};
pub use version::{CreateFileVersion, FileVersion};
