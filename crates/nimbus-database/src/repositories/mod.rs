//! Metadata store interfaces and their PostgreSQL implementations.
//!
//! Each module defines the trait the services program against plus the
//! `Pg*Repository` struct backing it. In-memory doubles used by the service
//! tests implement the same traits.

pub mod activity;
pub mod clipboard;
pub mod file;
pub mod folder;
pub mod permission;
pub mod version;

pub use activity::{ActivityStore, PgActivityRepository};
pub use clipboard::{ClipboardStore, PgClipboardRepository};
pub use file::{FileStore, PgFileRepository};
pub use folder::{FolderStore, PgFolderRepository};
pub use permission::{PermissionStore, PgPermissionRepository};
pub use version::{PgVersionRepository, VersionStore};
