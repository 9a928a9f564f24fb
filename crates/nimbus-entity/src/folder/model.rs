//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in the Nimbus hierarchy.
///
/// The parent chain must stay acyclic; a folder cannot be soft-deleted
/// while it still has live children.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: Uuid,
    /// The parent folder (None = root level).
    pub parent_id: Option<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was soft-deleted (None = live).
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Check if the folder has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new folder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: Uuid,
    /// The parent folder.
    pub parent_id: Option<Uuid>,
}
