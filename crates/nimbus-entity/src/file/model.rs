//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in Nimbus.
///
/// The bytes live in the blob store under `blob_path`; this row is the
/// metadata-store half. A live (non-deleted) file's `blob_path` must
/// resolve in the blob store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// The path within the blob store.
    pub blob_path: String,
    /// The file owner.
    pub owner_id: Uuid,
    /// The containing folder (None = root level).
    pub folder_id: Option<Uuid>,
    /// Whether the file is publicly visible.
    pub is_public: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was soft-deleted (None = live). Set at most once.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    /// Check if the file has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// The path within the blob store.
    pub blob_path: String,
    /// The file owner.
    pub owner_id: Uuid,
    /// The containing folder.
    pub folder_id: Option<Uuid>,
    /// Whether the file is publicly visible.
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> File {
        File {
            id: Uuid::new_v4(),
            name: "report.pdf".to_string(),
            size_bytes: 1024,
            mime_type: Some("application/pdf".to_string()),
            blob_path: "u/1_report.pdf".to_string(),
            owner_id: Uuid::new_v4(),
            folder_id: None,
            is_public: false,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_extension() {
        let file = sample();
        assert_eq!(file.extension().as_deref(), Some("pdf"));

        let mut no_ext = sample();
        no_ext.name = "README".to_string();
        assert_eq!(no_ext.extension(), None);
    }

    #[test]
    fn test_is_deleted() {
        let mut file = sample();
        assert!(!file.is_deleted());
        file.deleted_at = Some(Utc::now());
        assert!(file.is_deleted());
    }
}
