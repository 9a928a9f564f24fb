//! File version entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable version of a file's content.
///
/// Version rows are append-only: one row per content-changing operation,
/// `version_number` strictly increasing per file starting at 1. Normal
/// operations never update or delete them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// The file this version belongs to.
    pub file_id: Uuid,
    /// Version number (1-based, strictly increasing per file).
    pub version_number: i32,
    /// The path of the version artifact within the blob store.
    pub blob_path: String,
    /// Size of the version artifact in bytes.
    pub size_bytes: i64,
    /// MIME type of the version artifact.
    pub mime_type: Option<String>,
    /// The user who produced this version (None = shared-link edit).
    pub created_by: Option<Uuid>,
    /// When the version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new file version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileVersion {
    /// The file this version belongs to.
    pub file_id: Uuid,
    /// Version number.
    pub version_number: i32,
    /// Blob store path of the version artifact.
    pub blob_path: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// The user who produced this version (None = shared-link edit).
    pub created_by: Option<Uuid>,
}
