//! Append-only file version ledger.

use std::sync::Arc;

use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::repositories::version::VersionStore;
use nimbus_entity::file::version::{CreateFileVersion, FileVersion};

/// Appends and reads immutable [`FileVersion`] rows.
///
/// Version numbers are strictly increasing per file, starting at 1; the
/// next number is derived from the current maximum at append time.
pub struct VersionLedger {
    /// Version store.
    versions: Arc<dyn VersionStore>,
}

impl std::fmt::Debug for VersionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionLedger").finish()
    }
}

impl VersionLedger {
    /// Creates a new version ledger.
    pub fn new(versions: Arc<dyn VersionStore>) -> Self {
        Self { versions }
    }

    /// Append the next version of a file.
    ///
    /// `created_by = None` marks a shared-link edit.
    pub async fn append(
        &self,
        file_id: Uuid,
        blob_path: &str,
        size_bytes: i64,
        mime_type: Option<&str>,
        created_by: Option<Uuid>,
    ) -> AppResult<FileVersion> {
        let next = self
            .versions
            .max_version_number(file_id)
            .await?
            .unwrap_or(0)
            + 1;

        self.versions
            .insert(&CreateFileVersion {
                file_id,
                version_number: next,
                blob_path: blob_path.to_string(),
                size_bytes,
                mime_type: mime_type.map(str::to_string),
                created_by,
            })
            .await
    }

    /// All versions of a file, newest first.
    pub async fn list(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        self.versions.list_for_file(file_id).await
    }

    /// A specific version of a file.
    pub async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<FileVersion> {
        self.versions
            .find(file_id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_number} of file {file_id} not found"))
            })
    }

    /// Remove a version row that a failed saga just appended.
    ///
    /// This is a compensating action, not part of the normal lifecycle;
    /// ledger rows are otherwise never deleted.
    pub async fn discard(&self, version_id: Uuid) -> AppResult<bool> {
        self.versions.remove(version_id).await
    }
}
