//! The versioned edit saga, driven by an edit-capable share token.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_entity::file::version::FileVersion;
use nimbus_entity::file::File;

use super::compensation::CompensationStack;
use super::paths;
use super::SagaOrchestrator;

/// Result of a completed versioned edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    /// The file after the edit.
    pub file: File,
    /// The version snapshot taken before the edit was applied.
    pub version: FileVersion,
}

impl SagaOrchestrator {
    /// Rename a file through an edit-capable share token, snapshotting
    /// the current content as a new version first.
    ///
    /// Resolving the token counts one access against its cap. The
    /// current blob is re-uploaded under a version path and a ledger
    /// row appended (with no creator, marking a shared-link edit)
    /// before the rename lands; if the rename fails, both are undone.
    pub async fn versioned_edit(&self, share_token: &str, new_name: &str) -> AppResult<EditOutcome> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let access = self.shares.resolve_for_edit(share_token).await?;
        let file = access.file;

        let data = self.blob.get(&file.blob_path).await?;
        let version_path = paths::version_path(file.owner_id, &file.name, Utc::now());
        let size_bytes = data.len() as i64;

        self.blob
            .put(&version_path, data, file.mime_type.as_deref())
            .await?;

        let mut comp = CompensationStack::new();
        comp.push("remove version blob", {
            let blob = Arc::clone(&self.blob);
            let path = version_path.clone();
            async move { blob.delete(&[path]).await }
        });

        let version = match self
            .ledger
            .append(
                file.id,
                &version_path,
                size_bytes,
                file.mime_type.as_deref(),
                None,
            )
            .await
        {
            Ok(version) => version,
            Err(e) => return Err(comp.abort(e).await),
        };
        comp.push("remove version row", {
            let ledger = Arc::clone(&self.ledger);
            let version_id = version.id;
            async move { ledger.discard(version_id).await.map(|_| ()) }
        });

        let updated = match self.files.rename(file.id, new_name).await {
            Ok(file) => file,
            Err(e) => return Err(comp.abort(e).await),
        };

        self.activity.record(
            None,
            Some(updated.id),
            "edit",
            Some(format!(
                "Renamed to '{}' via shared link (version {})",
                updated.name, version.version_number
            )),
        );
        info!(
            file_id = %updated.id,
            version = version.version_number,
            "Versioned edit completed"
        );

        Ok(EditOutcome {
            file: updated,
            version,
        })
    }
}
