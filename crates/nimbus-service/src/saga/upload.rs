//! The upload saga.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_entity::file::{CreateFile, File};
use nimbus_entity::permission::{CreatePermission, ShareRole};

use super::compensation::CompensationStack;
use super::paths;
use super::SagaOrchestrator;

/// Parameters for an upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Original file name.
    pub name: String,
    /// MIME type, if the client supplied one.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
    /// Destination folder; `None` is the root.
    pub folder_id: Option<Uuid>,
}

/// Result of a completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// The created file record.
    pub file: File,
    /// URL for fetching the content.
    pub url: String,
}

impl SagaOrchestrator {
    /// Upload a new file.
    ///
    /// Steps: validate the destination folder, insert the file row,
    /// write the content blob, insert the owner grant. Each completed
    /// step is compensated in reverse if a later one fails, so a failed
    /// upload leaves no visible file row and no orphaned owner blob.
    /// The version-1 artifact and ledger row are best effort and never
    /// fail the upload.
    pub async fn upload(&self, owner_id: Uuid, params: UploadParams) -> AppResult<UploadOutcome> {
        if params.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        if let Some(folder_id) = params.folder_id {
            self.require_owned_folder(folder_id, owner_id).await?;
        }

        let now = Utc::now();
        let blob_path = paths::content_path(owner_id, &params.name, now);
        let size_bytes = params.data.len() as i64;

        let file = self
            .files
            .insert(&CreateFile {
                name: params.name.clone(),
                size_bytes,
                mime_type: params.mime_type.clone(),
                blob_path: blob_path.clone(),
                owner_id,
                folder_id: params.folder_id,
                is_public: false,
            })
            .await?;

        let mut comp = CompensationStack::new();
        comp.push("remove file row", {
            let files = Arc::clone(&self.files);
            let file_id = file.id;
            async move { files.remove(file_id).await.map(|_| ()) }
        });

        if let Err(e) = self
            .blob
            .put(&blob_path, params.data.clone(), params.mime_type.as_deref())
            .await
        {
            return Err(comp.abort(e).await);
        }
        comp.push("remove content blob", {
            let blob = Arc::clone(&self.blob);
            let path = blob_path.clone();
            async move { blob.delete(&[path]).await }
        });

        let url = match self.blob.url_for(&blob_path).await {
            Ok(url) => url,
            Err(e) => return Err(comp.abort(e).await),
        };

        // Version 1 artifact; the upload stands even if this fails.
        let version_path = paths::version_path(owner_id, &file.name, now);
        let version_written = match self
            .blob
            .put(&version_path, params.data.clone(), params.mime_type.as_deref())
            .await
        {
            Ok(()) => {
                comp.push("remove version blob", {
                    let blob = Arc::clone(&self.blob);
                    let path = version_path.clone();
                    async move { blob.delete(&[path]).await }
                });
                true
            }
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Version artifact write failed; upload continues");
                false
            }
        };

        if let Err(e) = self
            .permissions
            .insert(&CreatePermission {
                file_id: file.id,
                user_id: Some(owner_id),
                role: ShareRole::Owner,
                share_token: self.tokens.generate(),
                can_download: true,
                can_preview: true,
                expires_at: None,
                max_access_count: None,
            })
            .await
        {
            return Err(comp.abort(e).await);
        }

        if version_written {
            if let Err(e) = self
                .ledger
                .append(
                    file.id,
                    &version_path,
                    size_bytes,
                    params.mime_type.as_deref(),
                    Some(owner_id),
                )
                .await
            {
                warn!(file_id = %file.id, error = %e, "Version ledger append failed; upload continues");
            }
        }

        self.activity.record(
            Some(owner_id),
            Some(file.id),
            "upload",
            Some(format!("Uploaded '{}' ({} bytes)", file.name, size_bytes)),
        );

        info!(
            owner_id = %owner_id,
            file_id = %file.id,
            name = %file.name,
            size_bytes,
            "Upload completed"
        );

        Ok(UploadOutcome { file, url })
    }
}
