//! Saga orchestration for multi-step mutations.
//!
//! Every write that touches both the metadata store and the blob store
//! runs as an ordered sequence of steps. Each completed step records a
//! compensating action on a [`CompensationStack`]; when a later step
//! fails, the stack unwinds newest-first so no half-applied mutation
//! stays visible.

pub mod compensation;
pub mod paths;

mod delete;
mod edit;
mod transfer;
mod upload;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_database::repositories::file::FileStore;
use nimbus_database::repositories::folder::FolderStore;
use nimbus_database::repositories::permission::PermissionStore;
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;

pub use compensation::CompensationStack;
pub use edit::EditOutcome;
pub use upload::{UploadOutcome, UploadParams};

use crate::activity::ActivityLogger;
use crate::share::{ShareService, TokenGenerator};
use crate::version::VersionLedger;

/// A file or folder returned by an operation that acts on either kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRecord {
    File(File),
    Folder(Folder),
}

/// Sequences multi-step mutations across the metadata and blob stores.
pub struct SagaOrchestrator {
    /// File metadata store.
    files: Arc<dyn FileStore>,
    /// Folder metadata store.
    folders: Arc<dyn FolderStore>,
    /// Permission store.
    permissions: Arc<dyn PermissionStore>,
    /// Version ledger.
    ledger: Arc<VersionLedger>,
    /// Blob store.
    blob: Arc<dyn BlobStore>,
    /// Token generator for owner grants.
    tokens: TokenGenerator,
    /// Share service, used to resolve edit tokens.
    shares: Arc<ShareService>,
    /// Activity logger.
    activity: ActivityLogger,
}

impl std::fmt::Debug for SagaOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SagaOrchestrator")
            .field("blob_provider", &self.blob.provider_type())
            .finish()
    }
}

impl SagaOrchestrator {
    /// Creates a new saga orchestrator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        permissions: Arc<dyn PermissionStore>,
        ledger: Arc<VersionLedger>,
        blob: Arc<dyn BlobStore>,
        tokens: TokenGenerator,
        shares: Arc<ShareService>,
        activity: ActivityLogger,
    ) -> Self {
        Self {
            files,
            folders,
            permissions,
            ledger,
            blob,
            tokens,
            shares,
            activity,
        }
    }

    /// A live folder owned by the actor, or `NotFound`.
    ///
    /// Missing, deleted, and foreign folders are indistinguishable to
    /// the caller.
    async fn require_owned_folder(&self, folder_id: Uuid, owner_id: Uuid) -> AppResult<Folder> {
        self.folders
            .find_live_owned(folder_id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// A live file owned by the actor, or `NotFound`.
    async fn require_owned_file(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<File> {
        self.files
            .find_live_owned(file_id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Version history of a file the actor owns, newest first.
    pub async fn list_versions(
        &self,
        actor_id: Uuid,
        file_id: Uuid,
    ) -> AppResult<Vec<nimbus_entity::file::FileVersion>> {
        self.require_owned_file(file_id, actor_id).await?;
        self.ledger.list(file_id).await
    }
}
