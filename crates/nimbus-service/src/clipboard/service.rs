//! Clipboard service.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::repositories::clipboard::ClipboardStore;
use nimbus_database::repositories::file::FileStore;
use nimbus_database::repositories::folder::FolderStore;
use nimbus_entity::clipboard::{ClipboardEntry, ClipboardOp, ItemKind, SetClipboardEntry};

use crate::saga::{ItemRecord, SagaOrchestrator};

/// Holds one pending copy or cut per user and dispatches paste to the
/// matching saga.
///
/// Setting the clipboard replaces any previous entry. A copy entry
/// survives paste and can be pasted again; a cut entry is consumed by
/// its first successful paste.
pub struct ClipboardService {
    /// Clipboard store.
    clipboard: Arc<dyn ClipboardStore>,
    /// File metadata store, for validating clipboard targets.
    files: Arc<dyn FileStore>,
    /// Folder metadata store, for validating clipboard targets.
    folders: Arc<dyn FolderStore>,
    /// Saga orchestrator that executes the paste.
    saga: Arc<SagaOrchestrator>,
}

impl std::fmt::Debug for ClipboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardService").finish()
    }
}

impl ClipboardService {
    /// Creates a new clipboard service.
    pub fn new(
        clipboard: Arc<dyn ClipboardStore>,
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        saga: Arc<SagaOrchestrator>,
    ) -> Self {
        Self {
            clipboard,
            files,
            folders,
            saga,
        }
    }

    /// Place a file or folder on the user's clipboard.
    ///
    /// The item must be live and owned by the user; anything else is
    /// `NotFound`. Any previous entry is replaced regardless of kind
    /// or operation.
    pub async fn set_clipboard(
        &self,
        user_id: Uuid,
        operation: ClipboardOp,
        item_kind: ItemKind,
        item_id: Uuid,
    ) -> AppResult<ClipboardEntry> {
        match item_kind {
            ItemKind::File => {
                self.files
                    .find_live_owned(item_id, user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("File not found"))?;
            }
            ItemKind::Folder => {
                self.folders
                    .find_live_owned(item_id, user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Folder not found"))?;
            }
        }

        let entry = self
            .clipboard
            .upsert(&SetClipboardEntry {
                user_id,
                item_id,
                item_kind,
                operation,
            })
            .await?;

        info!(
            user_id = %user_id,
            item_id = %item_id,
            kind = ?item_kind,
            operation = ?operation,
            "Clipboard set"
        );

        Ok(entry)
    }

    /// Paste the user's clipboard entry into a target folder (or the
    /// root).
    ///
    /// Copy entries dispatch to the copy sagas and stay on the
    /// clipboard; cut entries dispatch to the move sagas and are
    /// cleared after the move succeeds.
    pub async fn paste(
        &self,
        user_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<ItemRecord> {
        let entry = self
            .clipboard
            .find_for_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Clipboard is empty"))?;

        // The dispatched saga re-validates the item and the target.
        let outcome = match (entry.operation, entry.item_kind) {
            (ClipboardOp::Copy, ItemKind::File) => ItemRecord::File(
                self.saga
                    .copy_file(user_id, entry.item_id, target_folder_id)
                    .await?,
            ),
            (ClipboardOp::Copy, ItemKind::Folder) => ItemRecord::Folder(
                self.saga
                    .copy_folder(user_id, entry.item_id, target_folder_id)
                    .await?,
            ),
            (ClipboardOp::Cut, ItemKind::File) => ItemRecord::File(
                self.saga
                    .move_file(user_id, entry.item_id, target_folder_id)
                    .await?,
            ),
            (ClipboardOp::Cut, ItemKind::Folder) => ItemRecord::Folder(
                self.saga
                    .move_folder(user_id, entry.item_id, target_folder_id)
                    .await?,
            ),
        };

        if entry.operation == ClipboardOp::Cut {
            // The move already landed; a failure here only leaves a
            // stale entry behind.
            if let Err(e) = self.clipboard.clear(user_id).await {
                warn!(user_id = %user_id, error = %e, "Failed to clear clipboard after cut-paste");
            }
        }

        info!(
            user_id = %user_id,
            operation = ?entry.operation,
            kind = ?entry.item_kind,
            "Paste completed"
        );

        Ok(outcome)
    }

    /// The user's current clipboard entry, if any.
    pub async fn current(&self, user_id: Uuid) -> AppResult<Option<ClipboardEntry>> {
        self.clipboard.find_for_user(user_id).await
    }

    /// Drop the user's clipboard entry without pasting.
    pub async fn clear(&self, user_id: Uuid) -> AppResult<bool> {
        self.clipboard.clear(user_id).await
    }
}
