//! Soft deletion and restore.

use tracing::info;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_entity::clipboard::ItemKind;

use super::{ItemRecord, SagaOrchestrator};

impl SagaOrchestrator {
    /// Soft-delete a file or folder owned by the actor.
    ///
    /// The row keeps its blob and versions; only `deleted_at` is set,
    /// which hides it from every live query. A folder that still
    /// contains live items is refused with `Conflict`.
    pub async fn soft_delete(
        &self,
        actor_id: Uuid,
        item_kind: ItemKind,
        item_id: Uuid,
    ) -> AppResult<ItemRecord> {
        let record = match item_kind {
            ItemKind::File => {
                let file = self.require_owned_file(item_id, actor_id).await?;
                let deleted = self.files.mark_deleted(file.id).await?;
                self.activity.record(
                    Some(actor_id),
                    Some(deleted.id),
                    "delete",
                    Some(format!("Deleted '{}'", deleted.name)),
                );
                ItemRecord::File(deleted)
            }
            ItemKind::Folder => {
                let folder = self.require_owned_folder(item_id, actor_id).await?;

                let live_files = self.files.count_live_in_folder(folder.id).await?;
                let live_folders = self.folders.count_live_children(folder.id).await?;
                if live_files + live_folders > 0 {
                    return Err(AppError::conflict("Folder still contains items"));
                }

                let deleted = self.folders.mark_deleted(folder.id).await?;
                self.activity.record(
                    Some(actor_id),
                    None,
                    "delete",
                    Some(format!("Deleted folder '{}'", deleted.name)),
                );
                ItemRecord::Folder(deleted)
            }
        };

        info!(actor_id = %actor_id, item_id = %item_id, kind = ?item_kind, "Item soft-deleted");
        Ok(record)
    }

    /// Restore a soft-deleted file or folder owned by the actor.
    pub async fn restore(
        &self,
        actor_id: Uuid,
        item_kind: ItemKind,
        item_id: Uuid,
    ) -> AppResult<ItemRecord> {
        let record = match item_kind {
            ItemKind::File => {
                let restored = self
                    .files
                    .clear_deleted(item_id, actor_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("File not found"))?;
                self.activity.record(
                    Some(actor_id),
                    Some(restored.id),
                    "restore",
                    Some(format!("Restored '{}'", restored.name)),
                );
                ItemRecord::File(restored)
            }
            ItemKind::Folder => {
                let restored = self
                    .folders
                    .clear_deleted(item_id, actor_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Folder not found"))?;
                self.activity.record(
                    Some(actor_id),
                    None,
                    "restore",
                    Some(format!("Restored folder '{}'", restored.name)),
                );
                ItemRecord::Folder(restored)
            }
        };

        info!(actor_id = %actor_id, item_id = %item_id, kind = ?item_kind, "Item restored");
        Ok(record)
    }
}
