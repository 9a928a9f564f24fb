//! Copy and move sagas.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_entity::file::{CreateFile, File};
use nimbus_entity::folder::{CreateFolder, Folder};
use nimbus_entity::permission::{CreatePermission, ShareRole};

use super::compensation::CompensationStack;
use super::paths;
use super::SagaOrchestrator;

impl SagaOrchestrator {
    /// Copy a file into a target folder (or the root).
    ///
    /// Duplicates the content blob first, then inserts the new file row
    /// and its owner grant; a failure at any point removes whatever was
    /// already written.
    pub async fn copy_file(
        &self,
        actor_id: Uuid,
        file_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let source = self.require_owned_file(file_id, actor_id).await?;

        if let Some(folder_id) = target_folder_id {
            self.require_owned_folder(folder_id, actor_id).await?;
        }

        let data = self.blob.get(&source.blob_path).await?;
        let copy_path = paths::content_path(actor_id, &source.name, Utc::now());

        self.blob
            .put(&copy_path, data, source.mime_type.as_deref())
            .await?;

        let mut comp = CompensationStack::new();
        comp.push("remove copied blob", {
            let blob = Arc::clone(&self.blob);
            let path = copy_path.clone();
            async move { blob.delete(&[path]).await }
        });

        let created = match self
            .files
            .insert(&CreateFile {
                name: source.name.clone(),
                size_bytes: source.size_bytes,
                mime_type: source.mime_type.clone(),
                blob_path: copy_path,
                owner_id: actor_id,
                folder_id: target_folder_id,
                is_public: false,
            })
            .await
        {
            Ok(file) => file,
            Err(e) => return Err(comp.abort(e).await),
        };
        comp.push("remove copied file row", {
            let files = Arc::clone(&self.files);
            let created_id = created.id;
            async move { files.remove(created_id).await.map(|_| ()) }
        });

        if let Err(e) = self
            .permissions
            .insert(&CreatePermission {
                file_id: created.id,
                user_id: Some(actor_id),
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

        self.activity.record(
            Some(actor_id),
            Some(created.id),
            "copy",
            Some(format!("Copied '{}'", source.name)),
        );
        info!(actor_id = %actor_id, source_id = %source.id, copy_id = %created.id, "File copied");

        Ok(created)
    }

    /// Copy a folder into a target folder (or the root).
    ///
    /// The copy is shallow: a new folder row named `"<name> (copy)"` is
    /// created and the children of the source are left untouched.
    pub async fn copy_folder(
        &self,
        actor_id: Uuid,
        folder_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let source = self.require_owned_folder(folder_id, actor_id).await?;

        if let Some(target_id) = target_folder_id {
            self.require_owned_folder(target_id, actor_id).await?;
        }

        let copy = self
            .folders
            .insert(&CreateFolder {
                name: format!("{} (copy)", source.name),
                owner_id: actor_id,
                parent_id: target_folder_id,
            })
            .await?;

        self.activity.record(
            Some(actor_id),
            None,
            "copy",
            Some(format!("Copied folder '{}'", source.name)),
        );
        info!(actor_id = %actor_id, source_id = %source.id, copy_id = %copy.id, "Folder copied");

        Ok(copy)
    }

    /// Move a file into a target folder (or the root).
    pub async fn move_file(
        &self,
        actor_id: Uuid,
        file_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let file = self.require_owned_file(file_id, actor_id).await?;

        if let Some(folder_id) = target_folder_id {
            self.require_owned_folder(folder_id, actor_id).await?;
        }

        let moved = self.files.set_folder(file.id, target_folder_id).await?;

        self.activity.record(
            Some(actor_id),
            Some(moved.id),
            "move",
            Some(format!("Moved '{}'", moved.name)),
        );
        info!(actor_id = %actor_id, file_id = %moved.id, folder_id = ?target_folder_id, "File moved");

        Ok(moved)
    }

    /// Move a folder into a target folder (or the root).
    ///
    /// Moving a folder into itself or into one of its descendants would
    /// create a cycle and is refused with `Conflict`.
    pub async fn move_folder(
        &self,
        actor_id: Uuid,
        folder_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let folder = self.require_owned_folder(folder_id, actor_id).await?;

        if let Some(target_id) = target_folder_id {
            self.require_owned_folder(target_id, actor_id).await?;

            // ancestor_ids includes the target itself, so target == folder
            // is caught by the same check.
            let ancestors = self.folders.ancestor_ids(target_id).await?;
            if ancestors.contains(&folder.id) {
                return Err(AppError::conflict(
                    "Cannot move a folder into itself or one of its descendants",
                ));
            }
        }

        let moved = self.folders.set_parent(folder.id, target_folder_id).await?;

        self.activity.record(
            Some(actor_id),
            None,
            "move",
            Some(format!("Moved folder '{}'", moved.name)),
        );
        info!(actor_id = %actor_id, folder_id = %moved.id, parent_id = ?target_folder_id, "Folder moved");

        Ok(moved)
    }
}
