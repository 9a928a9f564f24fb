//! Folder store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::folder::model::{CreateFolder, Folder};

/// Interface to folder rows in the metadata store.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Insert a new folder record.
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a live folder by ID.
    async fn find_live(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find a live folder by ID, scoped to its owner.
    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>>;

    /// Count live subfolders directly inside a folder.
    async fn count_live_children(&self, parent_id: Uuid) -> AppResult<i64>;

    /// IDs of the folder itself and all its ancestors up to the root.
    ///
    /// Used as the cycle guard when re-parenting: a folder must never be
    /// moved into itself or one of its descendants.
    async fn ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Re-parent a folder (None = root level).
    async fn set_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> AppResult<Folder>;

    /// Soft-delete a live folder.
    async fn mark_deleted(&self, id: Uuid) -> AppResult<Folder>;

    /// Restore a soft-deleted folder owned by `owner_id`.
    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>>;
}

/// PostgreSQL-backed folder store.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderRepository {
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, owner_id, parent_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn find_live(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find owned folder", e))
    }

    async fn count_live_children(&self, parent_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM folders WHERE parent_id = $1 AND deleted_at IS NULL",
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count subfolders", e))
    }

    async fn ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "WITH RECURSIVE ancestors AS ( \
                SELECT id, parent_id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, f.parent_id FROM folders f \
                INNER JOIN ancestors a ON f.id = a.parent_id \
             ) SELECT id FROM ancestors",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    async fn set_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET deleted_at = NULL \
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore folder", e))
    }
}
