//! File store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::file::model::{CreateFile, File};

/// Interface to file rows in the metadata store.
///
/// `find_live*` methods only return rows whose `deleted_at` is unset;
/// soft-deleted files are invisible to every caller except `clear_deleted`.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Insert a new file record.
    async fn insert(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a live file by ID.
    async fn find_live(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a live file by ID, scoped to its owner.
    ///
    /// Returning `None` for a file owned by someone else keeps existence
    /// and authorization failures indistinguishable.
    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>>;

    /// Count live files directly inside a folder.
    async fn count_live_in_folder(&self, folder_id: Uuid) -> AppResult<i64>;

    /// Re-parent a file (None = root level).
    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> AppResult<File>;

    /// Rename a file.
    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<File>;

    /// Soft-delete a live file. Already-deleted files are not touched.
    async fn mark_deleted(&self, id: Uuid) -> AppResult<File>;

    /// Restore a soft-deleted file owned by `owner_id`. Returns `None`
    /// when no such deleted file exists.
    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>>;

    /// Remove the row entirely. Only compensating actions call this.
    async fn remove(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed file store.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileRepository {
    async fn insert(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (name, size_bytes, mime_type, blob_path, owner_id, folder_id, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(&data.blob_path)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(data.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_live(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find owned file", e))
    }

    async fn count_live_in_folder(&self, folder_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM files WHERE folder_id = $1 AND deleted_at IS NULL",
        )
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folder files", e))
    }

    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET deleted_at = NULL \
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore file", e))
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove file row", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
