//! File version store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::file::version::{CreateFileVersion, FileVersion};

/// Interface to file version rows in the metadata store.
///
/// Versions are append-only; `remove` exists solely for compensating a
/// failed versioned edit.
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Append a version row.
    async fn insert(&self, data: &CreateFileVersion) -> AppResult<FileVersion>;

    /// The highest version number recorded for a file, if any.
    async fn max_version_number(&self, file_id: Uuid) -> AppResult<Option<i32>>;

    /// All versions of a file, newest first.
    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>>;

    /// Find a specific version of a file.
    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>>;

    /// Remove a version row. Only compensating actions call this.
    async fn remove(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed version store.
#[derive(Debug, Clone)]
pub struct PgVersionRepository {
    pool: PgPool,
}

impl PgVersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionRepository {
    async fn insert(&self, data: &CreateFileVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions \
             (file_id, version_number, blob_path, size_bytes, mime_type, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.version_number)
        .bind(&data.blob_path)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Version {} already exists for file {}",
                    data.version_number, data.file_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file version", e),
        })
    }

    async fn max_version_number(&self, file_id: Uuid) -> AppResult<Option<i32>> {
        sqlx::query_scalar("SELECT MAX(version_number) FROM file_versions WHERE file_id = $1")
            .bind(file_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find max version", e)
            })
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version_number DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file versions", e))
    }

    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 AND version_number = $2",
        )
        .bind(file_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file version", e))
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_versions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove file version", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
