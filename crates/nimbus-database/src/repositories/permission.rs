//! Permission store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::permission::model::{CreatePermission, Permission};

/// Interface to permission rows in the metadata store.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Insert a new permission row with `access_count = 0`.
    async fn insert(&self, data: &CreatePermission) -> AppResult<Permission>;

    /// Find a permission by its share token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Permission>>;

    /// Find a permission by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>>;

    /// List all permission rows for a file.
    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<Permission>>;

    /// Atomically consume one access.
    ///
    /// The increment is conditional on `access_count < max_access_count`
    /// (when a ceiling is set), so concurrent resolutions cannot overshoot
    /// the ceiling. Returns `None` when the token is exhausted.
    async fn consume_access(&self, id: Uuid) -> AppResult<Option<Permission>>;

    /// Remove a permission row (revocation or compensation).
    async fn remove(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed permission store.
#[derive(Debug, Clone)]
pub struct PgPermissionRepository {
    pool: PgPool,
}

impl PgPermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionRepository {
    async fn insert(&self, data: &CreatePermission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions \
             (file_id, user_id, role, share_token, can_download, can_preview, expires_at, max_access_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.user_id)
        .bind(data.role)
        .bind(&data.share_token)
        .bind(data.can_download)
        .bind(data.can_preview)
        .bind(data.expires_at)
        .bind(data.max_access_count)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("Share token collision")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create permission", e),
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission by token", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission", e)
            })
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE file_id = $1 ORDER BY created_at ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list file permissions", e)
        })
    }

    async fn consume_access(&self, id: Uuid) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "UPDATE permissions SET access_count = access_count + 1 \
             WHERE id = $1 AND (max_access_count IS NULL OR access_count < max_access_count) \
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to consume access", e))
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove permission", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
