//! Clipboard store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::clipboard::model::{ClipboardEntry, SetClipboardEntry};

/// Interface to clipboard rows in the metadata store.
///
/// One row per user; `upsert` overwrites whatever was there before.
#[async_trait]
pub trait ClipboardStore: Send + Sync + 'static {
    /// Create or overwrite the user's clipboard entry.
    async fn upsert(&self, data: &SetClipboardEntry) -> AppResult<ClipboardEntry>;

    /// Find the user's clipboard entry.
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<ClipboardEntry>>;

    /// Delete the user's clipboard entry. Returns `true` if one existed.
    async fn clear(&self, user_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed clipboard store.
#[derive(Debug, Clone)]
pub struct PgClipboardRepository {
    pool: PgPool,
}

impl PgClipboardRepository {
    /// Create a new clipboard repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClipboardStore for PgClipboardRepository {
    async fn upsert(&self, data: &SetClipboardEntry) -> AppResult<ClipboardEntry> {
        sqlx::query_as::<_, ClipboardEntry>(
            "INSERT INTO clipboard_entries (user_id, item_id, item_kind, operation) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                item_id = EXCLUDED.item_id, \
                item_kind = EXCLUDED.item_kind, \
                operation = EXCLUDED.operation, \
                created_at = NOW() \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.item_id)
        .bind(data.item_kind)
        .bind(data.operation)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set clipboard", e))
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<ClipboardEntry>> {
        sqlx::query_as::<_, ClipboardEntry>("SELECT * FROM clipboard_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find clipboard entry", e)
            })
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clipboard_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear clipboard", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
