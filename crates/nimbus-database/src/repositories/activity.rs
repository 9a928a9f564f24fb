//! Activity log store interface and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::activity::model::{ActivityLogEntry, CreateActivityLogEntry};

/// Interface to the append-only activity log.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Append an activity log entry.
    async fn insert(&self, data: &CreateActivityLogEntry) -> AppResult<ActivityLogEntry>;
}

/// PostgreSQL-backed activity log store.
#[derive(Debug, Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PgActivityRepository {
    async fn insert(&self, data: &CreateActivityLogEntry) -> AppResult<ActivityLogEntry> {
        sqlx::query_as::<_, ActivityLogEntry>(
            "INSERT INTO activity_log (actor_id, file_id, action, details) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.actor_id)
        .bind(data.file_id)
        .bind(&data.action)
        .bind(&data.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }
}
