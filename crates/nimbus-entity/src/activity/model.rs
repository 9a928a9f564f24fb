//! Activity log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An append-only audit record.
///
/// Written as a best-effort side effect of mutations; never read back by
/// core logic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLogEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The acting user (None for anonymous share-link activity).
    pub actor_id: Option<Uuid>,
    /// The subject file, if any.
    pub file_id: Option<Uuid>,
    /// Action tag, e.g. `"upload"`, `"copy"`, `"share.issue"`.
    pub action: String,
    /// Free-form details.
    pub details: Option<String>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to append an activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityLogEntry {
    /// The acting user.
    pub actor_id: Option<Uuid>,
    /// The subject file.
    pub file_id: Option<Uuid>,
    /// Action tag.
    pub action: String,
    /// Free-form details.
    pub details: Option<String>,
}
