//! Best-effort activity logging.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use nimbus_database::repositories::activity::ActivityStore;
use nimbus_entity::activity::CreateActivityLogEntry;

/// Fire-and-forget writer for the activity log.
///
/// Entries are appended on a spawned task; a failed write is logged and
/// never aborts or delays the mutation that produced it.
#[derive(Clone)]
pub struct ActivityLogger {
    /// Activity log store.
    store: Arc<dyn ActivityStore>,
}

impl std::fmt::Debug for ActivityLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLogger").finish()
    }
}

impl ActivityLogger {
    /// Creates a new activity logger.
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Record an action without waiting for the write to land.
    pub fn record(
        &self,
        actor_id: Option<Uuid>,
        file_id: Option<Uuid>,
        action: &str,
        details: Option<String>,
    ) {
        let store = Arc::clone(&self.store);
        let entry = CreateActivityLogEntry {
            actor_id,
            file_id,
            action: action.to_string(),
            details,
        };

        tokio::spawn(async move {
            if let Err(e) = store.insert(&entry).await {
                warn!(action = %entry.action, error = %e, "Activity log write failed");
            }
        });
    }
}
