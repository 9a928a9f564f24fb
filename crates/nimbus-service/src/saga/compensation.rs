//! Reverse-order compensation for partially completed sagas.

use futures::future::BoxFuture;
use tracing::warn;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;

/// A stack of compensating actions accumulated while a saga runs.
///
/// Each completed step pushes the action that undoes it. When a later
/// step fails, [`unwind`](CompensationStack::unwind) runs the recorded
/// actions newest-first, best effort: a compensation that itself fails
/// is logged and skipped so the remaining ones still run.
pub struct CompensationStack {
    actions: Vec<(&'static str, BoxFuture<'static, AppResult<()>>)>,
}

impl CompensationStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Record the compensation for a step that just completed.
    pub fn push<F>(&mut self, label: &'static str, action: F)
    where
        F: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.actions.push((label, Box::pin(action)));
    }

    /// Number of recorded compensations.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether any compensations are recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run all recorded compensations in reverse order.
    pub async fn unwind(mut self) {
        while let Some((label, action)) = self.actions.pop() {
            if let Err(e) = action.await {
                warn!(step = label, error = %e, "Compensation failed; continuing with the rest");
            }
        }
    }

    /// Unwind and hand back the error that triggered the abort.
    pub async fn abort(self, err: AppError) -> AppError {
        warn!(error = %err, compensations = self.len(), "Saga step failed; compensating");
        self.unwind().await;
        err
    }
}

impl Default for CompensationStack {
    fn default() -> Self {
        Self::new()
    }
}
