use std::sync::Arc;

use crate::db::repository::SearchStore;
use crate::error::AppError;
use crate::models::search::SearchEvent;

/// Appends search events to the analytics log. Events are never updated
/// or deleted.
pub struct AnalyticsRecorder {
    store: Arc<dyn SearchStore>,
}

impl AnalyticsRecorder {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    /// Record an explicitly tracked search.
    ///
    /// A blank query is rejected; write failures are returned to the caller.
    pub async fn track(
        &self,
        query: Option<&str>,
        user_id: Option<String>,
        results_count: i64,
    ) -> Result<(), AppError> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(AppError::BadRequest("Query is required".into()));
        }

        let event = SearchEvent::new(query, user_id, results_count.max(0));
        self.record(&event).await
    }

    /// Record a search served by the search endpoint.
    ///
    /// Best effort: blank queries are skipped and failures are only logged.
    pub async fn record_quietly(&self, event: SearchEvent) {
        if event.query.trim().is_empty() {
            return;
        }
        if let Err(e) = self.record(&event).await {
            tracing::warn!("Failed to record search analytics: {e}");
        }
    }

    pub async fn record(&self, event: &SearchEvent) -> Result<(), AppError> {
        self.store.insert_event(event).await
    }
}
