use std::sync::Arc;

use crate::db::repository::SearchStore;
use crate::error::AppError;
use crate::models::search::SearchPage;
use crate::search::enricher::MetadataEnricher;
use crate::search::normalize::SearchRequest;

/// Runs the filtered, paginated post query and its total count.
///
/// The count and the page are two independent reads. Under concurrent
/// writes they may observe different snapshots of `posts`.
pub struct SearchExecutor {
    store: Arc<dyn SearchStore>,
    enricher: MetadataEnricher,
}

impl SearchExecutor {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self {
            enricher: MetadataEnricher::new(store.clone()),
            store,
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchPage, AppError> {
        tracing::debug!(
            query = request.text.as_deref().unwrap_or(""),
            page = request.pagination.page,
            limit = request.pagination.limit,
            "Searching posts"
        );

        let total_count = self.store.count_documents(request).await?;
        let documents = self.store.fetch_documents(request).await?;

        if documents.is_empty() {
            return Ok(SearchPage {
                data: Vec::new(),
                total_count,
            });
        }

        let data = self.enricher.enrich(documents).await;
        Ok(SearchPage { data, total_count })
    }
}
