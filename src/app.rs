use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::repository::SearchStore;
use crate::search::analytics::AnalyticsRecorder;
use crate::search::executor::SearchExecutor;
use crate::search::suggest::SuggestionEngine;
use crate::search::trending::TrendAggregator;

/// Shared state handed to every handler.
///
/// Each component owns a handle to the same store; there is no other
/// process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<SearchExecutor>,
    pub suggestions: Arc<SuggestionEngine>,
    pub trends: Arc<TrendAggregator>,
    pub analytics: Arc<AnalyticsRecorder>,
    pub track_search_requests: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn SearchStore>, track_search_requests: bool) -> Self {
        Self {
            executor: Arc::new(SearchExecutor::new(store.clone())),
            suggestions: Arc::new(SuggestionEngine::new(store.clone())),
            trends: Arc::new(TrendAggregator::new(store.clone())),
            analytics: Arc::new(AnalyticsRecorder::new(store)),
            track_search_requests,
        }
    }
}

/// Build the Axum router for the search API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search/posts", get(api::search::search_posts_handler))
        .route("/search/suggestions", get(api::search::suggestions_handler))
        .route("/search/popular", get(api::search::popular_handler))
        .route("/search/track", post(api::search::track_handler))
        .route("/search/index", post(api::search::index_document_handler))
        .route(
            "/search/index/{id}",
            delete(api::search::delete_from_index_handler),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
