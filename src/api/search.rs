use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::api::errors::ApiError;
use crate::app::AppState;
use crate::error::AppError;
use crate::models::search::{
    MessageResponse, PopularParams, PopularResponse, QueryPairs, SearchEvent, SearchPage,
    SearchParams, SuggestionParams, SuggestionsResponse, TrackRequest,
};
use crate::search::normalize::{
    parse_limit, SearchRequest, DEFAULT_POPULAR_LIMIT, DEFAULT_SUGGESTION_LIMIT,
};

/// Header carrying the opaque requester id set by the identity layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Axum handler for `GET /search/posts`.
pub async fn search_posts_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<SearchPage>, ApiError> {
    let request = SearchRequest::from_params(&SearchParams::from_pairs(&pairs));

    let page = state
        .executor
        .search(&request)
        .await
        .map_err(|e| ApiError::new("Search failed", e))?;

    if state.track_search_requests {
        if let Some(query) = &request.text {
            let user_id = headers
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            state
                .analytics
                .record_quietly(SearchEvent::new(query.clone(), user_id, page.total_count))
                .await;
        }
    }

    Ok(Json(page))
}

/// Axum handler for `GET /search/suggestions`.
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let params = SuggestionParams::from_pairs(&pairs);
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_SUGGESTION_LIMIT);

    let suggestions = state
        .suggestions
        .suggest(params.q.as_deref(), limit)
        .await
        .map_err(|e| ApiError::new("Failed to get suggestions", e))?;

    Ok(Json(SuggestionsResponse { suggestions }))
}

/// Axum handler for `GET /search/popular`.
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<PopularResponse>, ApiError> {
    let params = PopularParams::from_pairs(&pairs);
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_POPULAR_LIMIT);

    let popular_searches = state
        .trends
        .popular(limit)
        .await
        .map_err(|e| ApiError::new("Failed to get popular searches", e))?;

    Ok(Json(PopularResponse { popular_searches }))
}

/// Axum handler for `POST /search/track`.
pub async fn track_handler(
    State(state): State<AppState>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new("Invalid request", AppError::BadRequest(rejection.body_text()))
    })?;

    state
        .analytics
        .track(request.query.as_deref(), request.user_id, request.results_count)
        .await
        .map_err(|e| ApiError::new("Failed to track search", e))?;

    Ok(Json(MessageResponse {
        message: "Search tracked successfully".to_string(),
    }))
}

/// Axum handler for `POST /search/index`.
///
/// Intentionally inert: posts are searched straight from the database, so
/// there is no separate index to feed. Kept so existing callers of the
/// indexing API keep working.
pub async fn index_document_handler(
    Json(_document): Json<serde_json::Value>,
) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Document indexed successfully".to_string(),
    })
}

/// Axum handler for `DELETE /search/index/{id}`.
///
/// Intentionally inert, see [`index_document_handler`].
pub async fn delete_from_index_handler(Path(id): Path<String>) -> Json<MessageResponse> {
    tracing::debug!(id = %id, "Ignoring delete-from-index request");
    Json(MessageResponse {
        message: "Document removed from index successfully".to_string(),
    })
}
