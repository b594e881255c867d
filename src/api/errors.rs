use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// API-specific error wrapper that converts AppError into HTTP responses.
///
/// The body is `{ "error": <summary>, "details": <underlying error> }`.
#[derive(Debug)]
pub struct ApiError {
    summary: &'static str,
    source: AppError,
}

impl ApiError {
    pub fn new(summary: &'static str, source: AppError) -> Self {
        Self { summary, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self.source {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(_) | AppError::Config(_) => {
                tracing::error!("{}: {}", self.summary, self.source);
                (StatusCode::INTERNAL_SERVER_ERROR, self.source.to_string())
            }
        };

        let body = serde_json::json!({
            "error": self.summary,
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}
