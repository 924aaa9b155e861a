//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use docguard_core::Error;

/// Error type returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// An upstream service (completion, OCR) failed or returned junk.
    UpstreamFailure(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::DocumentNotFound(id) => ApiError::NotFound(format!("document {}", id)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::AnalysisParse(msg) | Error::Completion(msg) | Error::Extraction(msg) => {
                ApiError::UpstreamFailure(msg)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamFailure(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
