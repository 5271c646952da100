//! Error types for scoregate-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use scoregate_common::{NormalizationError, ValidationError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body (400) - unparsable JSON, not an object
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Submission rejected by the validator (400, itemized message)
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Sink rejected the row (502)
    #[error("Sink rejected ingest: {0}")]
    SinkRejected(String),

    /// Sink transport failure or missing configuration (500)
    #[error("Sink error: {0}")]
    SinkUnavailable(String),

    /// Normalizer invariant broken - a logic bug, not a client problem (500)
    #[error("Internal error: {0}")]
    Logic(#[from] NormalizationError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Validation(ref err) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::SinkRejected(msg) => (StatusCode::BAD_GATEWAY, "SINK_REJECTED", msg),
            ApiError::SinkUnavailable(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SINK_UNAVAILABLE", msg)
            }
            ApiError::Logic(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
