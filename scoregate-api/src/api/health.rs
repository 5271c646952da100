//! Liveness and health endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// "ok", "skipped" (no query endpoint configured) or "error: ..."
    pub sink: String,
}

/// GET /ping
///
/// Plain liveness probe, no body parsing, no sink contact.
pub async fn ping() -> &'static str {
    "OK"
}

/// GET /health
///
/// Reports module identity and, when a query endpoint is configured,
/// pings the analytics sink with a trivial query.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut response = HealthResponse {
        status: "ok".to_string(),
        module: "scoregate-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sink: "skipped".to_string(),
    };

    if state.sink.is_query_configured() {
        match state.sink.ping().await {
            Ok(()) => response.sink = "ok".to_string(),
            Err(e) => {
                response.sink = format!("error: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(response));
            }
        }
    }

    (StatusCode::OK, Json(response))
}
