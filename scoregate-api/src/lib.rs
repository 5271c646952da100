//! scoregate-api library - HTTP ingest and read surface
//!
//! Accepts assessment-scoring submissions, runs them through the shared
//! validate/normalize core, and forwards canonical rows to the analytics
//! sink. Read side serves the last known tech-health score from a local
//! cache file or a live sink query.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use scoregate_common::config::ServiceConfig;

pub mod api;
pub mod cache;
pub mod error;
pub mod sink;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration, constructed once at startup
    pub config: Arc<ServiceConfig>,
    /// Analytics sink client (ingest + live query)
    pub sink: Arc<sink::SinkClient>,
    /// Single-slot latest-value cache
    pub cache: Arc<cache::LatestCache>,
    /// Wall-clock source; injectable so tests can pin "now"
    pub now_fn: fn() -> DateTime<Utc>,
}

impl AppState {
    /// Create new application state from a loaded configuration
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_clock(config, scoregate_common::time::now)
    }

    /// Create application state with an explicit clock
    pub fn with_clock(config: ServiceConfig, now_fn: fn() -> DateTime<Utc>) -> Self {
        let config = Arc::new(config);
        let sink = Arc::new(sink::SinkClient::new(config.clone()));
        let cache = Arc::new(cache::LatestCache::new(config.cache_path.clone()));
        Self { config, sink, cache, now_fn }
    }

    /// Current instant from the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        (self.now_fn)()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/ping", get(api::health::ping))
        .route("/health", get(api::health::health_check))
        .route("/api/score_and_push", post(api::ingest::score_and_push))
        .route(
            "/api/ai_readiness_score_and_push",
            post(api::ingest::ai_readiness_score_and_push),
        )
        .route(
            "/api/digital_readiness_score_and_push",
            post(api::ingest::digital_readiness_score_and_push),
        )
        .route("/api/tech_health_latest", get(api::latest::tech_health_latest))
        .route(
            "/api/tech_health_latest_live",
            get(api::latest::tech_health_latest_live),
        )
        .route(
            "/api/ai_readiness_latest",
            get(api::latest::ai_readiness_latest),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
