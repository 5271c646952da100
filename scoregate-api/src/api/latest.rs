//! Latest-score read endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::error;

use scoregate_common::AssessmentKind;

use crate::cache::LatestScore;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the live read
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub participant: String,
}

/// GET /api/tech_health_latest
///
/// Serves the cache file; the empty snapshot before any submission.
pub async fn tech_health_latest(State(state): State<AppState>) -> ApiResult<Json<LatestScore>> {
    let snapshot = state.cache.read().map_err(|e| {
        error!("latest cache read failed: {}", e);
        ApiError::Internal(format!("cache read failed: {}", e))
    })?;
    Ok(Json(snapshot))
}

/// GET /api/tech_health_latest_live?customer=&participant=
///
/// Queries the sink for the newest matching row and derives the maturity
/// label from the returned score. The empty snapshot when no rows match.
pub async fn tech_health_latest_live(
    State(state): State<AppState>,
    Query(params): Query<LiveQuery>,
) -> ApiResult<Json<LatestScore>> {
    let customer = params.customer.trim();
    let participant = params.participant.trim();

    let reading = state
        .sink
        .latest_tech_health(customer, participant)
        .await
        .map_err(|e| {
            error!("live latest query failed: {}", e);
            ApiError::SinkUnavailable(e.to_string())
        })?;

    let snapshot = match reading {
        Some(reading) => LatestScore {
            score: reading.score,
            max: 500,
            level: AssessmentKind::TechHealth
                .label_for_score(reading.score)
                .to_string(),
            timestamp: reading.timestamp,
        },
        None => LatestScore::empty(),
    };

    Ok(Json(snapshot))
}

/// GET /api/ai_readiness_latest
///
/// Newest AI readiness row straight from the sink; 404 when the table
/// has no rows yet.
pub async fn ai_readiness_latest(
    State(state): State<AppState>,
) -> ApiResult<Json<Map<String, Value>>> {
    let record = state.sink.latest_ai_readiness().await.map_err(|e| {
        error!("ai readiness latest query failed: {}", e);
        ApiError::SinkUnavailable(e.to_string())
    })?;

    match record {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound("No AI readiness data found".into())),
    }
}
