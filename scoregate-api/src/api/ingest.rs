//! Score ingest endpoints
//!
//! All three routes run the same pipeline: parse the JSON body into a raw
//! field mapping, validate it against the kind's profile, normalize it into
//! a canonical row with the server clock, and stream the row to the
//! analytics sink. Validation failures are itemized client errors; sink
//! failures are surfaced without retry.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use scoregate_common::{normalize, validate, AssessmentKind, CanonicalRow};

use crate::cache::LatestScore;
use crate::sink::SinkError;
use crate::{ApiError, ApiResult, AppState};

/// Ingest acknowledgement
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: String,
    /// False when no ingest endpoint is configured (dev mode)
    pub forwarded: bool,
    /// The skew-guarded event timestamp that was stored
    pub timestamp_utc: String,
}

/// POST /api/score_and_push
///
/// Generic (tech health) ingest. Also refreshes the latest-value cache,
/// best-effort, before the sink call.
pub async fn score_and_push(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<IngestResponse>> {
    let raw = as_object(body)?;
    validate(AssessmentKind::TechHealth, &raw)?;

    let row = normalize(AssessmentKind::TechHealth, &raw, state.now())?;

    // Cache update must not fail the request
    if let Err(e) = state.cache.write(&latest_snapshot(&row)) {
        warn!("failed to write latest cache: {}", e);
    }

    forward(&state, AssessmentKind::TechHealth, row).await
}

/// POST /api/ai_readiness_score_and_push
pub async fn ai_readiness_score_and_push(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<IngestResponse>> {
    let raw = as_object(body)?;
    validate(AssessmentKind::AiReadiness, &raw)?;
    let row = normalize(AssessmentKind::AiReadiness, &raw, state.now())?;
    forward(&state, AssessmentKind::AiReadiness, row).await
}

/// POST /api/digital_readiness_score_and_push
pub async fn digital_readiness_score_and_push(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<IngestResponse>> {
    let raw = as_object(body)?;
    validate(AssessmentKind::DigitalReadiness, &raw)?;
    let row = normalize(AssessmentKind::DigitalReadiness, &raw, state.now())?;
    forward(&state, AssessmentKind::DigitalReadiness, row).await
}

/// Hand the canonical row to the sink, or accept locally in dev mode
async fn forward(
    state: &AppState,
    kind: AssessmentKind,
    row: CanonicalRow,
) -> ApiResult<Json<IngestResponse>> {
    let timestamp_utc = row["timestamp_utc"].as_str().unwrap_or_default().to_string();

    if !state.sink.is_ingest_configured() {
        info!(kind = %kind, "no ingest endpoint configured, row accepted locally");
        return Ok(Json(IngestResponse {
            status: "accepted".to_string(),
            forwarded: false,
            timestamp_utc,
        }));
    }

    match state.sink.ingest(kind, &row).await {
        Ok(()) => {
            info!(kind = %kind, "row ingested");
            Ok(Json(IngestResponse {
                status: "accepted".to_string(),
                forwarded: true,
                timestamp_utc,
            }))
        }
        Err(SinkError::Rejected { status, body }) => {
            error!(kind = %kind, status, "sink rejected ingest: {}", body);
            Err(ApiError::SinkRejected(format!("{}: {}", status, body)))
        }
        Err(e) => {
            error!(kind = %kind, "sink ingest failed: {}", e);
            Err(ApiError::SinkUnavailable(e.to_string()))
        }
    }
}

/// The body must be a JSON object (a flat field mapping)
fn as_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::BadRequest("request body must be a JSON object".to_string())),
    }
}

/// Snapshot for the latest-value cache, taken from the canonical row so the
/// stored timestamp is the skew-guarded one
fn latest_snapshot(row: &CanonicalRow) -> LatestScore {
    let score = row["overall_score_500"].as_f64().unwrap_or(0.0) as i64;
    LatestScore {
        score,
        max: 500,
        level: AssessmentKind::TechHealth.label_for_score(score).to_string(),
        timestamp: row["timestamp_utc"].as_str().unwrap_or_default().to_string(),
    }
}
