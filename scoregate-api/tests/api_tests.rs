//! Integration tests for the scoregate-api HTTP surface
//!
//! Tests cover:
//! - Liveness and health endpoints
//! - Ingest pipeline in dev mode (no sink configured): accept, cache update
//! - Itemized validation errors surfaced as 400s
//! - Latest-value reads from the cache file
//! - Live read failure when no query endpoint is configured

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use scoregate_api::{build_router, AppState};
use scoregate_common::config::{FileConfig, ServiceConfig};

/// Test helper: config with no sink endpoints and a private cache file
fn test_config(dir: &tempfile::TempDir) -> ServiceConfig {
    let file = FileConfig {
        cache_path: Some(dir.path().join("latest.json")),
        ..FileConfig::default()
    };
    ServiceConfig::from_parts(file, |_| None)
}

/// Pinned "now" so payload timestamps stay inside the skew window
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
}

fn setup_app(dir: &tempfile::TempDir) -> axum::Router {
    build_router(AppState::with_clock(test_config(dir), fixed_now))
}

/// Test helper: GET request
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST request with a JSON body
fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn tech_health_payload() -> Value {
    json!({
        "session_id": "s-1",
        "assessment_type": "AIX",
        "timestamp": "2024-01-10T11:30:00Z",
        "customer": "Contoso",
        "industry": "Retail",
        "participant_name": "Dana",
        "participant_role": "CTO",
        "org": "IT",
        "domains": [{"name": "Security", "score": 80}],
        "overall_score_500": 352,
        "notes": ""
    })
}

fn ai_readiness_payload() -> Value {
    json!({
        "session_id": "s-2",
        "customer": "Contoso",
        "industry": "Retail",
        "participant_name": "Dana",
        "participant_role": "CTO",
        "org": "IT",
        "answers": vec![3; 21],
        "total_105": 63,
        "percent": 60.0,
        "notes": ""
    })
}

// =============================================================================
// Liveness and health
// =============================================================================

#[tokio::test]
async fn test_ping() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/ping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_health_skips_sink_when_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "scoregate-api");
    assert_eq!(body["sink"], "skipped");
    assert!(body["version"].is_string());
}

// =============================================================================
// Ingest pipeline (dev mode)
// =============================================================================

#[tokio::test]
async fn test_score_and_push_accepts_in_dev_mode() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/api/score_and_push", &tech_health_payload());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["forwarded"], false);
    // A fresh client timestamp is honored verbatim
    assert_eq!(body["timestamp_utc"], "2024-01-10T11:30:00Z");
}

#[tokio::test]
async fn test_score_and_push_overrides_stale_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let mut payload = tech_health_payload();
    payload["timestamp"] = json!("2020-01-01T00:00:00Z");

    let request = post_json("/api/score_and_push", &payload);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Stale timestamps are replaced with the server clock
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["timestamp_utc"], "2024-01-10T12:00:00Z");
}

#[tokio::test]
async fn test_score_and_push_updates_latest_cache() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/api/score_and_push", &tech_health_payload());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/tech_health_latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["score"], 352);
    assert_eq!(body["max"], 500);
    assert_eq!(body["level"], "Advanced");
    assert_eq!(body["timestamp"], "2024-01-10T11:30:00Z");
}

#[tokio::test]
async fn test_ai_readiness_accepts_in_dev_mode() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/api/ai_readiness_score_and_push", &ai_readiness_payload());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["forwarded"], false);
}

// =============================================================================
// Validation errors
// =============================================================================

#[tokio::test]
async fn test_missing_fields_are_itemized() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let mut payload = tech_health_payload();
    payload.as_object_mut().unwrap().remove("customer");
    payload.as_object_mut().unwrap().remove("org");

    let request = post_json("/api/score_and_push", &payload);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("customer"));
    assert!(message.contains("org"));
}

#[tokio::test]
async fn test_wrong_answer_count_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let mut payload = ai_readiness_payload();
    payload["answers"] = json!(vec![3; 20]);

    let request = post_json("/api/ai_readiness_score_and_push", &payload);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("21"));
    assert!(message.contains("20"));
}

#[tokio::test]
async fn test_answer_out_of_range_reports_index() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let mut payload = ai_readiness_payload();
    let mut answers = vec![3; 21];
    answers[7] = 9;
    payload["answers"] = json!(answers);

    let request = post_json("/api/ai_readiness_score_and_push", &payload);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("index 7"));
    assert!(message.contains('9'));
}

#[tokio::test]
async fn test_digital_readiness_expects_28_answers() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let mut payload = ai_readiness_payload();
    let map = payload.as_object_mut().unwrap();
    map.remove("total_105");
    map.insert("total_140".into(), json!(84));

    let request = post_json("/api/digital_readiness_score_and_push", &payload);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("28"));
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/api/score_and_push", &json!([1, 2, 3]));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/api/score_and_push")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Latest-value reads
// =============================================================================

#[tokio::test]
async fn test_latest_is_empty_before_any_submission() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/api/tech_health_latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["score"], 0);
    assert_eq!(body["max"], 500);
    assert_eq!(body["level"], "");
    assert_eq!(body["timestamp"], "");
}

#[tokio::test]
async fn test_live_read_fails_without_query_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let response = app
        .oneshot(get_request("/api/tech_health_latest_live?customer=Contoso"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "SINK_UNAVAILABLE");
}

#[tokio::test]
async fn test_ai_readiness_latest_fails_without_query_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir);

    let response = app
        .oneshot(get_request("/api/ai_readiness_latest"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "SINK_UNAVAILABLE");
}
