//! Row normalization
//!
//! Turns a validated submission into the canonical, storage-ready row:
//! resolves the event timestamp through the skew guard, derives the IST
//! local timestamp and the maturity tier, and fills optional fields with
//! defaults. Pure given an explicit `now`; never reads the wall clock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::kind::AssessmentKind;
use crate::time::{format_ist, format_utc, resolve_event_time};

/// The validated, normalized, storage-ready representation of a submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRow(Map<String, Value>);

impl CanonicalRow {
    /// Field accessor (canonical rows are flat JSON objects)
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Serialize to one JSON object per line, the ingestion sink's wire shape
    pub fn to_ndjson_line(&self) -> String {
        let mut line = Value::Object(self.0.clone()).to_string();
        line.push('\n');
        line
    }

    /// The underlying field mapping
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl std::ops::Index<&str> for CanonicalRow {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.0.get(field).unwrap_or(&NULL)
    }
}

/// Normalization failures signal a logic bug (a field the validator
/// guaranteed is absent or mistyped), never a client-caused condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("field '{0}' absent after validation")]
    MissingField(&'static str),

    #[error("field '{0}' has an unexpected type after validation")]
    WrongFieldType(&'static str),
}

/// Normalize a validated submission into a [`CanonicalRow`].
///
/// `now` is the server-side wall clock at normalization time, passed in
/// explicitly for testability. Calling twice with identical inputs yields
/// identical output.
pub fn normalize(
    kind: AssessmentKind,
    raw: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<CanonicalRow, NormalizationError> {
    let client_ts = raw.get("timestamp").and_then(Value::as_str);
    let event_time = resolve_event_time(client_ts, now);

    let mut row = Map::new();
    row.insert("session_id".into(), require(raw, "session_id")?);
    row.insert("timestamp_utc".into(), json!(format_utc(event_time)));
    row.insert("timestamp_local_ist".into(), json!(format_ist(event_time)));
    row.insert("customer".into(), require(raw, "customer")?);
    row.insert("industry".into(), string_or_default(raw, "industry"));
    row.insert("participant_name".into(), require(raw, "participant_name")?);
    row.insert("participant_role".into(), require(raw, "participant_role")?);
    row.insert("org".into(), require(raw, "org")?);
    row.insert("notes".into(), string_or_default(raw, "notes"));
    row.insert("received_at_utc".into(), json!(format_utc(now)));

    let profile = kind.profile();
    let score = score_value(raw, profile.score_field)?;

    match kind {
        AssessmentKind::TechHealth => {
            // Assessment code is server-enforced, whatever the client sent
            row.insert("assessment_type".into(), json!("AIX"));
            row.insert("domains".into(), require(raw, "domains")?);
            row.insert(profile.score_field.into(), require(raw, profile.score_field)?);
            row.insert("level".into(), json!(kind.label_for_score(score)));
        }
        AssessmentKind::AiReadiness | AssessmentKind::DigitalReadiness => {
            row.insert("answers".into(), require(raw, "answers")?);
            row.insert(profile.score_field.into(), require(raw, profile.score_field)?);
            row.insert("percent".into(), require(raw, "percent")?);

            // A client-supplied tier is trusted as-is, never silently recomputed
            let band = kind.band_for_score(score);
            row.insert(
                "level".into(),
                supplied(raw, "level").unwrap_or_else(|| json!(band.level)),
            );
            row.insert(
                "maturity".into(),
                supplied(raw, "maturity").unwrap_or_else(|| json!(band.label)),
            );
        }
    }

    Ok(CanonicalRow(row))
}

/// Fetch a field the validator guaranteed is present
fn require(raw: &Map<String, Value>, field: &'static str) -> Result<Value, NormalizationError> {
    raw.get(field)
        .cloned()
        .ok_or(NormalizationError::MissingField(field))
}

/// Optional free-text field, null and absent both collapse to ""
fn string_or_default(raw: &Map<String, Value>, field: &str) -> Value {
    match raw.get(field) {
        Some(Value::String(s)) => json!(s),
        _ => json!(""),
    }
}

/// A client-supplied non-null value, if any
fn supplied(raw: &Map<String, Value>, field: &str) -> Option<Value> {
    match raw.get(field) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value.clone()),
    }
}

/// Total score as an integer for band lookup (floats compare the same way
/// against inclusive lower bounds after flooring)
fn score_value(raw: &Map<String, Value>, field: &'static str) -> Result<i64, NormalizationError> {
    let value = raw
        .get(field)
        .ok_or(NormalizationError::MissingField(field))?;
    value
        .as_f64()
        .map(|n| n.floor() as i64)
        .ok_or(NormalizationError::WrongFieldType(field))
}
