//! Submission validation
//!
//! Checks a raw, untrusted field mapping against the kind's profile before
//! normalization. Fails fast with a structured error carrying every detail
//! the caller needs for a precise client-facing message: the missing-field
//! check collects ALL absent names in one pass rather than stopping at the
//! first offender.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::kind::AssessmentKind;

/// Validation failures, always client-caused (4xx-equivalent, never retried)
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// One or more required fields absent; lists every missing name
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// `domains` is not an array, or an element is not an object carrying
    /// `name` and `score`
    #[error("each domain must be an object with 'name' and 'score'")]
    InvalidDomains,

    /// `answers` is present but not an array
    #[error("answers must be an array")]
    AnswersNotArray,

    /// `answers` has the wrong length for this survey
    #[error("answers must contain exactly {expected} values, got {actual}")]
    WrongAnswerCount { expected: usize, actual: usize },

    /// An answer is not an integer in 1..=5
    #[error("answer at index {index} must be an integer between 1 and 5, got {value}")]
    AnswerOutOfRange { index: usize, value: Value },

    /// The kind's total-score field is outside 0..=max
    #[error("{field} must be between 0 and {max}, got {value}")]
    ScoreOutOfRange { field: String, max: i64, value: Value },
}

/// Validate a raw submission against its kind's profile.
///
/// Deterministic and side-effect free. Order of checks: required fields
/// first (reported together), then kind-specific shape checks, then the
/// total-score bound.
pub fn validate(kind: AssessmentKind, raw: &Map<String, Value>) -> Result<(), ValidationError> {
    let profile = kind.profile();

    let missing: Vec<String> = profile
        .required_fields
        .iter()
        .filter(|name| !raw.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    match profile.answer_count {
        None => check_domains(raw)?,
        Some(expected) => check_answers(raw, expected)?,
    }

    check_score_bound(raw, profile.score_field, profile.max_score)?;

    Ok(())
}

/// `domains` must be an array of objects each carrying `name` and `score`
fn check_domains(raw: &Map<String, Value>) -> Result<(), ValidationError> {
    let domains = match raw.get("domains") {
        Some(Value::Array(items)) => items,
        _ => return Err(ValidationError::InvalidDomains),
    };

    for entry in domains {
        match entry {
            Value::Object(fields) if fields.contains_key("name") && fields.contains_key("score") => {}
            _ => return Err(ValidationError::InvalidDomains),
        }
    }

    Ok(())
}

/// `answers` must be exactly `expected` integers, each in 1..=5
fn check_answers(raw: &Map<String, Value>, expected: usize) -> Result<(), ValidationError> {
    let answers = match raw.get("answers") {
        Some(Value::Array(items)) => items,
        _ => return Err(ValidationError::AnswersNotArray),
    };

    if answers.len() != expected {
        return Err(ValidationError::WrongAnswerCount {
            expected,
            actual: answers.len(),
        });
    }

    for (index, value) in answers.iter().enumerate() {
        match value.as_i64() {
            Some(n) if (1..=5).contains(&n) => {}
            _ => {
                return Err(ValidationError::AnswerOutOfRange {
                    index,
                    value: value.clone(),
                })
            }
        }
    }

    Ok(())
}

/// Total score must be numeric and inside 0..=max
fn check_score_bound(
    raw: &Map<String, Value>,
    field: &str,
    max: i64,
) -> Result<(), ValidationError> {
    // Required-field check already guaranteed presence
    let value = raw.get(field).cloned().unwrap_or(Value::Null);

    let in_range = value
        .as_f64()
        .map(|n| n >= 0.0 && n <= max as f64)
        .unwrap_or(false);

    if !in_range {
        return Err(ValidationError::ScoreOutOfRange {
            field: field.to_string(),
            max,
            value,
        });
    }

    Ok(())
}
