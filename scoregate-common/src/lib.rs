//! # Scoregate Common Library
//!
//! Shared code for the scoregate services including:
//! - Assessment kind profiles (required fields, answer counts, tier bands)
//! - Submission validation
//! - Row normalization (skew-guarded timestamps, derived tiers)
//! - Configuration loading
//! - Error types and time utilities

pub mod config;
pub mod error;
pub mod kind;
pub mod normalize;
pub mod time;
pub mod validate;

pub use error::{Error, Result};
pub use kind::AssessmentKind;
pub use normalize::{normalize, CanonicalRow, NormalizationError};
pub use validate::{validate, ValidationError};
