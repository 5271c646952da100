//! Common error types for scoregate

use thiserror::Error;

/// Common result type for scoregate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the scoregate services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Submission rejected by the validator (client-caused, never retried)
    #[error("Validation error: {0}")]
    Validation(#[from] crate::validate::ValidationError),

    /// Normalizer invariant broken (programmer error, not client-caused)
    #[error("Normalization error: {0}")]
    Normalization(#[from] crate::normalize::NormalizationError),

    /// Ingestion sink rejected a row or the transport failed
    #[error("Ingest error: {0}")]
    Ingest(String),
}
