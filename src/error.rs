//! Error types for tsonorm
//!
//! The normalization stages themselves are fail-soft and infallible; errors
//! only arise at the loading boundary (JSON parsing, I/O in the CLI).

use thiserror::Error;

/// Errors that can occur while loading or emitting record batches
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse record batch: {0}")]
    ParseError(String),
}
