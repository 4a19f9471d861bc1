//! Error types for runtime state handling.

use thiserror::Error;

/// Runtime error type.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// State document is not an object.
    #[error("invalid state: expected an object, got {found}")]
    InvalidState {
        /// JSON kind that was found.
        found: String,
    },
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
