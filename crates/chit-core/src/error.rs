//! Error types for the chit-core library.

use thiserror::Error;

/// Main error type for the chit-core library.
///
/// Receipt structuring itself never fails: malformed input degrades to an
/// empty [`crate::models::ParsedReceipt`]. Errors here cover the
/// surrounding plumbing only.
#[derive(Error, Debug)]
pub enum ChitError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the chit-core library.
pub type Result<T> = std::result::Result<T, ChitError>;
