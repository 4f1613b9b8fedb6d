//! OCR service errors.

use thiserror::Error;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Errors from the image-to-text service.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("API key is required: set GEMINI_API_KEY or pass one explicitly")]
    MissingApiKey,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("model '{0}' not found")]
    ModelNotFound(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("service unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl OcrError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Unavailable { .. } | Self::Timeout | Self::Transport(_)
        )
    }
}
