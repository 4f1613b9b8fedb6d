//! Gemini-backed OCR client with bounded retry.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use chit_core::models::config::OcrServiceConfig;

use crate::error::{OcrError, Result};
use crate::protocol::{GenerateContentRequest, GenerateContentResponse};

/// Client for the image-to-text service.
#[derive(Debug)]
pub struct OcrClient {
    client: Client,
    config: OcrServiceConfig,
    api_key: String,
}

impl OcrClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>, config: OcrServiceConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(OcrError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(model = %config.model, "OCR client initialized");
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Create a client reading the key from the `GEMINI_API_KEY`
    /// environment variable.
    pub fn from_env(config: OcrServiceConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        Self::new(api_key, config)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Extract raw text from a receipt image.
    ///
    /// Transient failures (rate limits, 5xx, timeouts, transport errors)
    /// are retried with a delay that doubles each attempt, up to
    /// `max_attempts`. Client-side errors fail immediately.
    pub async fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String> {
        let request = GenerateContentRequest::for_image(BASE64.encode(image), mime_type);

        let mut attempt = 1u32;
        loop {
            match self.send(&request).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    let delay = backoff_delay(self.config.initial_backoff_ms, attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "OCR request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<String> {
        debug!(model = %self.config.model, "sending OCR request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status == StatusCode::OK {
            let body: GenerateContentResponse = response.json().await.map_err(map_transport)?;
            let text = body.text().ok_or(OcrError::EmptyResponse)?;
            info!(chars = text.len(), "OCR text extracted");
            return Ok(text.trim().to_string());
        }

        let message = response.text().await.unwrap_or_default();
        Err(classify_status(status, message, &self.config.model))
    }
}

/// Delay before retry number `attempt` (1-based): the configured base
/// doubled once per completed attempt.
fn backoff_delay(initial_ms: u64, attempt: u32) -> Duration {
    let exponent = (attempt - 1).min(16);
    Duration::from_millis(initial_ms.saturating_mul(1u64 << exponent))
}

fn map_transport(err: reqwest::Error) -> OcrError {
    if err.is_timeout() {
        OcrError::Timeout
    } else {
        OcrError::Transport(err)
    }
}

fn classify_status(status: StatusCode, message: String, model: &str) -> OcrError {
    match status {
        StatusCode::BAD_REQUEST => OcrError::InvalidRequest(truncate_message(message)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OcrError::Unauthorized,
        StatusCode::NOT_FOUND => OcrError::ModelNotFound(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => OcrError::RateLimited,
        s if s.is_server_error() => OcrError::Unavailable {
            status: s.as_u16(),
            message: truncate_message(message),
        },
        s => OcrError::UnexpectedStatus {
            status: s.as_u16(),
            message: truncate_message(message),
        },
    }
}

/// Error bodies can be whole HTML pages; keep only the head.
fn truncate_message(mut message: String) -> String {
    const LIMIT: usize = 200;
    if message.len() > LIMIT {
        let mut cut = LIMIT;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    message
}

/// Guess the image MIME type from a file extension. Unknown extensions
/// fall back to PNG, the service's most common input.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_classification() {
        let model = "gemini-2.5-flash-lite";

        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "bad field".into(), model),
            OcrError::InvalidRequest(m) if m == "bad field"
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new(), model),
            OcrError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new(), model),
            OcrError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, String::new(), model),
            OcrError::ModelNotFound(m) if m == model
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new(), model),
            OcrError::RateLimited
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, String::new(), model),
            OcrError::Unavailable { status: 503, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::IM_A_TEAPOT, String::new(), model),
            OcrError::UnexpectedStatus { status: 418, .. }
        ));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(2000));
        // Saturates instead of overflowing on absurd attempt counts.
        assert_eq!(
            backoff_delay(u64::MAX, 40),
            Duration::from_millis(u64::MAX)
        );
    }

    #[test]
    fn test_message_truncated_at_char_boundary() {
        let long = "é".repeat(300);
        let truncated = truncate_message(long);
        assert!(truncated.len() <= 200);
        assert!(truncated.chars().all(|c| c == 'é'));

        assert_eq!(truncate_message("short".into()), "short");
    }

    #[test]
    fn test_endpoint_joins_base_url_and_model() {
        let config = OcrServiceConfig {
            base_url: "https://example.test/v1beta/models/".to_string(),
            ..OcrServiceConfig::default()
        };
        let client = OcrClient::new("key", config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = OcrClient::new("", OcrServiceConfig::default()).unwrap_err();
        assert!(matches!(err, OcrError::MissingApiKey));
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("r.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("r.JPEG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("r.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("r.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("receipt")), "image/png");
    }
}
