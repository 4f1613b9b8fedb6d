//! Configuration structures for the structuring pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ChitError, Result};

/// Main configuration for the chit pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChitConfig {
    /// Receipt parser configuration.
    pub parser: ParserConfig,

    /// External OCR service configuration.
    pub ocr: OcrServiceConfig,
}

/// Receipt parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Default tax rate reported on parsed receipts. Informational only:
    /// per-item tax adjustment uses the multiplier inferred from the
    /// receipt text, never this value.
    pub tax_rate: Decimal,

    /// Minimum length of a cleaned item name. Shorter fragments are
    /// treated as noise and produce no item.
    pub min_name_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            // 8% default, matching the most common local sales tax.
            tax_rate: Decimal::from_str("0.08").unwrap_or(Decimal::ZERO),
            min_name_length: 2,
        }
    }
}

/// Configuration for the external image-to-text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrServiceConfig {
    /// Model identifier sent to the service.
    pub model: String,

    /// Base URL of the generateContent-style API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of attempts for transient failures.
    pub max_attempts: u32,

    /// Initial backoff delay; doubles on each retry.
    pub initial_backoff_ms: u64,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-lite".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            timeout_secs: 60,
            max_attempts: 4,
            initial_backoff_ms: 500,
        }
    }
}

impl ChitConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ChitError::Config(format!("invalid config file: {}", e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
