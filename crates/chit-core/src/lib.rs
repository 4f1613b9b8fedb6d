//! Core library for receipt text structuring.
//!
//! This crate provides:
//! - Rule-based extraction of line items from noisy OCR receipt text
//! - Total, subtotal, and tax amount extraction
//! - Tax multiplier inference and per-item tax adjustment
//! - Store detection and receipt data models

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{ChitError, Result};
pub use models::config::{ChitConfig, OcrServiceConfig, ParserConfig};
pub use models::receipt::{LineItem, ParsedReceipt, TaxIndicator};
pub use receipt::{ExtractionResult, ReceiptParser, RuleReceiptParser};
