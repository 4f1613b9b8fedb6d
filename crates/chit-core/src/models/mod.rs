//! Data models for receipts and pipeline configuration.

pub mod config;
pub mod receipt;

pub use config::{ChitConfig, OcrServiceConfig, ParserConfig};
pub use receipt::{LineItem, ParsedReceipt, TaxIndicator};
