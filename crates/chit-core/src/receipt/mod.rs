//! Receipt structuring module.

mod parser;
pub mod rules;

pub use parser::{normalize_newlines, ExtractionResult, ReceiptParser, RuleReceiptParser};
