//! Store name detection.

use super::patterns::STORE_PATTERNS;

/// Detect the retailer from the receipt text.
///
/// First match over a fixed ordered list of known retailer patterns
/// against the upper-cased text. Best-effort only: unlisted stores are
/// expected to return `None`, and the field is advisory.
pub fn detect_store(text: &str) -> Option<String> {
    let upper = text.to_uppercase();

    STORE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(&upper))
        .map(|m| m.as_str().trim().to_string())
}
