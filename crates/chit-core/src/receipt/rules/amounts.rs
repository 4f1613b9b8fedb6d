//! Total, subtotal, and tax amount extraction.
//!
//! Each extractor runs independently over the full, un-windowed text.
//! Pattern tables are tried in order; the first match that passes its
//! validator wins.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::patterns::{SUBTOTAL_PATTERNS, TAX_PATTERNS, TOTAL_PATTERNS};

/// Extract the labeled total amount.
pub fn extract_total(text: &str) -> Option<Decimal> {
    let upper = text.to_uppercase();

    for pattern in TOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&upper) {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if !outside_subtotal(&upper, start) {
                debug!("total candidate rejected: label is part of SUBTOTAL");
                continue;
            }
            if let Ok(total) = Decimal::from_str(&caps[1]) {
                return Some(total);
            }
        }
    }

    None
}

/// The matched total label must not be the tail of a SUBTOTAL label.
fn outside_subtotal(upper: &str, match_start: usize) -> bool {
    !upper[..match_start].ends_with("SUB") && !upper[..match_start].ends_with("SUB-")
}

/// Extract the subtotal: labeled amount first, otherwise derived as
/// `total - tax` when both are known and the result is positive.
pub fn extract_subtotal(
    text: &str,
    total: Option<Decimal>,
    tax: Option<Decimal>,
) -> Option<Decimal> {
    let upper = text.to_uppercase();

    for pattern in SUBTOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&upper) {
            if let Ok(subtotal) = Decimal::from_str(&caps[1]) {
                return Some(subtotal);
            }
        }
    }

    if let (Some(total), Some(tax)) = (total, tax) {
        let derived = total - tax;
        if derived > Decimal::ZERO {
            debug!("subtotal derived from total - tax");
            return Some(derived.round_dp(2));
        }
    }

    None
}

/// Extract the labeled tax amount. Tax is only ever read directly, never
/// derived from total and subtotal.
pub fn extract_tax(text: &str) -> Option<Decimal> {
    let upper = text.to_uppercase();

    for pattern in TAX_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&upper) {
            if let Ok(tax) = Decimal::from_str(&caps[1]) {
                return Some(tax);
            }
        }
    }

    None
}
