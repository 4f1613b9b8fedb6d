//! Per-line classification for the item extraction scan.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::receipt::TaxIndicator;

use super::patterns::{
    BARE_PRICE, CATEGORY_HEADERS, CRV_LINE, FORBIDDEN_NAME_KEYWORDS, LETTER_RUN,
    METADATA_KEYWORDS, METADATA_LINE_STARTS, PAYMENT_KEYWORDS, PRICE, PRODUCT_CODE, PROMOTION,
    QUANTITY_PRICE, TAX_FLAG, VOID_MARKER, WEIGHT_PRICE, WEIGHT_START,
};

/// Category assigned to a single receipt line.
///
/// Two-line item shapes (name here, price on the next line) are not
/// classes of a single line; the scan handles them with lookahead when a
/// line falls through as [`LineClass::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace-only line.
    Blank,
    /// Voided-entry marker.
    VoidMarker,
    /// Tender, transaction-reference, or totals-section line.
    Metadata,
    /// Exact department label with no price.
    CategoryHeader,
    /// Promotion line of the shape `N @ M FOR $X.XX`; dropped, never
    /// attributed to an item.
    Promotion,
    /// Container-deposit fee to fold into the most recent item.
    CrvFee {
        amount: Decimal,
        indicator: Option<TaxIndicator>,
    },
    /// Quantity/unit-price continuation (`N @ $X.XX`) for the most
    /// recent item.
    QuantityPrice { quantity: u32, unit_price: Decimal },
    /// Name and price on the same line. `name` is the raw fragment before
    /// the price; cleanup happens in the scan.
    InlineItem {
        name: String,
        price: Decimal,
        indicator: Option<TaxIndicator>,
    },
    /// No single-line rule matched.
    Other,
}

/// Classify a trimmed receipt line.
pub fn classify(line: &str) -> LineClass {
    if line.is_empty() {
        return LineClass::Blank;
    }

    let upper = line.to_uppercase();

    if VOID_MARKER.is_match(&upper) {
        return LineClass::VoidMarker;
    }

    if is_payment_line(&upper) || is_metadata_line(&upper) {
        return LineClass::Metadata;
    }

    if CATEGORY_HEADERS.contains(&upper.as_str()) {
        return LineClass::CategoryHeader;
    }

    if PROMOTION.is_match(&upper) {
        return LineClass::Promotion;
    }

    if let Some(caps) = CRV_LINE.captures(&upper) {
        if let Ok(amount) = Decimal::from_str(&caps[1]) {
            let indicator = caps
                .get(2)
                .and_then(|m| m.as_str().chars().next())
                .and_then(TaxIndicator::from_letter);
            return LineClass::CrvFee { amount, indicator };
        }
    }

    if let Some(caps) = QUANTITY_PRICE.captures(&upper) {
        if let (Ok(quantity), Ok(unit_price)) =
            (caps[1].parse::<u32>(), Decimal::from_str(&caps[2]))
        {
            if quantity >= 1 {
                return LineClass::QuantityPrice {
                    quantity,
                    unit_price,
                };
            }
        }
    }

    if let Some((price, start)) = find_price(line) {
        return LineClass::InlineItem {
            name: line[..start].trim().to_string(),
            price,
            indicator: trailing_indicator(&upper),
        };
    }

    LineClass::Other
}

/// First embedded price in the line, with the byte offset where the match
/// begins (the item name is the text before it).
pub fn find_price(line: &str) -> Option<(Decimal, usize)> {
    let caps = PRICE.captures(line)?;
    let price = Decimal::from_str(caps.get(1)?.as_str()).ok()?;
    Some((price, caps.get(0)?.start()))
}

/// Trailing tax-class letter, if any.
pub fn trailing_indicator(upper: &str) -> Option<TaxIndicator> {
    TAX_FLAG
        .captures(upper)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(TaxIndicator::from_letter)
}

/// Parse a weight continuation line, returning the line price and its tax
/// indicator.
pub fn weight_price(upper: &str) -> Option<(Decimal, Option<TaxIndicator>)> {
    let caps = WEIGHT_PRICE.captures(upper)?;
    let price = Decimal::from_str(caps.get(4)?.as_str()).ok()?;
    let indicator = caps
        .get(5)
        .and_then(|m| m.as_str().chars().next())
        .and_then(TaxIndicator::from_letter);
    Some((price, indicator))
}

/// Tender and transaction-reference lines.
pub fn is_payment_line(upper: &str) -> bool {
    PAYMENT_KEYWORDS.iter().any(|kw| upper.contains(kw))
}

/// Totals-section and store-metadata lines. Lines that independently look
/// like an item name are exempt from the keyword containment check, so an
/// item such as "TAX-FREE ITEM 123456789012" is not swallowed.
pub fn is_metadata_line(upper: &str) -> bool {
    let starts_metadata = METADATA_LINE_STARTS.iter().any(|label| {
        upper
            .strip_prefix(label)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_whitespace() || c == ':')
    });
    if starts_metadata {
        return true;
    }

    if METADATA_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        return !looks_like_item_name(upper);
    }

    false
}

/// Tie-break gate for two-line items: the current line is item-bearing
/// only if it is not a bare price, not a weight line, carries none of the
/// forbidden metadata keywords, and contains either a word or an embedded
/// product code.
pub fn looks_like_item_name(upper: &str) -> bool {
    let trimmed = upper.trim();

    if WEIGHT_START.is_match(trimmed) || BARE_PRICE.is_match(trimmed) {
        return false;
    }

    if FORBIDDEN_NAME_KEYWORDS.iter().any(|kw| trimmed.contains(kw)) {
        return false;
    }

    LETTER_RUN.is_match(trimmed) || PRODUCT_CODE.is_match(trimmed)
}

/// A line that resembles a genuine item: an embedded product code or at
/// least two consecutive letters. Used to resume scanning after a voided
/// entry.
pub fn resembles_item(upper: &str) -> bool {
    PRODUCT_CODE.is_match(upper) || LETTER_RUN.is_match(upper)
}
