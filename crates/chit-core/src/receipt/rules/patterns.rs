//! Compiled regex tables for receipt field extraction.
//!
//! All patterns are written against upper-cased text; callers upper-case
//! lines (or the whole text) before matching. Ordered pattern vectors are
//! evaluated in sequence with first-match-wins semantics.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price embedded anywhere in a line ($12.99, 12.99, 12.99-).
    pub static ref PRICE: Regex = Regex::new(r"\$?\s*(\d+\.\d{2})\s*-?").unwrap();

    // A line that is nothing but a price.
    pub static ref BARE_PRICE: Regex = Regex::new(r"^\d+\.\d{2}\s*$").unwrap();

    // Total label patterns, tried in order. Word boundary keeps TOTAL from
    // matching inside SUBTOTAL; extraction additionally validates context.
    pub static ref TOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bTOTAL\s*:?\s*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"\bAMOUNT\s*DUE\s*:?\s*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"\bBALANCE\s*DUE\s+(\d+\.\d{2})").unwrap(),
        Regex::new(r"\bBALANCE\s*:?\s*\$?\s*(\d+\.\d{2})").unwrap(),
    ];

    // Subtotal label patterns, tried in order.
    pub static ref SUBTOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"SUBTOTAL[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"SUB[\s\-]*TOTAL[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"BEFORE\s*TAX[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
    ];

    // Tax amount patterns, tried in order: percentage line ("TAX1 9.3750
    // % 0.65"), taxable/tax pair ("SALES TAX 10.13 0.95"), then plain
    // labeled amounts.
    pub static ref TAX_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"TAX\d\s+\d+\.?\d*\s*%\s+(\d+\.\d{2})").unwrap(),
        Regex::new(r"SALES\s*TAX\s+\d+\.\d{2}\s+(\d+\.\d{2})").unwrap(),
        Regex::new(r"TAX[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"SALES\s*TAX[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"TAX\s*AMOUNT[\s:]*\$?\s*(\d+\.\d{2})").unwrap(),
    ];

    // Known retailer names, tried in order against the upper-cased text.
    pub static ref STORE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"COSTCO").unwrap(),
        Regex::new(r"WALMART").unwrap(),
        Regex::new(r"TARGET").unwrap(),
        Regex::new(r"WHOLE\s*FOODS").unwrap(),
        Regex::new(r"TRADER\s*JOE").unwrap(),
        Regex::new(r"SPROUTS").unwrap(),
        Regex::new(r"SAFEWAY").unwrap(),
        Regex::new(r"KROGER").unwrap(),
        Regex::new(r"PUBLIX").unwrap(),
    ];

    // Explicit tax percentage near a numbered tax label ("TAX1 9.3750 %").
    pub static ref TAX_RATE_PERCENT: Regex =
        Regex::new(r"TAX\d*\s+(\d+\.?\d*)\s*%").unwrap();

    // Taxable-amount / tax-amount pair ("SALES TAX 10.13 0.95").
    pub static ref TAX_RATE_RATIO: Regex =
        Regex::new(r"SALES\s*TAX\s+(\d+\.\d{2})\s+(\d+\.\d{2})").unwrap();

    // End-of-items section markers.
    pub static ref TAX_REPORT: Regex = Regex::new(r"TAX\s+REPORT").unwrap();
    pub static ref SUBTOTAL_LINE: Regex = Regex::new(r"^\s*SUBTOTAL").unwrap();

    // Voided entry marker.
    pub static ref VOID_MARKER: Regex =
        Regex::new(r"VOIDED\s+ENTRY|\*\*\s*VOIDED").unwrap();

    // CRV/deposit fee line ("*CRV FS/TX 05 0.05 T").
    pub static ref CRV_LINE: Regex =
        Regex::new(r"\*CRV.*?(\d+\.\d{2})\s*([TXN]?)").unwrap();

    // Quantity/unit-price continuation line ("2 @ 3.99").
    pub static ref QUANTITY_PRICE: Regex =
        Regex::new(r"^(\d+)\s*@\s*\$?\s*(\d+\.\d{2})\s*$").unwrap();

    // Promotion line ("1 @ 2 FOR 4.00").
    pub static ref PROMOTION: Regex =
        Regex::new(r"^\d+\s*@\s*\d+\s+FOR\s+\d+\.\d{2}").unwrap();

    // Weight continuation line ("1.000 OZ @ 1 OZ /5.97 5.97 N"). Captures
    // the unit price and the line price; the trailing letter is the tax
    // indicator for the line price.
    pub static ref WEIGHT_PRICE: Regex =
        Regex::new(r"(\d+\.\d+)\s*(OZ|LB|KG|G)\s*@.*?/(\d+\.\d{2})\s+(\d+\.\d{2})\s*([TXN]?)").unwrap();

    // A line opening with a weight measurement.
    pub static ref WEIGHT_START: Regex =
        Regex::new(r"^\d+\.?\d*\s*(OZ|LB|KG|G)\s*@").unwrap();

    // Weight measurement anywhere in the line (voided-entry continuation).
    pub static ref WEIGHT_AT: Regex =
        Regex::new(r"\d+\.\d+\s*(OZ|LB|KG|G)\s*@").unwrap();

    // Trailing tax-class letter.
    pub static ref TAX_FLAG: Regex = Regex::new(r"\s+([TXN])\s*$").unwrap();

    // Embedded product code (UPC and friends).
    pub static ref PRODUCT_CODE: Regex = Regex::new(r"\d{12,}").unwrap();

    // At least two consecutive letters, the cheapest "has a word" test.
    pub static ref LETTER_RUN: Regex = Regex::new(r"[A-Z]{2,}").unwrap();

    // Quantity prefix on an item name ("2 x APPLES").
    pub static ref QUANTITY_PREFIX: Regex =
        Regex::new(r"^(\d+)\s*[xX×]\s*").unwrap();

    // Name cleanup pieces.
    pub static ref TRAILING_SINGLE_LETTER: Regex =
        Regex::new(r"\s+[A-Z]\s*$").unwrap();
    pub static ref LEADING_JUNK: Regex = Regex::new(r"^[\d\W]+").unwrap();
    pub static ref TRAILING_JUNK: Regex = Regex::new(r"\W+$").unwrap();
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Exact category-header tokens (department labels with no price).
pub const CATEGORY_HEADERS: &[&str] =
    &["GROCERY", "VITAMINS", "PRODUCE", "MEAT", "DAIRY", "BAKERY"];

/// Keywords marking tender and transaction-reference lines.
pub const PAYMENT_KEYWORDS: &[&str] = &[
    "VISA",
    "MASTERCARD",
    "AMEX",
    "DISCOVER",
    "CASH",
    "CHECK",
    "TEND",
    "PAYMENT",
    "CHANGE DUE",
    "REF #",
    "TRANS ID",
    "VALIDATION",
    "AID",
    "TERMINAL",
    "APPR#",
    "CREDIT",
    "DEBIT",
    "CARD",
];

/// Keywords marking totals-section and store-metadata lines.
pub const METADATA_KEYWORDS: &[&str] = &[
    "TOTAL",
    "SUBTOTAL",
    "TAX1",
    "TAX",
    "AMOUNT",
    "BALANCE",
    "THANK YOU",
    "CASHIER",
    "DATE",
    "TIME",
    "PHONE",
    "ADDRESS",
    "STORE",
    "RECEIPT",
    "MEMBER",
    "CARD",
    "ITEMS SOLD",
    "TC#",
    "ST#",
    "OP#",
    "TE#",
    "TR#",
    "MGR",
    "MANAGER",
    "SURVEY",
    "FEEDBACK",
    "DELIVERY",
];

/// Labels that always begin a metadata line when followed by space/colon.
pub const METADATA_LINE_STARTS: &[&str] = &["TOTAL", "SUBTOTAL", "TAX1", "TAX"];

/// Keywords that disqualify a line from being an item name.
pub const FORBIDDEN_NAME_KEYWORDS: &[&str] =
    &["SUBTOTAL", "TOTAL", "TAX1", "TAX", "VISA", "CHANGE"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_word_boundary() {
        // \bTOTAL must not fire inside SUBTOTAL.
        assert!(TOTAL_PATTERNS[0].is_match("TOTAL 33.40"));
        assert!(!TOTAL_PATTERNS[0].is_match("SUBTOTAL 32.75"));
    }

    #[test]
    fn test_weight_price_captures() {
        let caps = WEIGHT_PRICE
            .captures("1.000 OZ @ 1 OZ /5.97 5.97 N")
            .unwrap();
        assert_eq!(&caps[3], "5.97");
        assert_eq!(&caps[4], "5.97");
        assert_eq!(&caps[5], "N");
    }

    #[test]
    fn test_crv_captures() {
        let caps = CRV_LINE.captures("*CRV FS/TX 05 0.05 T").unwrap();
        assert_eq!(&caps[1], "0.05");
        assert_eq!(&caps[2], "T");
    }

    #[test]
    fn test_quantity_price_rejects_promotion() {
        assert!(QUANTITY_PRICE.is_match("2 @ 3.99"));
        assert!(!QUANTITY_PRICE.is_match("1 @ 2 FOR 4.00"));
        assert!(PROMOTION.is_match("1 @ 2 FOR 4.00"));
    }

    #[test]
    fn test_plain_tax_pattern_skips_percentage_line() {
        // "TAX1 9.3750 % 0.65" must not be read as "TAX 1.xx".
        assert!(!TAX_PATTERNS[2].is_match("TAX1 9.3750 % 0.65"));
        assert!(TAX_PATTERNS[0].is_match("TAX1 9.3750 % 0.65"));
    }
}
