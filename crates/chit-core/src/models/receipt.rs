//! Receipt data model produced by the structuring engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single purchased line item.
///
/// `price` is always the line total (unit price times quantity), never a
/// per-unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Cleaned item name.
    pub name: String,

    /// Line total price.
    pub price: Decimal,

    /// Quantity purchased (at least 1).
    pub quantity: u32,
}

impl LineItem {
    /// Create a single-quantity line item.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: 1,
        }
    }
}

/// Structured record extracted from raw receipt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Normalized source text the fields were extracted from.
    pub raw_text: String,

    /// Line items in receipt order.
    pub items: Vec<LineItem>,

    /// Labeled total amount, if one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// Subtotal amount: labeled, or derived as `total - tax` when positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Labeled tax amount. Never derived from total/subtotal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,

    /// Configured default tax rate. Informational: item prices are
    /// adjusted with the per-receipt inferred multiplier, not this value.
    pub tax_rate: Decimal,

    /// Detected retailer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
}

impl ParsedReceipt {
    /// Create an empty receipt carrying only the normalized text.
    pub fn empty(raw_text: impl Into<String>, tax_rate: Decimal) -> Self {
        Self {
            raw_text: raw_text.into(),
            items: Vec::new(),
            total: None,
            subtotal: None,
            tax_amount: None,
            tax_rate,
            store_name: None,
        }
    }

    /// True when nothing useful was extracted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.total.is_none()
            && self.subtotal.is_none()
            && self.tax_amount.is_none()
            && self.store_name.is_none()
    }

    /// Validate the receipt data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for item in &self.items {
            if item.price < Decimal::ZERO {
                issues.push(format!("Negative price on item '{}'", item.name));
            }
            if item.quantity < 1 {
                issues.push(format!("Zero quantity on item '{}'", item.name));
            }
            if item.name.is_empty() {
                issues.push("Item with empty name".to_string());
            }
        }

        if let (Some(total), Some(subtotal)) = (self.total, self.subtotal) {
            if subtotal > total {
                issues.push(format!(
                    "Subtotal ({}) exceeds total ({})",
                    subtotal, total
                ));
            }
        }

        issues
    }
}

/// Trailing tax-class letter on an item, weight, or CRV line.
///
/// Registers print `T` or `X` on taxable amounts and `N` on exempt ones.
/// The letter governs whether that specific amount receives the inferred
/// tax multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxIndicator {
    /// `T` or `X`: the amount is taxed.
    Taxable,
    /// `N`: the amount is not taxed.
    NonTaxable,
}

impl TaxIndicator {
    /// Parse a trailing indicator letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'T' | 'X' => Some(TaxIndicator::Taxable),
            'N' => Some(TaxIndicator::NonTaxable),
            _ => None,
        }
    }

    pub fn is_taxable(self) -> bool {
        matches!(self, TaxIndicator::Taxable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tax_indicator_letters() {
        assert_eq!(TaxIndicator::from_letter('T'), Some(TaxIndicator::Taxable));
        assert_eq!(TaxIndicator::from_letter('X'), Some(TaxIndicator::Taxable));
        assert_eq!(TaxIndicator::from_letter('x'), Some(TaxIndicator::Taxable));
        assert_eq!(
            TaxIndicator::from_letter('N'),
            Some(TaxIndicator::NonTaxable)
        );
        assert_eq!(TaxIndicator::from_letter('F'), None);
        assert!(!TaxIndicator::NonTaxable.is_taxable());
    }

    #[test]
    fn test_validate_flags_negative_price() {
        let mut receipt = ParsedReceipt::empty("", Decimal::from_str("0.08").unwrap());
        receipt.items.push(LineItem {
            name: "BAD".to_string(),
            price: Decimal::from_str("-1.00").unwrap(),
            quantity: 1,
        });

        let issues = receipt.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Negative price"));
    }

    #[test]
    fn test_validate_subtotal_exceeding_total() {
        let mut receipt = ParsedReceipt::empty("", Decimal::from_str("0.08").unwrap());
        receipt.total = Some(Decimal::from_str("10.00").unwrap());
        receipt.subtotal = Some(Decimal::from_str("11.00").unwrap());

        assert!(!receipt.validate().is_empty());
    }

    #[test]
    fn test_empty_receipt_is_empty() {
        let receipt = ParsedReceipt::empty("garbage", Decimal::from_str("0.08").unwrap());
        assert!(receipt.is_empty());
        assert!(receipt.validate().is_empty());
    }
}
