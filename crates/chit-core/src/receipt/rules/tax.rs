//! Tax multiplier inference.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::patterns::{TAX_RATE_PERCENT, TAX_RATE_RATIO};

/// Derive the effective tax multiplier from the receipt text.
///
/// Computed once per parse over the entire text. An explicit percentage
/// ("TAX1 9.3750 %") takes precedence; a taxable-amount/tax-amount pair
/// ("SALES TAX 10.13 0.95") is the fallback. Percentages above 1 are
/// normalized from percent to fraction. Returns `None` when neither
/// pattern is present or the taxable amount is zero; no line item is ever
/// tax-adjusted in that case.
pub fn derive_tax_multiplier(text: &str) -> Option<Decimal> {
    let upper = text.to_uppercase();

    if let Some(caps) = TAX_RATE_PERCENT.captures(&upper) {
        if let Ok(percent) = Decimal::from_str(&caps[1]) {
            let rate = if percent < Decimal::ONE {
                percent
            } else {
                percent / Decimal::from(100)
            };
            debug!(%rate, "tax multiplier from explicit percentage");
            return Some(Decimal::ONE + rate);
        }
    }

    if let Some(caps) = TAX_RATE_RATIO.captures(&upper) {
        if let (Ok(taxable), Ok(tax)) =
            (Decimal::from_str(&caps[1]), Decimal::from_str(&caps[2]))
        {
            if taxable > Decimal::ZERO {
                let rate = tax / taxable;
                debug!(%rate, "tax multiplier from taxable/tax ratio");
                return Some(Decimal::ONE + rate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_percentage_normalized() {
        assert_eq!(
            derive_tax_multiplier("TAX1 9.3750 % 0.65"),
            Some(dec("1.09375"))
        );
    }

    #[test]
    fn test_fractional_percentage_taken_as_is() {
        assert_eq!(
            derive_tax_multiplier("TAX1 0.095 % 0.65"),
            Some(dec("1.095"))
        );
    }

    #[test]
    fn test_ratio_fallback() {
        let multiplier = derive_tax_multiplier("Sales Tax 10.00 0.95").unwrap();
        assert_eq!(multiplier, dec("1.095"));
    }

    #[test]
    fn test_percentage_precedes_ratio() {
        let text = "TAX1 9.3750 % 0.65\nSALES TAX 10.00 0.50";
        assert_eq!(derive_tax_multiplier(text), Some(dec("1.09375")));
    }

    #[test]
    fn test_zero_taxable_amount_guarded() {
        assert_eq!(derive_tax_multiplier("SALES TAX 0.00 0.95"), None);
    }

    #[test]
    fn test_no_tax_data_is_none() {
        assert_eq!(derive_tax_multiplier("TOTAL 33.40\nSUBTOTAL 32.75"), None);
        assert_eq!(derive_tax_multiplier(""), None);
    }
}
