//! Item name cleanup.

use super::patterns::{
    LEADING_JUNK, PRODUCT_CODE, QUANTITY_PREFIX, TRAILING_JUNK, TRAILING_SINGLE_LETTER,
    WHITESPACE_RUN,
};

/// Clean a raw item name fragment.
///
/// Order matters: product codes first, then the trailing weight/tax-class
/// letter, then leading and trailing junk runs, then whitespace collapse.
/// Applied identically regardless of which extraction rule produced the
/// name.
pub fn clean_item_name(name: &str) -> String {
    let name = PRODUCT_CODE.replace_all(name, "");
    let name = TRAILING_SINGLE_LETTER.replace_all(&name, "");
    let name = LEADING_JUNK.replace_all(&name, "");
    let name = TRAILING_JUNK.replace_all(&name, "");
    let name = WHITESPACE_RUN.replace_all(&name, " ");
    name.trim().to_string()
}

/// Extract an explicit quantity prefix ("2 x APPLES"), returning the
/// quantity and the name with the prefix stripped. Defaults to 1.
pub fn extract_quantity(name: &str) -> (u32, String) {
    if let Some(caps) = QUANTITY_PREFIX.captures(name) {
        if let Ok(quantity) = caps[1].parse::<u32>() {
            if quantity > 1 {
                let stripped = QUANTITY_PREFIX.replace(name, "").trim().to_string();
                return (quantity, stripped);
            }
        }
    }
    (1, name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_product_code() {
        assert_eq!(clean_item_name("LYCHEE 4889012345678"), "LYCHEE");
        assert_eq!(clean_item_name("CHOCOLATE 850041392020 F"), "CHOCOLATE");
    }

    #[test]
    fn test_strips_trailing_single_letter() {
        assert_eq!(clean_item_name("ROTH CREAMY F"), "ROTH CREAMY");
        // Only a single trailing letter is a weight/tax-class marker.
        assert_eq!(clean_item_name("VITAMIN D3"), "VITAMIN D3");
    }

    #[test]
    fn test_strips_leading_and_trailing_junk() {
        assert_eq!(clean_item_name("** SODA WATER **"), "SODA WATER");
        assert_eq!(clean_item_name("12 OZ SELTZER"), "OZ SELTZER");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_item_name("CHOC   PB    PROTEIN"), "CHOC PB PROTEIN");
    }

    #[test]
    fn test_cleaning_garbage_yields_empty() {
        assert_eq!(clean_item_name("4889012345678"), "");
        assert_eq!(clean_item_name("***"), "");
        assert_eq!(clean_item_name(""), "");
    }

    #[test]
    fn test_extract_quantity_prefix() {
        assert_eq!(extract_quantity("2 x APPLES"), (2, "APPLES".to_string()));
        assert_eq!(extract_quantity("3X BANANAS"), (3, "BANANAS".to_string()));
        assert_eq!(
            extract_quantity("2 × ORANGES"),
            (2, "ORANGES".to_string())
        );
        assert_eq!(extract_quantity("APPLES"), (1, "APPLES".to_string()));
        // A quantity of one is not a prefix worth stripping.
        assert_eq!(extract_quantity("1 x APPLES"), (1, "1 x APPLES".to_string()));
    }
}
