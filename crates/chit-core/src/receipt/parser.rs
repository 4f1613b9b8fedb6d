//! Rule-based receipt parser: window bounding and the line-scanning item
//! extraction state machine.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ParserConfig;
use crate::models::receipt::{LineItem, ParsedReceipt, TaxIndicator};

use super::rules::amounts::{extract_subtotal, extract_tax, extract_total};
use super::rules::classify::{self, LineClass};
use super::rules::cleanup::{clean_item_name, extract_quantity};
use super::rules::patterns::{CATEGORY_HEADERS, SUBTOTAL_LINE, TAX_REPORT, WEIGHT_AT};
use super::rules::store::detect_store;
use super::rules::tax::derive_tax_multiplier;

/// Result of structuring a receipt.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Structured receipt. Always populated, even for garbage input.
    pub receipt: ParsedReceipt,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsers.
pub trait ReceiptParser {
    /// Structure raw OCR text. Never fails: malformed input degrades to an
    /// empty receipt.
    fn parse(&self, raw_text: &str) -> ExtractionResult;
}

/// Scan position relative to a voided entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Normal rule evaluation.
    Scanning,
    /// The current line is the voided item itself.
    SkippingVoidedItem,
    /// Past the voided item; a weight/price continuation may follow before
    /// scanning resumes at the next line that resembles a genuine item.
    SkippingVoidedContinuation,
}

/// Tax bookkeeping for the most recently appended item. `adjusted` means
/// the stored price is final; a pending item still carries its base price
/// awaiting a possible CRV correction.
#[derive(Debug, Clone, Copy)]
struct LastItemTax {
    indicator: Option<TaxIndicator>,
    adjusted: bool,
}

/// Rule-based, order-sensitive line-scanning parser.
pub struct RuleReceiptParser {
    config: ParserConfig,
}

impl RuleReceiptParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser from explicit configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Set the default tax rate reported on parsed receipts.
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.config.tax_rate = tax_rate;
        self
    }

    fn extract_items(&self, text: &str, multiplier: Option<Decimal>) -> Vec<LineItem> {
        let lines: Vec<&str> = text.lines().collect();
        let (start, end) = bound_window(&lines);
        debug!(start, end, total_lines = lines.len(), "item scan window");

        let window = &lines[start..end];

        let mut items: Vec<LineItem> = Vec::new();
        let mut last_tax: Option<LastItemTax> = None;
        let mut state = ScanState::Scanning;

        let mut i = 0;
        while i < window.len() {
            let line = window[i].trim();
            let upper = line.to_uppercase();

            match state {
                ScanState::SkippingVoidedItem => {
                    state = ScanState::SkippingVoidedContinuation;
                    i += 1;
                    continue;
                }
                ScanState::SkippingVoidedContinuation => {
                    if WEIGHT_AT.is_match(&upper) {
                        // Weight/price continuation of the voided item.
                        state = ScanState::Scanning;
                        i += 1;
                        continue;
                    }
                    if !classify::resembles_item(&upper) {
                        i += 1;
                        continue;
                    }
                    // A genuine item; resume rule evaluation on this line.
                    state = ScanState::Scanning;
                }
                ScanState::Scanning => {}
            }

            match classify::classify(line) {
                LineClass::Blank
                | LineClass::Metadata
                | LineClass::CategoryHeader
                | LineClass::Promotion => {}

                LineClass::VoidMarker => {
                    state = ScanState::SkippingVoidedItem;
                }

                LineClass::CrvFee { amount, indicator } => {
                    attach_crv(&mut items, &mut last_tax, amount, indicator, multiplier);
                }

                LineClass::QuantityPrice {
                    quantity,
                    unit_price,
                } => {
                    if let Some(item) = items.last_mut() {
                        item.quantity = quantity;
                        item.price = (unit_price * Decimal::from(quantity)).round_dp(2);
                    }
                }

                LineClass::InlineItem {
                    name,
                    price,
                    indicator,
                } => {
                    if let Some(item) = self.build_item(&name, price) {
                        let crv_follows = is_crv_line(window.get(i + 1));
                        push_item(
                            &mut items,
                            &mut last_tax,
                            item,
                            indicator,
                            crv_follows,
                            multiplier,
                        );
                    }
                }

                LineClass::Other => {
                    // Two-line shapes: name on this line, price on the next.
                    if let Some(next) = window.get(i + 1) {
                        let next = next.trim();
                        let next_upper = next.to_uppercase();

                        if let Some((price, indicator)) = classify::weight_price(&next_upper) {
                            if let Some(item) = self.build_item(line, price) {
                                let crv_follows = is_crv_line(window.get(i + 2));
                                push_item(
                                    &mut items,
                                    &mut last_tax,
                                    item,
                                    indicator,
                                    crv_follows,
                                    multiplier,
                                );
                                i += 1; // consume the weight/price line
                            }
                        } else if classify::looks_like_item_name(&upper) {
                            if let Some((price, _)) = classify::find_price(next) {
                                let indicator = classify::trailing_indicator(&next_upper);
                                if let Some(item) = self.build_item(line, price) {
                                    let crv_follows = is_crv_line(window.get(i + 2));
                                    push_item(
                                        &mut items,
                                        &mut last_tax,
                                        item,
                                        indicator,
                                        crv_follows,
                                        multiplier,
                                    );
                                    i += 1; // consume the price line
                                }
                            }
                        }
                    }
                }
            }

            i += 1;
        }

        items
    }

    /// Build a line item from a raw name fragment, or `None` when the
    /// fragment cleans down to noise.
    fn build_item(&self, raw_name: &str, price: Decimal) -> Option<LineItem> {
        let (quantity, name) = extract_quantity(raw_name);
        let name = clean_item_name(&name);

        if name.len() < self.config.min_name_length {
            return None;
        }
        if classify::is_payment_line(&name.to_uppercase()) {
            return None;
        }

        Some(LineItem {
            name,
            price,
            quantity,
        })
    }
}

impl Default for RuleReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for RuleReceiptParser {
    fn parse(&self, raw_text: &str) -> ExtractionResult {
        let started = Instant::now();
        let text = normalize_newlines(raw_text);

        info!(chars = text.len(), "structuring receipt text");

        let store_name = detect_store(&text);
        let multiplier = derive_tax_multiplier(&text);
        let items = self.extract_items(&text, multiplier);
        let total = extract_total(&text);
        let tax_amount = extract_tax(&text);
        let subtotal = extract_subtotal(&text, total, tax_amount);

        let mut warnings = Vec::new();
        if store_name.is_none() {
            warnings.push("Could not detect store name".to_string());
        }
        if items.is_empty() {
            warnings.push("No line items extracted".to_string());
        }
        if total.is_none() {
            warnings.push("Could not extract total".to_string());
        }

        debug!(
            items = items.len(),
            ?total,
            ?subtotal,
            ?tax_amount,
            "extraction complete"
        );

        ExtractionResult {
            receipt: ParsedReceipt {
                raw_text: text,
                items,
                total,
                subtotal,
                tax_amount,
                tax_rate: self.config.tax_rate,
                store_name,
            },
            warnings,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Normalize line endings: CRLF first, then doubled and single escaped
/// newline sequences as emitted by the OCR service.
pub fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace("\\\\n", "\n")
        .replace("\\n", "\n")
}

/// Bound the item-scanning window.
///
/// Start: the line after the first exact category-header line, if any.
/// End: the first tax-report marker line, else the first line beginning
/// with a subtotal label, else end of text. Lines outside this window
/// share lexical patterns with item lines and are excluded structurally.
fn bound_window(lines: &[&str]) -> (usize, usize) {
    let mut start = 0;
    for (idx, line) in lines.iter().enumerate() {
        if CATEGORY_HEADERS.contains(&line.trim().to_uppercase().as_str()) {
            start = idx + 1;
            break;
        }
    }

    let mut end = lines.len();
    let tax_report = lines
        .iter()
        .position(|line| TAX_REPORT.is_match(&line.to_uppercase()));
    if let Some(idx) = tax_report {
        end = idx;
    } else if let Some(idx) = lines
        .iter()
        .position(|line| SUBTOTAL_LINE.is_match(&line.to_uppercase()))
    {
        end = idx;
    }

    if start > end { (start, start) } else { (start, end) }
}

fn is_crv_line(line: Option<&&str>) -> bool {
    line.is_some_and(|l| l.to_uppercase().contains("*CRV"))
}

/// Append an item, applying the tax multiplier now unless a CRV line
/// follows; in that case the base price is kept and corrected when the
/// CRV rule fires on the next iteration.
fn push_item(
    items: &mut Vec<LineItem>,
    last_tax: &mut Option<LastItemTax>,
    mut item: LineItem,
    indicator: Option<TaxIndicator>,
    crv_follows: bool,
    multiplier: Option<Decimal>,
) {
    if !crv_follows {
        if let (Some(ind), Some(mult)) = (indicator, multiplier) {
            if ind.is_taxable() {
                item.price = (item.price * mult).round_dp(2);
            }
        }
    }

    *last_tax = Some(LastItemTax {
        indicator,
        adjusted: !crv_follows,
    });
    items.push(item);
}

/// Fold a CRV fee into the most recently appended item. Taxability of the
/// item and of the fee are read independently from their own indicators.
/// No separate line item is created for the fee.
fn attach_crv(
    items: &mut Vec<LineItem>,
    last_tax: &mut Option<LastItemTax>,
    amount: Decimal,
    crv_indicator: Option<TaxIndicator>,
    multiplier: Option<Decimal>,
) {
    let Some(item) = items.last_mut() else {
        debug!("CRV line with no preceding item, dropped");
        return;
    };

    let tax = last_tax.unwrap_or(LastItemTax {
        indicator: None,
        adjusted: true,
    });

    let mut item_part = item.price;
    if !tax.adjusted {
        if let (Some(ind), Some(mult)) = (tax.indicator, multiplier) {
            if ind.is_taxable() {
                item_part *= mult;
            }
        }
    }

    let mut crv_part = amount;
    if let (Some(ind), Some(mult)) = (crv_indicator, multiplier) {
        if ind.is_taxable() {
            crv_part *= mult;
        }
    }

    item.price = (item_part + crv_part).round_dp(2);
    *last_tax = Some(LastItemTax {
        indicator: tax.indicator,
        adjusted: true,
    });
}
