//! CLI subcommands and shared output formatting.

pub mod config;
pub mod parse;
pub mod scan;

use std::fs;
use std::path::Path;

use console::style;

use chit_core::models::config::ChitConfig;
use chit_core::models::receipt::ParsedReceipt;

/// Output format shared by the parse and scan commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per line item)
    Csv,
    /// Plain text summary
    Text,
}

pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<ChitConfig> {
    match config_path {
        Some(path) => Ok(ChitConfig::from_file(Path::new(path))?),
        None => Ok(ChitConfig::default()),
    }
}

/// Print warnings and validation issues to stderr, then write the
/// formatted receipt to the output file or stdout.
pub(crate) fn emit(
    receipt: &ParsedReceipt,
    warnings: &[String],
    format: OutputFormat,
    output: Option<&Path>,
    validate: bool,
) -> anyhow::Result<()> {
    for warning in warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if validate {
        let issues = receipt.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let formatted = format_receipt(receipt, format)?;

    if let Some(path) = output {
        fs::write(path, &formatted)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

fn format_receipt(receipt: &ParsedReceipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => format_csv(receipt),
        OutputFormat::Text => Ok(format_text(receipt)),
    }
}

fn format_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["store", "item", "quantity", "price"])?;

    let store = receipt.store_name.clone().unwrap_or_default();
    for item in &receipt.items {
        let quantity = item.quantity.to_string();
        let price = item.price.to_string();
        wtr.write_record([store.as_str(), item.name.as_str(), &quantity, &price])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(receipt: &ParsedReceipt) -> String {
    let mut output = String::new();

    if let Some(store) = &receipt.store_name {
        output.push_str(&format!("Store: {}\n\n", store));
    }

    output.push_str("Items:\n");
    for item in &receipt.items {
        if item.quantity > 1 {
            output.push_str(&format!(
                "  {} x{}  {}\n",
                item.name, item.quantity, item.price
            ));
        } else {
            output.push_str(&format!("  {}  {}\n", item.name, item.price));
        }
    }
    output.push('\n');

    if let Some(subtotal) = receipt.subtotal {
        output.push_str(&format!("Subtotal: {}\n", subtotal));
    }
    if let Some(tax) = receipt.tax_amount {
        output.push_str(&format!("Tax: {}\n", tax));
    }
    if let Some(total) = receipt.total {
        output.push_str(&format!("Total: {}\n", total));
    }

    output
}
