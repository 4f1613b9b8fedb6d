//! Parse command - structure receipt text from a file or stdin.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use chit_core::receipt::{ReceiptParser, RuleReceiptParser};

use super::{emit, load_config, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate the structured receipt
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        fs::read_to_string(&path)?
    };

    if text.trim().is_empty() {
        anyhow::bail!("Input text is empty");
    }

    let parser = RuleReceiptParser::with_config(config.parser.clone());
    let result = parser.parse(&text);
    debug!("Structured in {}ms", result.processing_time_ms);

    emit(
        &result.receipt,
        &result.warnings,
        args.format,
        args.output.as_deref(),
        args.validate,
    )
}
