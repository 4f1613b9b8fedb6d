//! Scan command - OCR a receipt photo and structure the result.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use chit_core::receipt::{ReceiptParser, RuleReceiptParser};
use chit_ocr::{mime_for_path, OcrClient};

use super::{emit, load_config, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt photo (PNG, JPEG, WEBP, HEIC, or GIF)
    #[arg(required = true)]
    input: PathBuf,

    /// API key (default: GEMINI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the raw OCR text instead of structuring it
    #[arg(long)]
    raw: bool,

    /// Validate the structured receipt
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let client = match &args.api_key {
        Some(key) => OcrClient::new(key.clone(), config.ocr.clone())?,
        None => OcrClient::from_env(config.ocr.clone())?,
    };

    let image = fs::read(&args.input)?;
    let mime_type = mime_for_path(&args.input);
    info!("Scanning {} ({})", args.input.display(), mime_type);

    let text = client.extract_text(&image, mime_type).await?;

    if args.raw {
        println!("{}", text);
        return Ok(());
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
