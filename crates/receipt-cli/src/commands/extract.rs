//! Extract command - read fields from a single annotation file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use receipt_core::{ReceiptFieldExtractor, ReceiptSummary};

use super::{load_config, load_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR annotation JSON or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which fields could not be extracted and why
    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let input = load_input(&args.input)?;
    let extractor = ReceiptFieldExtractor::from_config(&config.extraction);
    let result = extractor.extract_with_report(&input.document);
    if result.summary.is_empty() {
        warn!("No receipt fields found in {}", args.input.display());
    }

    let output = format_summary(&result.summary, args.format, &config.records.currency)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.report {
        eprintln!();
        if result.misses.is_empty() {
            eprintln!("{} All fields extracted", style("✓").green());
        } else {
            eprintln!("{}", style("Missing fields:").yellow());
            for miss in &result.misses {
                eprintln!("  - {}", miss);
            }
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_summary(summary: &ReceiptSummary, format: OutputFormat, currency: &str) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Csv => format_csv(summary, currency),
        OutputFormat::Text => Ok(format_text(summary, currency)),
    }
}

fn format_csv(summary: &ReceiptSummary, currency: &str) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "subtotal", "tax", "total", "currency"])?;
    wtr.write_record(&[
        summary.date.map(|d| d.to_string()).unwrap_or_default(),
        amount_cell(summary.subtotal),
        amount_cell(summary.tax),
        amount_cell(summary.total),
        currency.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(summary: &ReceiptSummary, currency: &str) -> String {
    let amount = |value: Option<Decimal>| match value {
        Some(v) => format!("{} {}", v, currency),
        None => "-".to_string(),
    };

    let mut output = String::new();
    output.push_str(&format!(
        "Date:     {}\n",
        summary.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("Subtotal: {}\n", amount(summary.subtotal)));
    output.push_str(&format!("Tax:      {}\n", amount(summary.tax)));
    output.push_str(&format!("Total:    {}", amount(summary.total)));
    output
}

pub fn amount_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
