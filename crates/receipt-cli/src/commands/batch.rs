//! Batch processing command for multiple annotation files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use receipt_core::extract::ExtractionResult;
use receipt_core::{MemoryReceiptDatabase, Receipt, ReceiptDatabase, ReceiptFieldExtractor};

use super::extract::{amount_cell, format_summary, OutputFormat};
use super::{load_config, load_input, INPUT_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Owner recorded on every receipt
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<ExtractionResult, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            INPUT_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = ReceiptFieldExtractor::from_config(&config.extraction);
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let extractor = extractor.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let task_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                load_input(&task_path).map(|input| extractor.extract_with_report(&input.document))
            })
            .await?;
            anyhow::Ok(ProcessResult {
                path,
                outcome: outcome.map_err(|e| e.to_string()),
            })
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined??;

        if let Err(message) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                tasks.abort_all();
                anyhow::bail!("Processing failed: {}", message);
            }
        }

        progress.inc(1);
        results.push(result);
    }

    progress.finish_with_message("Complete");

    // Keep output and database order independent of completion order
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let db = MemoryReceiptDatabase::new();
    let date_format = &config.records.display_date_format;

    for result in &results {
        let Ok(extraction) = &result.outcome else {
            continue;
        };

        let receipt = Receipt::from_summary(
            result.path.display().to_string(),
            args.user.as_str(),
            &extraction.summary,
            date_format,
        );
        let id = db.add_receipt(&receipt)?;
        debug!("Stored {} as receipt {}", result.path.display(), id);

        if let Some(output_dir) = &args.output_dir {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");
            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_summary(&extraction.summary, args.format, &config.records.currency)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        let receipts = db.list_receipts_by_user(&args.user)?;
        write_summary(&summary_path, &receipts, &results, &config.records.currency)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let complete = results
        .iter()
        .filter(|r| matches!(&r.outcome, Ok(e) if e.misses.is_empty()))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} stored ({} with every field), {} failed",
        style(db.len()?).green(),
        complete,
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    db.close()?;
    Ok(())
}

/// Write stored receipts in date order, then failed files.
fn write_summary(
    path: &Path,
    receipts: &[Receipt],
    results: &[ProcessResult],
    currency: &str,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "file",
        "status",
        "date",
        "subtotal",
        "tax",
        "total",
        "currency",
        "error",
    ])?;

    for receipt in receipts {
        wtr.write_record(&[
            receipt.id.to_string(),
            receipt.url.clone(),
            "success".to_string(),
            receipt.display_date.clone(),
            amount_cell(receipt.subtotal),
            amount_cell(receipt.tax),
            amount_cell(receipt.total),
            currency.to_string(),
            String::new(),
        ])?;
    }

    for result in results {
        if let Err(message) = &result.outcome {
            wtr.write_record(&[
                String::new(),
                result.path.display().to_string(),
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                message.clone(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
