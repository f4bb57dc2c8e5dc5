//! Regions command - locate field labels over flat annotations.

use std::path::PathBuf;

use clap::Args;
use console::style;

use receipt_core::extract::rules::LabelRegion;
use receipt_core::ReceiptFieldExtractor;

use super::{load_config, load_input};

/// Arguments for the regions command.
#[derive(Args)]
pub struct RegionsArgs {
    /// Provider response JSON carrying `textAnnotations`
    #[arg(required = true)]
    input: PathBuf,

    /// Print JSON instead of a text listing
    #[arg(long)]
    json: bool,
}

pub async fn run(args: RegionsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let input = load_input(&args.input)?;

    if input.annotations.is_empty() {
        anyhow::bail!(
            "No flat text annotations in {}",
            args.input.display()
        );
    }

    let regions = ReceiptFieldExtractor::from_config(&config.extraction).locate_labels(&input.annotations);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    print_region("total", regions.total.as_ref());
    print_region("subtotal", regions.subtotal.as_ref());

    Ok(())
}

fn print_region(name: &str, region: Option<&LabelRegion>) {
    let Some(region) = region else {
        println!("{} {}: not found", style("✗").red(), name);
        return;
    };

    match (region.region.bounds(), region.region.center()) {
        (Some((x1, y1, x2, y2)), Some((cx, cy))) => println!(
            "{} {}: {:?} at ({}, {})-({}, {}), center ({:.1}, {:.1})",
            style("✓").green(),
            name,
            region.text,
            x1,
            y1,
            x2,
            y2,
            cx,
            cy
        ),
        _ => println!("{} {}: {:?} (empty region)", style("✓").green(), name, region.text),
    }
}
