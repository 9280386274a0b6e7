//! Build command implementation
//!
//! Runs the full pipeline (ingest, consolidate, write) and reports the
//! outcome either as a human summary or as JSON.

use super::shared::format_size;
use crate::cli::args::{BuildArgs, OutputFormat};
use crate::processor::{BuildReport, IndexBuilder};
use anyhow::{Context, Result, bail};
use colored::*;
use indicatif::HumanDuration;
use tracing::{error, info};

/// Run the build command
pub async fn run_build(args: BuildArgs) -> Result<()> {
    let config = args.to_config().context("invalid build options")?;
    info!("Building frequency index from {}", args.input.display());

    let builder = IndexBuilder::new(&args.input, config)?;
    let report = builder.build().await?;

    match args.output_format {
        OutputFormat::Human if !args.quiet => print_human_report(&report),
        OutputFormat::Human => {}
        OutputFormat::Json => print_json_report(&report)?,
    }

    if !report.success() {
        for failure in &report.write.failures {
            error!("{}", failure);
        }
        bail!(
            "{} region file(s) could not be written",
            report.write.failures.len()
        );
    }
    Ok(())
}

fn print_human_report(report: &BuildReport) {
    let parse = &report.ingest.parse;

    println!("\n🐦 {}", "Frequency Index Complete!".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Ingestion Summary:");
    println!("   • Data lines read: {}", parse.total_lines);
    println!("   • Observations parsed: {}", parse.observations_parsed);
    println!("   • Observations filtered: {}", parse.observations_filtered);
    println!("   • Observations aggregated: {}", parse.observations_aggregated());
    println!("   • Lines skipped: {}", parse.lines_skipped);
    println!("   • Success rate: {:.1}%", parse.success_rate());
    println!("   • Bytes read: {}", format_size(report.ingest.bytes_read));
    println!("   • Regions: {}", report.ingest.regions);
    println!("   • Species: {}", report.ingest.species);
    match report.ingest.reference_year {
        Some(year) => println!("   • Reference year: {}", year),
        None => println!("   • Reference year: none"),
    }
    if let Some(lines) = report.ingest.subset_lines {
        println!("   • Region subset lines: {}", lines);
    }

    println!("\n📁 Output:");
    println!("   • Directory: {}", report.output_dir.display());
    println!("   • Region files: {}", report.write.regions_written);
    println!("   • Pruned parents: {}", report.write.pruned.len());
    println!("   • Total size: {}", format_size(report.write.bytes_written));
    println!("   • Processing time: {}", HumanDuration(report.elapsed));

    if parse.total_lines > 0 && !parse.is_successful() {
        println!(
            "\n⚠️  {}",
            "More than 10% of lines could not be parsed".bright_yellow()
        );
    }
    if !parse.errors.is_empty() {
        println!("\n⚠️  First parse errors:");
        for message in parse.errors.iter().take(5) {
            println!("   • {}", message);
        }
    }
    if !report.write.failures.is_empty() {
        println!(
            "⚠️  {} {}",
            "Write failures:".bright_red(),
            report.write.failures.len().to_string().bright_red().bold()
        );
    }

    println!();
}

fn print_json_report(report: &BuildReport) -> Result<()> {
    let summary = serde_json::json!({
        "ingest": report.ingest,
        "output_dir": report.output_dir,
        "regions_written": report.write.regions_written,
        "bytes_written": report.write.bytes_written,
        "pruned": report.write.pruned,
        "failures": report.write.failures.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "elapsed_seconds": report.elapsed.as_secs_f64(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
