//! Default command: extract references from a folder of invoices and update the spreadsheet.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invrec_core::models::config::{InvrecConfig, SpreadsheetConfig};
use invrec_core::models::reference::{DetectedReferences, ExtractionSummary, FileStatus};
use invrec_core::sheet::{reconcile, verify_saved, Workbook};
use invrec_core::{write_report_file, BatchEvent, BatchExtractor};

use super::config;

/// How many detected references get their invoice details printed.
const DETAIL_LIMIT: usize = 5;

/// Arguments for a reconciliation run.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Folder containing the invoice PDFs
    #[arg(required = true)]
    facturas_folder: Option<PathBuf>,

    /// Spreadsheet (.xlsx) updated in place
    #[arg(required = true)]
    excel_path: Option<PathBuf>,

    /// Path of the processing log
    #[arg(long = "log_file", visible_alias = "log-file", default_value = "output/log_facturas.txt")]
    log_file: PathBuf,

    /// Worksheet to update (defaults to the first one)
    #[arg(long)]
    sheet: Option<String>,

    /// Reconcile and report without writing the spreadsheet
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (Some(folder), Some(excel_path)) = (args.facturas_folder.as_deref(), args.excel_path.as_deref())
    else {
        anyhow::bail!("Both the invoice folder and the spreadsheet path are required");
    };

    let start = Instant::now();
    let mut config = config::load(config_path)?;
    if args.sheet.is_some() {
        config.spreadsheet.sheet_name = args.sheet.clone();
    }

    println!("{}", style("=== Invoice reconciliation ===").bold());
    println!("Invoice folder: {}", folder.display());
    println!("Spreadsheet:    {}", excel_path.display());
    println!("Log file:       {}", args.log_file.display());

    let summary = extract(folder, &config)?;

    write_report_file(&args.log_file, &summary)
        .with_context(|| format!("Failed to write log file {}", args.log_file.display()))?;

    print_extraction(&summary);

    update_spreadsheet(excel_path, &summary.detected, &config.spreadsheet, args.dry_run)
        .with_context(|| format!("Failed to update spreadsheet {}", excel_path.display()))?;

    println!();
    println!("{} Done in {:?}", style("✓").green(), start.elapsed());

    Ok(())
}

fn extract(folder: &Path, config: &InvrecConfig) -> anyhow::Result<ExtractionSummary> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let extractor = BatchExtractor::from_config(&config.extraction);
    let summary = extractor
        .extract_folder_with(folder, |event| match event {
            BatchEvent::Started { total } => {
                println!("{} Found {} PDF files to process", style("ℹ").blue(), total);
                pb.set_length(total as u64);
            }
            BatchEvent::Processing(path) => {
                if let Some(name) = path.file_name() {
                    pb.set_message(name.to_string_lossy().into_owned());
                }
            }
            BatchEvent::Finished(outcome) => {
                if let FileStatus::Failed(error) = &outcome.status {
                    debug!("{} failed: {}", outcome.file_name(), error);
                }
                pb.inc(1);
            }
        })
        .with_context(|| format!("Failed to process invoices in {}", folder.display()))?;

    pb.finish_and_clear();
    Ok(summary)
}

fn print_extraction(summary: &ExtractionSummary) {
    println!();
    println!(
        "{} Processed {} files: {} with references, {} to review",
        style("✓").green(),
        summary.outcomes.len(),
        style(summary.resolved_count()).green(),
        style(summary.needs_review().count()).yellow()
    );

    let detected = &summary.detected;
    if detected.is_empty() {
        println!();
        println!(
            "{} No order or case numbers were detected in the invoices.",
            style("⚠").yellow()
        );
        return;
    }

    print_references("Order numbers", &detected.orders, detected);
    print_references("Case numbers", &detected.cases, detected);
}

fn print_references(label: &str, numbers: &BTreeSet<String>, detected: &DetectedReferences) {
    if numbers.is_empty() {
        return;
    }

    println!();
    println!(
        "{} {} detected ({}):",
        style("✓").green(),
        label,
        numbers.len()
    );
    println!(
        "  {}",
        numbers.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    );

    for number in numbers.iter().take(DETAIL_LIMIT) {
        if let Some(meta) = detected.invoice_for(number) {
            println!(
                "  {} - invoice {} - issued {}",
                number,
                meta.folio,
                if meta.fecha.is_empty() { "-" } else { meta.fecha.as_str() }
            );
        }
    }
}

fn update_spreadsheet(
    path: &Path,
    detected: &DetectedReferences,
    config: &SpreadsheetConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut workbook = Workbook::open(path)?;
    let sheet = workbook.sheet_mut(config.sheet_name.as_deref())?;
    debug!("Columns in {}: {:?}", sheet.name, sheet.table.headers());

    let stats = reconcile(&mut sheet.table, detected, config)?;

    println!();
    println!(
        "{} Updated {} rows ({} by order, {} by case), {} unchanged",
        style("✓").green(),
        stats.updated(),
        stats.by_order,
        stats.by_case,
        stats.unchanged
    );

    if dry_run {
        println!(
            "{} Dry run, {} was not modified.",
            style("ℹ").blue(),
            path.display()
        );
        return Ok(());
    }

    workbook.save(path, &config.date_format)?;
    println!("{} Saved {}", style("✓").green(), path.display());

    let verified = verify_saved(path, config)?;
    println!(
        "  Verification: {} rows, {} with invoice number, {} with emission date",
        verified.rows, verified.with_invoice, verified.with_date
    );

    Ok(())
}
