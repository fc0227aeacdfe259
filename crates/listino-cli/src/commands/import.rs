//! Import command - parse, diff against history, and upsert as one batch.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use tracing::info;

use listino_core::{diff_against_snapshot, DiffKind, ImportMeta, InvoiceTextParser};

use super::Context;

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Input text file (UTF-8, as produced by the OCR/PDF collaborator)
    #[arg(required = true)]
    input: PathBuf,

    /// Document date (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Supplier label override (default: detected fingerprint)
    #[arg(long)]
    supplier: Option<String>,

    /// Show the diff without committing the batch
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: ImportArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    let result = InvoiceTextParser::with_config(ctx.config.parser.clone()).parse(&text);

    if result.records.is_empty() {
        println!("{} No product lines found, nothing to import", style("!").yellow());
        return Ok(());
    }

    let meta = ImportMeta {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        supplier: args.supplier.or(result.supplier),
    };

    let mut history = ctx.open_history();

    // The diff baseline must be the store exactly as it was before this
    // batch's own upsert.
    let snapshot = history.snapshot();
    let diff = diff_against_snapshot(&snapshot, &result.records);

    for entry in &diff {
        match entry.kind {
            DiffKind::Changed => {
                let delta = entry
                    .delta
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let percent = entry
                    .percent
                    .map(|p| format!(" ({}%)", p))
                    .unwrap_or_default();
                println!(
                    "{} {:<40} {} -> {}  {}{}",
                    style("~").yellow(),
                    entry.name,
                    entry.old_price.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                    entry.new_price.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                    delta,
                    percent
                );
            }
            DiffKind::New => {
                println!(
                    "{} {:<40} {}",
                    style("+").green(),
                    entry.name,
                    entry.new_price.map(|p| p.to_string()).unwrap_or_else(|| "-".into())
                );
            }
        }
    }

    if args.dry_run {
        println!(
            "\n{} Dry run: {} records not committed",
            style("ℹ").blue(),
            result.records.len()
        );
        return Ok(());
    }

    let entries = history.upsert(&result.records, &meta)?;
    info!("Imported batch of {} from {}", result.records.len(), args.input.display());

    println!(
        "\n{} Imported {} records ({} changed, {} new), store holds {} products",
        style("✓").green(),
        result.records.len(),
        diff.iter().filter(|e| e.kind == DiffKind::Changed).count(),
        diff.iter().filter(|e| e.kind == DiffKind::New).count(),
        entries.len()
    );

    Ok(())
}
