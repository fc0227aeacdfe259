//! History command - show the stored price history, undo the last import.

use clap::Args;
use console::style;

use super::Context;

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: HistoryArgs, ctx: &Context) -> anyhow::Result<()> {
    let history = ctx.open_history();
    let entries = history.sorted_entries();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{} Price history is empty", style("ℹ").blue());
        return Ok(());
    }

    for entry in &entries {
        let price = entry
            .price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let vat = entry
            .vat
            .map(|v| v.display())
            .unwrap_or_else(|| "-".to_string());
        let supplier = entry.supplier.as_deref().unwrap_or("-");
        println!(
            "{:<40} {:>8}  {:>4}  {}  {}",
            entry.name, price, vat, entry.date, supplier
        );
    }

    println!(
        "\n{} products, {} imports logged",
        entries.len(),
        history.import_log().len()
    );

    Ok(())
}

pub fn run_undo(ctx: &Context) -> anyhow::Result<()> {
    let mut history = ctx.open_history();

    let Some(last) = history.import_log().last().cloned() else {
        println!("{} No import to undo", style("!").yellow());
        return Ok(());
    };

    history.undo_last_import()?;
    println!(
        "{} Removed {} identities imported on {}",
        style("✓").green(),
        last.touched.len(),
        last.meta.date
    );

    Ok(())
}
