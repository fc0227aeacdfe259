//! Parse command - extract product records from an invoice text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use listino_core::InvoiceTextParser;

use super::Context;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file (UTF-8, as produced by the OCR/PDF collaborator)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Text,
}

pub fn run(args: ParseArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    info!("Parsing {} ({} bytes)", args.input.display(), text.len());

    let result = InvoiceTextParser::with_config(ctx.config.parser.clone()).parse(&text);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result.records)?,
        OutputFormat::Text => format_records(&result),
    };

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

    Ok(())
}

fn format_records(result: &listino_core::ParseResult) -> String {
    let mut out = String::new();

    match &result.supplier {
        Some(label) => out.push_str(&format!("Supplier: {}\n\n", label)),
        None => out.push_str("Supplier: (generic)\n\n"),
    }

    for (i, rec) in result.records.iter().enumerate() {
        let price = rec
            .price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let vat = rec
            .vat
            .map(|v| v.display())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:>3}  {:<40} {:>8}  {}\n", i + 1, rec.name, price, vat));
    }

    out.push_str(&format!("\n{} product records", result.records.len()));
    out
}
