//! CLI application for Italian supplier invoice parsing and price history.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{history, import, parse};

/// Supplier invoice parsing - extract line items and track price changes
#[derive(Parser)]
#[command(name = "listino")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the history store file (overrides the config)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a text file into product records
    Parse(parse::ParseArgs),

    /// Import a text file: parse, diff against history, and upsert
    Import(import::ImportArgs),

    /// Show the stored price history
    History(history::HistoryArgs),

    /// Undo the most recent import
    Undo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = commands::Context::resolve(cli.config.as_deref(), cli.store.as_deref())?;

    match cli.command {
        Commands::Parse(args) => parse::run(args, &ctx),
        Commands::Import(args) => import::run(args, &ctx),
        Commands::History(args) => history::run(args, &ctx),
        Commands::Undo => history::run_undo(&ctx),
    }
}
