//! # Patrak CLI
//!
//! Command-line front end for the billing core.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  patrak format <amount> [--decimals N]     १२,३४,५६७.८९                 │
//! │  patrak words <amount>                     "... Rupees ... only"         │
//! │  patrak translit <text...> [--local]       मुंबई                         │
//! │  patrak invoice <file> [--record] [--local]  display or record JSON     │
//! │  patrak report <files...> [--from] [--to]  per-client totals JSON       │
//! │  patrak config show | init                 lipi.toml                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so stdout stays pipeable.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use patrak_lipi::LipiConfig;

#[derive(Debug, Parser)]
#[command(name = "patrak", version, about = "Marathi invoice formatting and billing")]
struct Cli {
    /// Path to lipi.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format an amount with Indian grouping and Devanagari digits
    Format {
        amount: String,
        #[arg(long, default_value_t = 2)]
        decimals: usize,
    },
    /// Spell an amount in English words
    Words { amount: String },
    /// Transliterate text to Devanagari
    Translit {
        #[arg(required = true)]
        text: Vec<String>,
        /// Skip the external backend
        #[arg(long)]
        local: bool,
    },
    /// Validate an invoice JSON file and print its display strings
    Invoice {
        file: PathBuf,
        /// Print the persistence record instead of the display
        #[arg(long)]
        record: bool,
        /// Skip the external backend
        #[arg(long)]
        local: bool,
    },
    /// Aggregate invoice files into a per-client report
    Report {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Inspect or create the lipi configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = LipiConfig::load_or_default(cli.config.clone());

    match cli.command {
        Command::Format { amount, decimals } => commands::format(&amount, decimals),
        Command::Words { amount } => commands::words(&amount),
        Command::Translit { text, local } => commands::translit(&config, &text.join(" "), local).await,
        Command::Invoice { file, record, local } => {
            commands::invoice(&config, &file, record, local).await?
        }
        Command::Report { files, from, to } => commands::report(&files, from, to)?,
        Command::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&config)?,
            ConfigAction::Init => commands::config_init(cli.config)?,
        },
    }

    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=patrak_lipi=trace` - Trace the transliteration engine only
/// - Default: WARN, with INFO for patrak crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,patrak=info,patrak_lipi=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
