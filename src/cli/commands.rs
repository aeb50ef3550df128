//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

mod check;
mod enrich;

use crate::error::{Error, Result, ResultExt};
use crate::model::Snapshot;

/// Book Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a snapshot of book records from external providers
    Enrich {
        /// Input snapshot (JSON) produced by the discovery stage
        input: PathBuf,

        /// Output path (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ISBNdb API key
        #[arg(long, env = "ISBNDB_API_KEY")]
        isbndb_key: Option<String>,

        /// Google Books API key
        #[arg(long, env = "GOOGLE_BOOKS_API_KEY")]
        google_books_key: Option<String>,

        /// Soft limit on concurrently enriched records
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Report what would be enriched without calling any provider
        #[arg(long)]
        dry_run: bool,
    },

    /// Check configuration, credentials, and catalog readability
    CheckConfig,

    /// Write a starter config file to the standard location
    InitConfig,
}

/// Execute the selected command.
pub fn run_command(args: &Cli) -> anyhow::Result<()> {
    match &args.command {
        Commands::Enrich {
            input,
            output,
            isbndb_key,
            google_books_key,
            concurrency,
            dry_run,
        } => {
            let rt = Runtime::new()?;
            enrich::cmd_enrich(
                &rt,
                input,
                output.as_deref(),
                isbndb_key.as_deref(),
                google_books_key.as_deref(),
                *concurrency,
                *dry_run,
            )
        }
        Commands::CheckConfig => check::cmd_check_config(),
        Commands::InitConfig => check::cmd_init_config(),
    }
}

/// Read a snapshot from disk and validate record keys are unique.
///
/// The merge fold at the end of enrichment is keyed by record identity;
/// duplicate keys would silently collapse records, so reject them here.
pub(crate) fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let contents = std::fs::read_to_string(path)
        .with_context(format!("reading snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)?;

    let mut seen = HashSet::new();
    for book in &snapshot.books {
        if !seen.insert(book.key.as_str()) {
            return Err(Error::config(format!(
                "duplicate record key in snapshot: {}",
                book.key
            )));
        }
    }

    Ok(snapshot)
}

/// Write a snapshot back to disk (write temp, then rename).
pub(crate) fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let contents = serde_json::to_string_pretty(snapshot)?;
    let temp = path.with_extension("json.tmp");
    std::fs::write(&temp, contents)
        .with_context(format!("writing snapshot {}", temp.display()))?;
    std::fs::rename(&temp, path)
        .with_context(format!("renaming snapshot to {}", path.display()))?;
    Ok(())
}
