//! Book Minder - bibliographic enrichment for book collections.
//!
//! Takes a snapshot of book records harvested by a discovery stage and
//! fills in bibliographic metadata and physical-library holdings from
//! several external providers, tolerating partial provider failure.

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("book_minder=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
