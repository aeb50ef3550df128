//! Command-line interface for book-minder.
//!
//! This module provides CLI commands for enriching book record snapshots
//! and inspecting the configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
