//! # Repository Metrics CLI
//!
//! This is the binary entry point for the `repo-metrics` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging.
//! - Executing the appropriate command and translating top-level errors into
//!   user-friendly output.
//!
//! The pipeline itself lives in the `repo_metrics` library crate; the binary is
//! a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
