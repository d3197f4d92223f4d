//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Repository Metrics - Clone repositories per category and collect source metrics
#[derive(Parser, Debug)]
#[command(name = "repo-metrics")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace) or an env_logger filter
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        env = "REPO_METRICS_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone and analyze every repository of every category
    Run(commands::run::RunArgs),

    /// Validate the configuration and job lists without cloning anything
    Check(commands::check::CheckArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Run(args) => commands::run::execute(args),
            Commands::Check(args) => commands::check::execute(args),
        }
    }
}

/// Route `log` records to stderr; stdout carries the completion stream.
fn init_logging(filter: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(filter)
        .target(env_logger::Target::Stderr)
        .format_target(false)
        .try_init();
}
