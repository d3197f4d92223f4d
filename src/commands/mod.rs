//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `repo-metrics` command-line tool. Each subcommand lives in its own file
//! with an `Args` struct (derived using `clap`) and an `execute` function.
//!
//! Both commands share [`ConfigArgs`], which locates the configuration file
//! and applies command-line overrides on top of it.

pub mod check;
pub mod run;

use anyhow::{Context, Result};
use clap::Args;
use repo_metrics::config::{self, Config, DEFAULT_CONFIG_FILE};
use repo_metrics::job::{Category, JobRecord};
use repo_metrics::source::{self, CsvJobSource};
use std::path::{Path, PathBuf};

/// Configuration file location and overrides
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to config file (defaults to .repo-metrics.yaml when present)
    #[arg(short, long, value_name = "PATH", env = "REPO_METRICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Category to process; repeat for several (overrides the config file)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Directory holding one <category>.csv job list per category
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory under which ephemeral clone workspaces are created
    #[arg(long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Directory receiving one sub-directory of reports per format
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Analyzer executable
    #[arg(long, value_name = "PROGRAM")]
    pub analyzer: Option<String>,

    /// Shallow clone depth (full clone when omitted)
    #[arg(long, value_name = "N")]
    pub clone_depth: Option<u32>,
}

impl ConfigArgs {
    /// Load the configuration, apply overrides and validate the result.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(repo_metrics::suggestions::config_not_found(path));
                }
                config::from_file(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => config::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?,
            None => Config::default(),
        };

        if !self.categories.is_empty() {
            config.categories = self.categories.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.workspace_root {
            config.workspace_root = dir.clone();
        }
        if let Some(dir) = &self.output_root {
            config.output_root = dir.clone();
        }
        if let Some(program) = &self.analyzer {
            config.analyzer.program = program.clone();
        }
        if self.clone_depth.is_some() {
            config.clone_depth = self.clone_depth;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load every configured category's job list.
pub fn load_batches(config: &Config) -> Result<Vec<(Category, Vec<JobRecord>)>> {
    let job_source = CsvJobSource::new(&config.data_dir);
    source::load_all(&job_source, &config.categories())
        .map_err(|e| repo_metrics::suggestions::job_source_failed(&config.data_dir, e))
}
