//! # Configuration Schema and Parsing
//!
//! This module defines the `.repo-metrics.yaml` configuration file and the
//! logic for parsing and validating it. Every field is optional; an empty
//! file (or no file at all) yields the defaults below.
//!
//! ```yaml
//! categories: [java, python]
//! data_dir: data/csv
//! workspace_root: repositories
//! output_root: .
//! clone_depth: 1
//! channel_capacity: 100
//! analyzer:
//!   program: scc
//!   formats: [csv, tabular, html]
//! ```
//!
//! Command-line flags override individual fields after the file is loaded;
//! call [`Config::validate`] once all overrides are applied.

use crate::analyzer::OutputFormat;
use crate::coordinator::DEFAULT_CHANNEL_CAPACITY;
use crate::error::{Error, Result};
use crate::job::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".repo-metrics.yaml";

/// Analyzer invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Executable to run, looked up on PATH.
    pub program: String,
    /// Report formats, produced in this order.
    pub formats: Vec<OutputFormat>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            program: "scc".to_string(),
            formats: OutputFormat::ALL.to_vec(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Category labels; each one is read from `<data_dir>/<category>.csv`.
    pub categories: Vec<String>,
    pub data_dir: PathBuf,
    /// Parent directory of the per-repository workspaces.
    pub workspace_root: PathBuf,
    /// Reports are written to `<output_root>/<format>/`.
    pub output_root: PathBuf,
    /// Shallow clone depth. `None` clones the full history.
    pub clone_depth: Option<u32>,
    /// Buffer size of each worker's completion channel.
    pub channel_capacity: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: vec!["java".to_string(), "python".to_string()],
            data_dir: PathBuf::from("data/csv"),
            workspace_root: PathBuf::from("repositories"),
            output_root: PathBuf::from("."),
            clone_depth: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(config_error(
                "no categories configured",
                "Add 'categories: [java, python]' or pass --category",
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err(config_error(
                    "category names must not be empty",
                    "Remove the blank entry from 'categories'",
                ));
            }
            if category.contains(['/', '\\']) {
                return Err(config_error(
                    &format!("category '{}' contains a path separator", category),
                    "Category names are used as file names, e.g. 'java'",
                ));
            }
            if !seen.insert(category.trim()) {
                return Err(Error::DuplicateCategory {
                    category: category.trim().to_string(),
                });
            }
        }

        if self.analyzer.formats.is_empty() {
            return Err(config_error(
                "no analyzer formats configured",
                "Use any of: csv, tabular, html",
            ));
        }
        let unique: HashSet<_> = self.analyzer.formats.iter().collect();
        if unique.len() != self.analyzer.formats.len() {
            return Err(config_error(
                "analyzer formats contain duplicates",
                "List each format at most once",
            ));
        }

        if self.analyzer.program.trim().is_empty() {
            return Err(config_error(
                "analyzer program is empty",
                "Set 'analyzer.program', e.g. 'scc'",
            ));
        }

        if self.channel_capacity == 0 {
            return Err(config_error(
                "channel_capacity must be at least 1",
                "Remove the field to use the default of 100",
            ));
        }

        if self.clone_depth == Some(0) {
            return Err(config_error(
                "clone_depth must be at least 1",
                "Remove the field for a full clone",
            ));
        }

        Ok(())
    }

    /// The configured categories, in order.
    pub fn categories(&self) -> Vec<Category> {
        self.categories.iter().map(|c| Category::new(c.trim())).collect()
    }
}

fn config_error(message: &str, hint: &str) -> Error {
    Error::ConfigParse {
        message: message.to_string(),
        hint: Some(hint.to_string()),
    }
}

/// Parse configuration from YAML. Does not validate.
pub fn parse(yaml_content: &str) -> Result<Config> {
    // An empty document deserializes as unit, not as an empty mapping
    if yaml_content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some(
            "Valid keys: categories, data_dir, workspace_root, output_root, \
             clone_depth, channel_capacity, analyzer"
                .to_string(),
        ),
    })
}

/// Read and parse a configuration file. Does not validate.
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
