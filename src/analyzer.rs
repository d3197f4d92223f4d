//! # Source Metrics Analyzer
//!
//! Wraps the external metrics command (`scc` by default). The analyzer runs
//! inside a workspace and writes one report per output format to
//! `<output_root>/<format>/<display_id>.<format>`.
//!
//! The `Analyzer` trait is the seam the category worker depends on, so tests
//! can swap in an implementation that never spawns a process.

use crate::error::{Error, Result};
use crate::job::path_component;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Report formats requested from the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tabular,
    Html,
}

impl OutputFormat {
    /// Every format, in the order they are produced.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Tabular, OutputFormat::Html];

    /// The analyzer's `-f` value, also used as directory name and extension.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tabular => "tabular",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the report for `display_id` in `format` is written.
pub fn report_path(output_root: &Path, format: OutputFormat, display_id: &str) -> PathBuf {
    output_root
        .join(format.as_str())
        .join(format!("{}.{}", path_component(display_id), format.as_str()))
}

/// Runs the metrics tool against a checked-out repository.
pub trait Analyzer: Send + Sync {
    /// Produce the `format` report for the repository in `workspace`,
    /// writing it to `output`.
    fn analyze(&self, workspace: &Path, format: OutputFormat, output: &Path) -> Result<()>;
}

/// Invokes an external program as `<program> -f <format> -o <output>`.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: String,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the program can be started at all.
    ///
    /// Runs `<program> --version`; only a failure to spawn is an error.
    pub fn probe(&self) -> Result<()> {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|_| ())
            .map_err(|e| Error::Analyzer {
                format: "-".to_string(),
                repo: "-".to_string(),
                message: format!("failed to run '{}': {}", self.program, e),
            })
    }
}

impl Default for CommandAnalyzer {
    fn default() -> Self {
        Self::new("scc")
    }
}

impl Analyzer for CommandAnalyzer {
    fn analyze(&self, workspace: &Path, format: OutputFormat, output: &Path) -> Result<()> {
        let repo = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = Command::new(&self.program)
            .args(["-f", format.as_str(), "-o"])
            .arg(output)
            .current_dir(workspace)
            .output()
            .map_err(|e| Error::Analyzer {
                format: format.to_string(),
                repo: repo.clone(),
                message: format!("failed to run '{}': {}", self.program, e),
            })?;

        // stdout belongs to the completion stream, so echo analyzer output on stderr
        if !result.stdout.is_empty() {
            let mut stderr = std::io::stderr().lock();
            let _ = stderr.write_all(&result.stdout);
        }

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::Analyzer {
                format: format.to_string(),
                repo,
                message: format!("{} {}", result.status, stderr.trim()),
            });
        }

        Ok(())
    }
}
