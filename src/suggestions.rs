//! # Error Suggestions
//!
//! Helper functions for building error messages that say what went wrong
//! and how to fix it. Used by the command-line front end.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repo_metrics::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

/// Generate an error for when an explicitly requested configuration file is
/// not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .repo-metrics.yaml file in the working directory\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Omit --config to run with built-in defaults",
        path = path.display()
    )
}

/// Generate an error for a category whose job list cannot be loaded.
///
/// Wraps the underlying cause and points at the data directory.
pub fn job_source_failed(data_dir: &Path, cause: crate::error::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "{cause}\n\n\
         hint: Each category needs a <category>.csv file in {dir}\n\
         hint: Rows are 'owner,repo,url' without a header\n\
         hint: Use --data-dir or 'data_dir' in the config to change the directory",
        dir = data_dir.display()
    )
}

/// Generate an error for when the analyzer program does not exist.
pub fn analyzer_not_found(program: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Analyzer not found: {program}\n\n\
         hint: Install scc (https://github.com/boyter/scc) and make sure it is on PATH\n\
         hint: Use --analyzer or 'analyzer.program' to point at another executable"
    )
}
