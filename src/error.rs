//! # Error Handling
//!
//! This module defines the centralized error type for the `repo-metrics`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every failure mode of the pipeline, with enough context in each
//! variant to tell the operator what went wrong and where.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one kind of
//!   failure and carries contextual information (path, URL, category, ...).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! ## Severity
//!
//! Not every variant is fatal. `GitClone` and `Analyzer` errors are handled
//! inside a category worker: the first skips the current repository, the
//! second only skips one output format. Everything else aborts the run.

use thiserror::Error;

/// Main error type for repo-metrics operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A category's job list could not be read or contains a malformed row.
    #[error("Job source error in {path}: {message}")]
    JobSource { path: String, message: String },

    /// An ephemeral workspace (or one of the directories it lives in) could
    /// not be created.
    #[error("Workspace error at {path}: {message}")]
    Workspace { path: String, message: String },

    /// Cloning a repository failed.
    ///
    /// Includes the repository URL, git's error output and an optional hint.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// The analyzer failed to produce one output format for a repository.
    #[error("Analyzer error for {repo} ({format}): {message}")]
    Analyzer {
        format: String,
        repo: String,
        message: String,
    },

    /// A category worker stopped on a fatal error.
    #[error("Worker for category '{category}' failed: {message}")]
    Worker { category: String, message: String },

    /// A category worker thread panicked.
    #[error("Worker for category '{category}' panicked")]
    WorkerPanicked { category: String },

    /// The same category was configured twice.
    #[error("Duplicate category: {category}")]
    DuplicateCategory { category: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
