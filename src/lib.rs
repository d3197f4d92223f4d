//! # Repository Metrics Library
//!
//! This library clones lists of Git repositories, grouped by category (for
//! example by programming language), and runs a source-metrics analyzer
//! (`scc` by default) on each one. It backs the `repo-metrics` command-line
//! tool but can be embedded directly.
//!
//! ## Quick Example
//!
//! ```no_run
//! use repo_metrics::analyzer::CommandAnalyzer;
//! use repo_metrics::coordinator::Coordinator;
//! use repo_metrics::job::{Category, JobRecord};
//! use repo_metrics::repository::DefaultGitOperations;
//! use repo_metrics::worker::PipelineContext;
//!
//! let context = PipelineContext::new(
//!     Box::new(DefaultGitOperations::with_depth(Some(1))),
//!     Box::new(CommandAnalyzer::default()),
//!     "repositories",
//!     ".",
//! );
//!
//! let batches = vec![(
//!     Category::new("rust"),
//!     vec![JobRecord::new("rust-lang", "cargo", "https://github.com/rust-lang/cargo")],
//! )];
//!
//! let summary = Coordinator::new(context)
//!     .run(batches, |token| println!("{}", token))
//!     .unwrap();
//! assert_eq!(summary.reports.len(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Job records (`job`, `source`)**: one record per repository, loaded per
//!   category from a CSV job list.
//! - **Collaborators (`repository`, `git`, `analyzer`)**: trait seams for
//!   cloning and analyzing, with defaults that shell out to `git` and `scc`.
//! - **Workspaces (`workspace`)**: ephemeral directories, removed on every
//!   exit path.
//! - **Workers (`worker`)**: one per category, processing its records
//!   sequentially and emitting a completion token per repository.
//! - **Coordinator (`coordinator`)**: runs the workers in parallel, merges
//!   their tokens and returns once every worker has terminated.
//!
//! ## Execution Flow
//!
//! 1.  Load and validate the configuration (`config`).
//! 2.  Load every category's job list (`source`).
//! 3.  Start one worker thread per category (`coordinator`).
//! 4.  Each worker clones, analyzes and cleans up, one record at a time
//!     (`worker`).
//! 5.  The coordinator forwards tokens as they arrive and waits for every
//!     worker's termination signal.

pub mod analyzer;
pub mod cancel;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod git;
pub mod job;
pub mod repository;
pub mod source;
pub mod suggestions;
pub mod worker;
pub mod workspace;

#[cfg(test)]
mod pipeline_proptest;
