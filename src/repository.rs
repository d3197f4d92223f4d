//! # Repository Cloning
//!
//! This module provides the clone seam used by category workers. It separates
//! the decision of *when* to clone (the worker) from *how* a repository gets
//! materialized on disk (the system `git` command).
//!
//! ## Design
//!
//! - **`GitOperations`**: the interface a worker depends on. It has a single
//!   operation, cloning a URL into an existing empty directory.
//!
//! - **`DefaultGitOperations`**: shells out to `git` through
//!   [`crate::git::clone_into`], optionally as a shallow clone.
//!
//! Tests replace `DefaultGitOperations` with mocks that create files, fail on
//! demand, or record the calls they received, so the worker and coordinator
//! can be exercised without network access.

use crate::error::Result;
use std::path::Path;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Materializes the repository at `url` inside `target_dir`.
    ///
    /// `target_dir` exists and is empty when this is called.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real clones.
#[derive(Debug, Clone, Default)]
pub struct DefaultGitOperations {
    depth: Option<u32>,
}

impl DefaultGitOperations {
    /// Full clones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow clones truncated to `depth` commits; `None` means full history.
    pub fn with_depth(depth: Option<u32>) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> Option<u32> {
        self.depth
    }
}

impl GitOperations for DefaultGitOperations {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_into(url, target_dir, self.depth)
    }
}
