//! # Job Records and Pipeline Events
//!
//! The data that flows through the pipeline: one `JobRecord` per repository,
//! grouped under a `Category`, and the two events a category worker emits,
//! `CompletionToken` and `TerminationSignal`.

use std::fmt;

/// An opaque label naming one independent batch of work, such as `java`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One repository to clone and analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub owner_login: String,
    pub repo_name: String,
    pub clone_url_base: String,
}

impl JobRecord {
    pub fn new(
        owner_login: impl Into<String>,
        repo_name: impl Into<String>,
        clone_url_base: impl Into<String>,
    ) -> Self {
        Self {
            owner_login: owner_login.into(),
            repo_name: repo_name.into(),
            clone_url_base: clone_url_base.into(),
        }
    }

    /// `owner-repo`, used for display and, through [`path_component`], for
    /// workspace prefixes and output file names.
    pub fn display_id(&self) -> String {
        format!("{}-{}", self.owner_login, self.repo_name)
    }

    /// The URL handed to `git clone`.
    pub fn clone_url(&self) -> String {
        if self.clone_url_base.ends_with(".git") {
            self.clone_url_base.clone()
        } else {
            format!("{}.git", self.clone_url_base)
        }
    }
}

/// `display_id` as a single path component, for workspace prefixes and
/// report file names. Path separators become `_`.
pub fn path_component(display_id: &str) -> String {
    display_id.replace(['/', '\\'], "_")
}

/// Emitted by a worker after one record was cloned and analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionToken {
    pub category: Category,
    pub display_id: String,
}

impl fmt::Display for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_id)
    }
}

/// Emitted exactly once by a worker, after its last `CompletionToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationSignal {
    pub category: Category,
}
