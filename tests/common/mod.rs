//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fixtures and helpers to reduce duplication across
//! test files: a temporary working directory with job lists, a stand-in
//! analyzer script, and local Git repositories to clone without network.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_jobs("java", "a,b,/nonexistent/b\n");
//!     fixture.command().arg("run").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Check whether a usable `git` binary is on PATH.
///
/// Tests that need real clones return early when it is not.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary working directory laid out the way `repo-metrics` expects:
/// job lists under `data/csv`, workspaces under `repositories`, reports
/// under `out/<format>`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `data/csv/<category>.csv` with the given rows.
    pub fn with_jobs(self, category: &str, rows: &str) -> Self {
        self.temp_dir
            .child(format!("data/csv/{}.csv", category))
            .write_str(rows)
            .expect("Failed to write job list");
        self
    }

    /// Add a `.repo-metrics.yaml` configuration file with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".repo-metrics.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[allow(dead_code)]
    pub fn workspace_root(&self) -> PathBuf {
        self.path().join("repositories")
    }

    #[allow(dead_code)]
    pub fn output_root(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Install a shell script that mimics `scc -f <format> -o <file>` by
    /// writing a one-line report. Returns its absolute path.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn fake_analyzer(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path().join("bin/fake-scc");
        std::fs::create_dir_all(script.parent().unwrap()).unwrap();
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             format=\"\"\n\
             out=\"\"\n\
             while [ $# -gt 0 ]; do\n\
               case \"$1\" in\n\
                 -f) shift; format=\"$1\" ;;\n\
                 -o) shift; out=\"$1\" ;;\n\
               esac\n\
               shift\n\
             done\n\
             if [ -n \"$out\" ]; then echo \"$format report for $(pwd)\" > \"$out\"; fi\n\
             exit 0\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    /// Install a `git` stand-in that takes `delay` seconds per clone and
    /// writes one file into the target directory. Returns the directory to
    /// put in front of `PATH`.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn slow_git(&self, delay: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let dir = self.path().join("slow-git");
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("git");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 sleep {}\n\
                 for target; do :; done\n\
                 mkdir -p \"$target\" && echo cloned > \"$target/README\"\n",
                delay
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        dir
    }

    /// Create a local Git repository with one commit under `origins/`.
    ///
    /// Returns the URL base to put in a job list; the directory itself is
    /// named `<name>.git` so the clone URL resolves to it.
    #[allow(dead_code)]
    pub fn local_repository(&self, name: &str) -> String {
        let dir = self.path().join("origins").join(format!("{}.git", name));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("main.py"), "print('hello')\n").unwrap();

        let git = |args: &[&str]| {
            let status = Command::new("git")
                .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
                .args(["-c", "init.defaultBranch=main", "-c", "commit.gpgsign=false"])
                .args(args)
                .current_dir(&dir)
                .output()
                .expect("Failed to run git");
            assert!(status.status.success(), "git {:?} failed", args);
        };
        git(&["init", "-q"]);
        git(&["add", "."]);
        git(&["commit", "-q", "-m", "initial"]);

        self.path()
            .join("origins")
            .join(name)
            .display()
            .to_string()
    }

    /// A `repo-metrics` command running in the fixture directory, with every
    /// path pointed into it.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repo-metrics");
        cmd.current_dir(self.path())
            .env_remove("REPO_METRICS_CONFIG")
            .env_remove("REPO_METRICS_LOG");
        cmd
    }

    /// Entries left in the workspace root (0 when it does not exist).
    #[allow(dead_code)]
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.workspace_root())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
