//! # Ephemeral Workspaces
//!
//! A `Workspace` is a uniquely named directory that holds one cloned
//! repository while it is analyzed. It is owned by exactly one worker
//! iteration and removed when that iteration ends, on every exit path:
//! explicitly through [`Workspace::release`], or on drop (including during
//! unwinding) if the iteration left early.

use crate::error::{Error, Result};
use std::path::Path;
use tempfile::TempDir;

#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh directory under `root` whose name starts with `prefix`.
    ///
    /// Names carry a random suffix and are created atomically, so concurrent
    /// workers can share `root`.
    pub fn acquire(root: &Path, prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", prefix))
            .tempdir_in(root)
            .map_err(|e| Error::Workspace {
                path: root.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the directory and everything in it, reporting failures.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().display().to_string();
        self.dir.close().map_err(|e| Error::Workspace {
            path,
            message: format!("failed to remove: {}", e),
        })
    }
}

/// Create `root` if it does not exist yet.
pub fn ensure_root(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root).map_err(|e| Error::Workspace {
        path: root.display().to_string(),
        message: e.to_string(),
    })
}
