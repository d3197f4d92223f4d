use std::path::Path;
use std::process::Command;

use crate::error::Error;

/// Clone a repository into an existing, empty directory
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
///
/// `depth` of `None` performs a full clone.
pub fn clone_into(url: &str, target_dir: &Path, depth: Option<u32>) -> Result<(), Error> {
    let mut command = Command::new("git");
    command.arg("clone").arg("--quiet");
    if let Some(depth) = depth {
        command.arg(format!("--depth={}", depth));
    }
    // Never block on a credential prompt from a worker thread
    command.env("GIT_TERMINAL_PROMPT", "0");

    let output = command
        .arg(url)
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            message: e.to_string(),
            hint: (e.kind() == std::io::ErrorKind::NotFound)
                .then(|| "Install git and make sure it is on PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitClone {
            url: url.to_string(),
            message: stderr.trim().to_string(),
            hint: clone_hint(&stderr),
        });
    }

    Ok(())
}

/// Suggest a fix for well-known clone failures
fn clone_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("could not read Username")
    {
        Some(
            "The repository may be private or renamed. Check access with \
             SSH keys, git credentials or a personal access token"
                .to_string(),
        )
    } else if stderr.contains("not found") || stderr.contains("does not exist") {
        Some("Check the owner, repository name and URL in the job list".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clone_hint_auth_failure() {
        let hint = clone_hint("fatal: Authentication failed for 'https://github.com/a/b.git/'");
        assert!(hint.unwrap().contains("private"));
    }

    #[test]
    fn test_clone_hint_missing_repository() {
        let hint = clone_hint("fatal: repository 'https://github.com/a/b.git/' not found");
        assert!(hint.unwrap().contains("job list"));
    }

    #[test]
    fn test_clone_hint_unknown() {
        assert_eq!(clone_hint("fatal: early EOF"), None);
    }

    #[test]
    fn test_clone_nonexistent_local_repository_fails() {
        // Fails whether or not git is installed; either way no network is used
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-repo.git");
        let target = temp.path().join("target");
        std::fs::create_dir(&target).unwrap();

        let err = clone_into(&missing.display().to_string(), &target, None).unwrap_err();
        assert!(matches!(err, Error::GitClone { .. }));
    }

    // Note: successful clones need a real git binary and repository; they are
    // covered by the end-to-end tests, which skip when git is unavailable
}
