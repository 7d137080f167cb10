//! Publish a converted document by pushing its repository.
//!
//! Not part of the conversion itself: the CLI calls [`GitPublisher::publish`]
//! after a successful [`crate::convert::convert`] so that the images the
//! rewritten URLs point at become reachable on the hosting side.
//!
//! Steps, all run as `git -C <repo_dir> …`:
//!
//! 1. `git add -A`
//! 2. `git commit -m "update file <stem>"`, skipped when the tree is clean
//! 3. `git push -u <remote> <branch>`

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::{debug, info};

/// Failures while running git.
#[derive(Debug, Error)]
pub enum PublishError {
    /// `git` could not be started at all.
    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// A git command exited with a non-zero status.
    #[error("`git {command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Stages, commits and pushes a working tree.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    /// Publisher for the repository containing `repo_dir`, pushing to
    /// `origin master`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: "origin".to_string(),
            branch: "master".to_string(),
        }
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Stage everything, commit on behalf of `input_path`, and push.
    pub fn publish(&self, input_path: &Path) -> Result<(), PublishError> {
        self.git(&["add", "-A"])?;

        if self.has_staged_changes()? {
            let message = commit_message(input_path);
            self.git(&["commit", "-m", &message])?;
        } else {
            info!("Nothing to commit in {}", self.repo_dir.display());
        }

        self.git(&["push", "-u", &self.remote, &self.branch])?;
        info!("Pushed to {}/{}", self.remote, self.branch);
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool, PublishError> {
        let output = self.git(&["status", "--porcelain"])?;
        Ok(!output.stdout.iter().all(u8::is_ascii_whitespace))
    }

    fn git(&self, args: &[&str]) -> Result<Output, PublishError> {
        debug!("git -C {} {}", self.repo_dir.display(), args.join(" "));
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .map_err(PublishError::Spawn)?;

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                command: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// `update file <stem>` for the given input document.
pub fn commit_message(input_path: &Path) -> String {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("update file {stem}")
}
