//! Remote tracking for stubs.
//!
//! `update` refreshes stubs whose root is a git checkout. The
//! [`RemoteTracker`] trait keeps the verb independent of git so it can be
//! exercised with a mock.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::stubs::Stub;

/// What syncing one stub did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The root did not exist and was cloned from the remote.
    Cloned { sha: String },
    /// New commits were pulled.
    Updated { from: String, to: String },
    /// Already at the remote's head.
    UpToDate { sha: String },
    /// Not a checkout and no remote to clone from.
    NotTracked,
}

/// Capability to bring a stub root up to date with its remote.
pub trait RemoteTracker {
    fn sync(&self, stub: &Stub) -> Result<SyncOutcome>;
}

/// Git-backed remote tracker.
#[derive(Debug, Clone, Default)]
pub struct GitRemote;

impl GitRemote {
    pub fn new() -> Self {
        Self
    }

    fn clone_repo(&self, url: &str, root: &Path) -> Result<()> {
        if let Some(parent) = root.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
        run_git(&["clone", "--", url, &root.to_string_lossy()], None)
            .context("Git clone failed")?;
        Ok(())
    }

    fn head_sha(&self, root: &Path) -> Result<String> {
        run_git(&["rev-parse", "HEAD"], Some(root)).context("Git rev-parse failed")
    }
}

impl RemoteTracker for GitRemote {
    fn sync(&self, stub: &Stub) -> Result<SyncOutcome> {
        if !stub.root.exists() {
            let Some(url) = stub.remote.as_deref() else {
                return Ok(SyncOutcome::NotTracked);
            };
            debug!("Cloning {} into {}", url, stub.root.display());
            self.clone_repo(url, &stub.root)?;
            let sha = self.head_sha(&stub.root)?;
            return Ok(SyncOutcome::Cloned { sha });
        }

        if !is_checkout(&stub.root) {
            return Ok(SyncOutcome::NotTracked);
        }

        let from = self.head_sha(&stub.root)?;
        debug!("Pulling {} at {}", stub.name, short_sha(&from));
        run_git(&["pull", "--ff-only"], Some(&stub.root)).context("Git pull failed")?;
        let to = self.head_sha(&stub.root)?;

        if from == to {
            Ok(SyncOutcome::UpToDate { sha: to })
        } else {
            Ok(SyncOutcome::Updated { from, to })
        }
    }
}

/// Whether a directory is the top of a git checkout.
pub fn is_checkout(root: &Path) -> bool {
    root.join(".git").exists()
}

/// First seven characters of a commit id.
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn run_git(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().context("failed to run git")?;
    if !output.status.success() {
        bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
