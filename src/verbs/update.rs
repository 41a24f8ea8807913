//! Refreshing stubs from their remotes.
//!
//! Every stub is attempted; a failure is recorded in its report and the
//! batch carries on.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::discovery::NotFound;
use crate::remote::{short_sha, RemoteTracker, SyncOutcome};
use crate::stubs::{Stub, StubRegistry};

/// Result of updating one stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    Cloned { sha: String },
    Updated { from: String, to: String },
    UpToDate,
    Skipped { reason: String },
    Failed { error: String },
}

impl UpdateStatus {
    /// Whether the stub is now in sync with its remote.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Cloned { .. } | Self::Updated { .. } | Self::UpToDate
        )
    }
}

/// Per-stub update report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub stub: String,
    #[serde(flatten)]
    pub status: UpdateStatus,
}

impl UpdateReport {
    /// Human-readable one-line description of the status.
    pub fn describe(&self) -> String {
        match &self.status {
            UpdateStatus::Cloned { sha } => format!("cloned at {}", short_sha(sha)),
            UpdateStatus::Updated { from, to } => {
                format!("updated {} -> {}", short_sha(from), short_sha(to))
            }
            UpdateStatus::UpToDate => "already up to date".to_string(),
            UpdateStatus::Skipped { reason } => format!("skipped: {}", reason),
            UpdateStatus::Failed { error } => format!("failed: {}", error),
        }
    }
}

/// Update one stub and stamp `last_updated` on success.
pub fn update_stub(stub: &mut Stub, tracker: &dyn RemoteTracker) -> UpdateReport {
    let status = match tracker.sync(stub) {
        Ok(SyncOutcome::Cloned { sha }) => UpdateStatus::Cloned { sha },
        Ok(SyncOutcome::Updated { from, to }) => UpdateStatus::Updated { from, to },
        Ok(SyncOutcome::UpToDate { .. }) => UpdateStatus::UpToDate,
        Ok(SyncOutcome::NotTracked) => UpdateStatus::Skipped {
            reason: "not a git checkout and no remote configured".to_string(),
        },
        Err(e) => {
            warn!("Update of {} failed: {:#}", stub.name, e);
            UpdateStatus::Failed {
                error: format!("{:#}", e),
            }
        }
    };

    if status.is_success() {
        stub.last_updated = Some(Utc::now());
        info!("Stub {} {}", stub.name, status_word(&status));
    }

    UpdateReport {
        stub: stub.name.clone(),
        status,
    }
}

fn status_word(status: &UpdateStatus) -> &'static str {
    match status {
        UpdateStatus::Cloned { .. } => "cloned",
        UpdateStatus::Updated { .. } => "updated",
        UpdateStatus::UpToDate => "up to date",
        UpdateStatus::Skipped { .. } => "skipped",
        UpdateStatus::Failed { .. } => "failed",
    }
}

/// Names `update` will visit: the named stub, or every stub in name order.
pub fn targets(registry: &StubRegistry, target: Option<&str>) -> Result<Vec<String>, NotFound> {
    match target {
        Some(name) if registry.contains(name) => Ok(vec![name.to_string()]),
        Some(name) => Err(NotFound::Stub(name.to_string())),
        None => Ok(registry.names().into_iter().map(str::to_string).collect()),
    }
}

/// Update one named stub, or every stub when `target` is `None`.
pub fn update(
    registry: &mut StubRegistry,
    target: Option<&str>,
    tracker: &dyn RemoteTracker,
) -> Result<Vec<UpdateReport>, NotFound> {
    let names = targets(registry, target)?;

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        if let Some(stub) = registry.get_mut(&name) {
            reports.push(update_stub(stub, tracker));
        }
    }
    Ok(reports)
}
