//! Update command implementation.
//!
//! Refreshes each stub from its remote behind a spinner and saves the new
//! `last_updated` stamps.

use crate::cli::args::UpdateArgs;
use crate::error::{InvokeError, Result};
use crate::remote::{GitRemote, RemoteTracker};
use crate::ui::UserInterface;
use crate::verbs::{update_stub, update_targets, UpdateStatus};

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The update command implementation.
pub struct UpdateCommand {
    source: ConfigSource,
    args: UpdateArgs,
    tracker: Box<dyn RemoteTracker>,
}

impl UpdateCommand {
    /// Create a new update command backed by git.
    pub fn new(source: ConfigSource, args: UpdateArgs) -> Self {
        Self::with_tracker(source, args, Box::new(GitRemote::new()))
    }

    /// Create an update command with a specific remote tracker.
    pub fn with_tracker(
        source: ConfigSource,
        args: UpdateArgs,
        tracker: Box<dyn RemoteTracker>,
    ) -> Self {
        Self {
            source,
            args,
            tracker,
        }
    }
}

impl Command for UpdateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.source.load()?;

        let names = update_targets(&config.stubs, self.args.stub.as_deref())
            .map_err(InvokeError::from)?;

        if names.is_empty() {
            ui.message("No stubs registered.");
            return Ok(CommandResult::success());
        }

        let mut failures = 0;
        let mut changed = false;
        for name in &names {
            let Some(stub) = config.stubs.get_mut(name) else {
                continue;
            };
            let mut spinner = ui.start_spinner(&format!("Updating {}...", name));
            let report = update_stub(stub, self.tracker.as_ref());
            let line = format!("{}: {}", report.stub, report.describe());
            match &report.status {
                UpdateStatus::Failed { .. } => {
                    failures += 1;
                    spinner.finish_error(&line);
                }
                UpdateStatus::Skipped { .. } => spinner.finish_skipped(&line),
                _ => {
                    changed = true;
                    spinner.finish_success(&line);
                }
            }
        }

        if changed {
            self.source.save(&config)?;
        }

        if failures > 0 {
            ui.error(&format!("{} of {} stub(s) failed to update", failures, names.len()));
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
