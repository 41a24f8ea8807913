//! Dynamic completion candidates.
//!
//! Shell hooks call `invoke __complete <words...>` with the words typed so
//! far, the last one possibly empty. Candidates are printed one per line.
//! Nothing here ever fails: a broken config yields no candidates.

use tracing::debug;

use crate::cli::args::CompleteArgs;
use crate::completion::complete;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The hidden `__complete` command implementation.
pub struct CompleteCommand {
    source: ConfigSource,
    args: CompleteArgs,
}

impl CompleteCommand {
    /// Create a new completion command.
    pub fn new(source: ConfigSource, args: CompleteArgs) -> Self {
        Self { source, args }
    }

    /// Candidates for the words, empty when the config cannot be loaded.
    pub fn candidates(&self) -> Vec<String> {
        match self.source.context() {
            Ok(ctx) => complete(&ctx, &self.args.words),
            Err(e) => {
                debug!("Completion without config: {}", e);
                Vec::new()
            }
        }
    }
}

impl Command for CompleteCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        for candidate in self.candidates() {
            println!("{}", candidate);
        }
        Ok(CommandResult::success())
    }
}
