//! Run command implementation.
//!
//! `invoke <stub> <command> [args...]` resolves the command, checks the
//! arguments against its declared parameters and runs it in the foreground.

use tracing::{debug, info};

use crate::discovery::resolve;
use crate::error::{InvokeError, Result};
use crate::invoker::{invoke, ForwardedArgs, InvokeOptions};
use crate::params;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The run command implementation.
pub struct RunCommand {
    source: ConfigSource,
    stub: String,
    command: String,
    args: Vec<String>,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(
        source: ConfigSource,
        stub: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            source,
            stub: stub.into(),
            command: command.into(),
            args,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.source.context()?;
        let file = resolve(&ctx, &self.stub, &self.command).map_err(InvokeError::from)?;
        debug!(
            "Resolved {} {} to {} ({:?}, {})",
            self.stub,
            self.command,
            file.path.display(),
            file.kind,
            file.stage
        );

        let schema = params::introspect(&file);
        for issue in schema.validate(&self.args) {
            ui.warning(&format!("{} {}: {}", self.stub, self.command, issue));
        }

        let args = ForwardedArgs::Tokens(self.args.clone());
        let outcome = invoke(&file, &args, &ctx.interpreters, &InvokeOptions::default())?;
        info!(
            "{} {} finished in {:.2?}",
            self.stub, self.command, outcome.duration
        );

        Ok(CommandResult::success())
    }
}
