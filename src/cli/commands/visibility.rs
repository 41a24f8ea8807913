//! Visibility command implementation.
//!
//! With no flags, shows the persisted visibility; with `--alpha`/`--beta`,
//! changes and saves it.

use crate::cli::args::VisibilityArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The visibility command implementation.
pub struct VisibilityCommand {
    source: ConfigSource,
    args: VisibilityArgs,
}

impl VisibilityCommand {
    /// Create a new visibility command.
    pub fn new(source: ConfigSource, args: VisibilityArgs) -> Self {
        Self { source, args }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

impl Command for VisibilityCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.source.load()?;

        let changing = self.args.alpha.is_some() || self.args.beta.is_some();
        if let Some(alpha) = self.args.alpha {
            config.visibility.alpha = alpha.into();
        }
        if let Some(beta) = self.args.beta {
            config.visibility.beta = beta.into();
        }
        if changing {
            self.source.save(&config)?;
            tracing::info!(
                "Visibility set to alpha={} beta={}",
                config.visibility.alpha,
                config.visibility.beta
            );
        }

        let theme = ui.theme().clone();
        ui.message(&format!(
            "{} {}",
            theme.alpha.apply_to("alpha:"),
            on_off(config.visibility.alpha)
        ));
        ui.message(&format!(
            "{} {}",
            theme.beta.apply_to("beta: "),
            on_off(config.visibility.beta)
        ));
        Ok(CommandResult::success())
    }
}
