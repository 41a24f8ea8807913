//! Search command implementation.

use crate::cli::args::SearchArgs;
use crate::error::Result;
use crate::ui::{Columns, UserInterface};
use crate::verbs::search;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The search command implementation.
pub struct SearchCommand {
    source: ConfigSource,
    args: SearchArgs,
}

impl SearchCommand {
    /// Create a new search command.
    pub fn new(source: ConfigSource, args: SearchArgs) -> Self {
        Self { source, args }
    }
}

impl Command for SearchCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.source.context()?;
        let query = self.args.query.join(" ");
        let hits = search(&ctx, &query)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&hits).map_err(|e| anyhow::anyhow!(e))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if hits.is_empty() {
            ui.message(&format!("No commands match '{}'", query.trim()));
            return Ok(CommandResult::success());
        }

        let theme = ui.theme().clone();
        let mut columns = Columns::new();
        for hit in &hits {
            columns.add_row([
                format!("{} {}", hit.stub, theme.name.apply_to(&hit.command)),
                theme.format_stage(hit.stage),
                hit.synopsis.clone().unwrap_or_default(),
            ]);
        }
        for line in columns.render(0) {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}
