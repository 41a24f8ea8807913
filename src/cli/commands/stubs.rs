//! Stubs command implementation.
//!
//! `invoke stubs add|remove|list` edits and shows the stub registry.

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::{StubsAction, StubsAddArgs};
use crate::discovery::has_commands_dir;
use crate::error::{InvokeError, Result};
use crate::stubs::Stub;
use crate::ui::{Columns, UserInterface};

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The stubs command implementation.
pub struct StubsCommand {
    source: ConfigSource,
    action: StubsAction,
}

impl StubsCommand {
    /// Create a new stubs command.
    pub fn new(source: ConfigSource, action: StubsAction) -> Self {
        Self { source, action }
    }

    fn add(&self, args: &StubsAddArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.source.load()?;
        if config.stubs.contains(&args.name) && !args.force {
            return Err(InvokeError::DuplicateStub {
                name: args.name.clone(),
            });
        }

        let root = std::path::absolute(&args.path)?;
        let mut stub = Stub::new(&args.name, &root);
        stub.remote = args.remote.clone();
        stub.registered_at = Some(Utc::now());
        config.stubs.register(stub)?;
        self.source.save(&config)?;

        ui.success(&format!("Registered {} at {}", args.name, root.display()));
        if !root.exists() {
            if args.remote.is_some() {
                ui.show_hint(&format!("Fetch it with: invoke update {}", args.name));
            } else {
                ui.warning(&format!("{} does not exist yet", root.display()));
            }
        } else if !has_commands_dir(&root) {
            ui.warning(&format!("{} has no Commands directory", root.display()));
        }
        Ok(CommandResult::success())
    }

    fn remove(&self, name: &str, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.source.load()?;
        if config.stubs.remove(name).is_none() {
            return Err(InvokeError::StubNotFound {
                stub: name.to_string(),
            });
        }
        self.source.save(&config)?;
        ui.success(&format!("Removed {}", name));
        Ok(CommandResult::success())
    }

    fn list(&self, json: bool, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        let rows: Vec<StubRow> = config
            .stubs
            .iter()
            .map(|stub| StubRow {
                name: stub.name.clone(),
                path: stub.root.clone(),
                remote: stub.remote.clone(),
                exists: stub.root.is_dir(),
            })
            .collect();

        if json {
            let out = serde_json::to_string_pretty(&rows).map_err(anyhow::Error::from)?;
            println!("{}", out);
            return Ok(CommandResult::success());
        }

        if rows.is_empty() {
            ui.message("No stubs registered.");
            return Ok(CommandResult::success());
        }

        let theme = ui.theme().clone();
        let mut columns = Columns::new();
        for row in &rows {
            let state = if row.exists {
                String::new()
            } else {
                theme.warning.apply_to("(missing)").to_string()
            };
            columns.add_row([
                theme.name.apply_to(&row.name).to_string(),
                row.path.display().to_string(),
                state,
                theme
                    .dim
                    .apply_to(row.remote.as_deref().unwrap_or(""))
                    .to_string(),
            ]);
        }
        for line in columns.render(0) {
            ui.message(&line);
        }
        Ok(CommandResult::success())
    }
}

/// One line of `stubs list`.
#[derive(Debug, Serialize)]
struct StubRow {
    name: String,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote: Option<String>,
    exists: bool,
}

impl Command for StubsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.action {
            StubsAction::Add(args) => self.add(args, ui),
            StubsAction::Remove(args) => self.remove(&args.name, ui),
            StubsAction::List(args) => self.list(args.json, ui),
        }
    }
}
