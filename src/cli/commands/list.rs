//! List command implementation.
//!
//! `invoke` with no words lists stubs and verbs; `invoke <stub>` lists the
//! stub's visible commands.

use crate::error::{InvokeError, Result};
use crate::stubs::is_reserved;
use crate::ui::{Columns, UserInterface};
use crate::verbs::{stub_overview, StubOverview};

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The list command implementation.
pub struct ListCommand {
    source: ConfigSource,
    stub: Option<String>,
}

impl ListCommand {
    /// Create a new list command; `None` lists stubs.
    pub fn new(source: ConfigSource, stub: Option<String>) -> Self {
        Self { source, stub }
    }

    fn list_stubs(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.source.context()?;
        let theme = ui.theme().clone();

        ui.show_header("Stubs:");
        if ctx.registry.is_empty() {
            ui.message("  (none registered)");
            ui.show_hint("Register one with: invoke stubs add <name> <path>");
        } else {
            let mut columns = Columns::new();
            for stub in ctx.registry.iter() {
                let mut detail = stub.root.display().to_string();
                if is_reserved(&stub.name) {
                    detail.push_str(" (shadowed by verb)");
                }
                columns.add_row([
                    theme.name.apply_to(&stub.name).to_string(),
                    theme.dim.apply_to(detail).to_string(),
                ]);
            }
            for line in columns.render(2) {
                ui.message(&line);
            }
        }

        ui.message("");
        ui.show_header("Verbs:");
        let mut columns = Columns::new();
        for (verb, about) in VERBS {
            columns.add_row([theme.name.apply_to(verb).to_string(), about.to_string()]);
        }
        for line in columns.render(2) {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}

const VERBS: &[(&str, &str)] = &[
    ("search", "Search command names and help across all stubs"),
    ("help", "Show help for a stub or one of its commands"),
    ("update", "Refresh stubs from their remotes"),
    ("stubs", "Manage registered stubs"),
    ("visibility", "Show or change which lifecycle stages are visible"),
    ("completions", "Generate shell completions"),
];

/// Print a stub's commands with stage tags and synopses.
pub fn show_overview(ui: &mut dyn UserInterface, overview: &StubOverview) {
    let theme = ui.theme().clone();

    if !overview.has_commands_dir {
        ui.warning(&format!(
            "Stub '{}' has no Commands directory under {}",
            overview.stub,
            overview.root.display()
        ));
        return;
    }

    ui.show_header(&format!("{} commands:", overview.stub));
    if overview.commands.is_empty() {
        ui.message("  (no visible commands)");
        return;
    }

    let mut columns = Columns::new();
    for command in &overview.commands {
        columns.add_row([
            theme.name.apply_to(&command.name).to_string(),
            theme.format_stage(command.stage),
            command.synopsis.clone().unwrap_or_default(),
        ]);
    }
    for line in columns.render(2) {
        ui.message(&line);
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(stub) = &self.stub else {
            return self.list_stubs(ui);
        };

        let ctx = self.source.context()?;
        let overview = stub_overview(&ctx, stub).map_err(InvokeError::from)?;
        show_overview(ui, &overview);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvokeConfig;
    use crate::stubs::Stub;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup(stub: Option<&str>, files: &[(&str, &str)]) -> (TempDir, ConfigSource) {
        let temp = TempDir::new().unwrap();
        let mut config = InvokeConfig::default();
        if let Some(name) = stub {
            let root = temp.path().join(name);
            fs::create_dir_all(root.join("Commands")).unwrap();
            for (file, content) in files {
                fs::write(root.join("Commands").join(file), content).unwrap();
            }
            config.stubs.insert_unchecked(Stub::new(name, root));
        }
        let source = ConfigSource::new(temp.path().join("config.yml"));
        source.save(&config).unwrap();
        (temp, source)
    }

    #[test]
    fn lists_stubs_and_verbs() {
        let (_temp, source) = setup(Some("Demo"), &[]);
        let mut ui = MockUI::new();

        let result = ListCommand::new(source, None).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("Demo"));
        assert!(ui.has_message("search"));
        assert!(ui.has_message("update"));
        assert!(!ui.has_message("__complete"));
    }

    #[test]
    fn empty_registry_hints_at_stubs_add() {
        let (_temp, source) = setup(None, &[]);
        let mut ui = MockUI::new();

        ListCommand::new(source, None).execute(&mut ui).unwrap();

        assert!(ui.has_message("(none registered)"));
        assert!(ui.has_hint("invoke stubs add"));
    }

    #[test]
    fn marks_shadowed_stub() {
        let (_temp, source) = setup(Some("Search"), &[]);
        let mut ui = MockUI::new();

        ListCommand::new(source, None).execute(&mut ui).unwrap();

        assert!(ui.has_message("shadowed by verb"));
    }

    #[test]
    fn lists_stub_commands_with_synopsis() {
        let (_temp, source) = setup(
            Some("Demo"),
            &[
                ("deploy.sh", "#!/bin/sh\n# .SYNOPSIS\n#   Ship it\n"),
                ("beta.build.sh", "#!/bin/sh\n"),
            ],
        );
        let mut ui = MockUI::new();

        ListCommand::new(source, Some("Demo".into()))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("deploy"));
        assert!(ui.has_message("Ship it"));
        assert!(!ui.has_message("build"));
    }

    #[test]
    fn beta_override_shows_beta_commands() {
        let (_temp, source) = setup(Some("Demo"), &[("beta.build.sh", "#!/bin/sh\n")]);
        let source = source.with_overrides(crate::discovery::VisibilityPolicy {
            alpha: false,
            beta: true,
        });
        let mut ui = MockUI::new();

        ListCommand::new(source, Some("Demo".into()))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("build"));
        assert!(ui.has_message("[beta]"));
    }

    #[test]
    fn missing_commands_dir_warns() {
        let temp = TempDir::new().unwrap();
        let mut config = InvokeConfig::default();
        config
            .stubs
            .register(Stub::new("Empty", temp.path().join("empty")))
            .unwrap();
        let source = ConfigSource::new(temp.path().join("config.yml"));
        source.save(&config).unwrap();
        let mut ui = MockUI::new();

        let result = ListCommand::new(source, Some("Empty".into()))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_warning("no Commands directory"));
    }

    #[test]
    fn unknown_stub_fails() {
        let (_temp, source) = setup(None, &[]);
        let mut ui = MockUI::new();

        let err = ListCommand::new(source, Some("Nope".into()))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, InvokeError::StubNotFound { .. }));
    }
}
