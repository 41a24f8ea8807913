//! Help command implementation.
//!
//! - `invoke help` shows usage
//! - `invoke help <stub>` lists the stub's commands
//! - `invoke help <stub> <command>` shows the command's help and parameters

use crate::cli::args::HelpArgs;
use crate::error::{InvokeError, Result};
use crate::params::CommandHelp;
use crate::ui::{Columns, UserInterface};
use crate::verbs::{command_help, stub_overview, HelpReport};

use super::dispatcher::{Command, CommandResult, ConfigSource};
use super::list::show_overview;

/// The help command implementation.
pub struct HelpCommand {
    source: ConfigSource,
    args: HelpArgs,
}

impl HelpCommand {
    /// Create a new help command.
    pub fn new(source: ConfigSource, args: HelpArgs) -> Self {
        Self { source, args }
    }
}

impl Command for HelpCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(stub) = &self.args.stub else {
            show_usage(ui);
            return Ok(CommandResult::success());
        };

        let ctx = self.source.context()?;
        match &self.args.command {
            None => {
                let overview = stub_overview(&ctx, stub).map_err(InvokeError::from)?;
                show_overview(ui, &overview);
            }
            Some(command) => {
                let report = command_help(&ctx, stub, command).map_err(InvokeError::from)?;
                show_report(ui, &report);
            }
        }
        Ok(CommandResult::success())
    }
}

fn show_usage(ui: &mut dyn UserInterface) {
    ui.show_header("Usage:");
    ui.message("  invoke                          list stubs and verbs");
    ui.message("  invoke <stub>                   list a stub's commands");
    ui.message("  invoke <stub> <command> [args]  run a command");
    ui.message("  invoke search <query>           search all stubs");
    ui.message("  invoke help <stub> [<command>]  show help");
    ui.message("  invoke update [<stub>]          refresh stubs from their remotes");
}

fn show_report(ui: &mut dyn UserInterface, report: &HelpReport) {
    let theme = ui.theme().clone();
    let command = &report.command;

    let stage = theme.format_stage(command.stage);
    let title = format!("{} {}", report.stub, command.name);
    if stage.is_empty() {
        ui.show_header(&title);
    } else {
        ui.show_header(&format!("{} {}", title, stage));
    }
    if ui.output_mode().shows_detail() {
        ui.message(&format!("  {}", theme.dim.apply_to(command.path.display())));
    }

    match &report.help {
        Some(help) => show_help_text(ui, help),
        None => ui.message("  No help available."),
    }

    if !report.schema.is_empty() {
        ui.message("");
        ui.show_header("Parameters:");
        let mut columns = Columns::new();
        for parameter in report.schema.iter() {
            let mut kind = parameter.type_name.clone();
            if parameter.required {
                kind.push_str(", required");
            }
            let mut about = parameter.help.clone().unwrap_or_default();
            if !parameter.values.is_empty() {
                if !about.is_empty() {
                    about.push(' ');
                }
                about.push_str(&format!("[{}]", parameter.values.join(", ")));
            }
            columns.add_row([
                theme.flag.apply_to(report.schema.flag(parameter)).to_string(),
                theme.dim.apply_to(format!("<{}>", kind)).to_string(),
                about,
            ]);
        }
        for line in columns.render(2) {
            ui.message(&line);
        }
    }
}

fn show_help_text(ui: &mut dyn UserInterface, help: &CommandHelp) {
    if let Some(synopsis) = &help.synopsis {
        ui.message(&format!("  {}", synopsis));
    }
    if let Some(description) = &help.description {
        ui.message("");
        for line in description.lines() {
            ui.message(&format!("  {}", line));
        }
    }
    for (i, example) in help.examples.iter().enumerate() {
        ui.message("");
        ui.message(&format!("  Example {}:", i + 1));
        for line in example.lines() {
            ui.message(&format!("    {}", line));
        }
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

    const DEPLOY: &str = r#"<#
.SYNOPSIS
    Deploy the service.
.DESCRIPTION
    Builds and ships the current branch.
.PARAMETER Environment
    Target environment.
.EXAMPLE
    invoke Ops deploy prod
#>
param(
    [Parameter(Mandatory)]
    [ValidateSet('dev', 'prod')]
    [string]$Environment,
    [switch]$Force
)
"#;

    fn setup() -> (TempDir, ConfigSource) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ops");
        fs::create_dir_all(root.join("Commands")).unwrap();
        fs::write(root.join("Commands/deploy.ps1"), DEPLOY).unwrap();
        fs::write(root.join("Commands/bare.sh"), "echo hi\n").unwrap();
        let mut config = InvokeConfig::default();
        config.stubs.register(Stub::new("Ops", root)).unwrap();
        let source = ConfigSource::new(temp.path().join("config.yml"));
        source.save(&config).unwrap();
        (temp, source)
    }

    fn args(stub: Option<&str>, command: Option<&str>) -> HelpArgs {
        HelpArgs {
            stub: stub.map(str::to_string),
            command: command.map(str::to_string),
        }
    }

    #[test]
    fn no_stub_shows_usage() {
        let (_temp, source) = setup();
        let mut ui = MockUI::new();

        HelpCommand::new(source, args(None, None))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.headers(), ["Usage:"]);
        assert!(ui.has_message("invoke search <query>"));
    }

    #[test]
    fn stub_lists_commands() {
        let (_temp, source) = setup();
        let mut ui = MockUI::new();

        HelpCommand::new(source, args(Some("Ops"), None))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("deploy"));
        assert!(ui.has_message("Deploy the service."));
        assert!(ui.has_message("bare"));
    }

    #[test]
    fn command_shows_help_and_parameters() {
        let (_temp, source) = setup();
        let mut ui = MockUI::new();

        HelpCommand::new(source, args(Some("Ops"), Some("deploy")))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("Deploy the service."));
        assert!(ui.has_message("Builds and ships"));
        assert!(ui.has_message("invoke Ops deploy prod"));
        assert!(ui.has_message("-Environment"));
        assert!(ui.has_message("[dev, prod]"));
        assert!(ui.has_message("-Force"));
    }

    #[test]
    fn command_without_help_says_so() {
        let (_temp, source) = setup();
        let mut ui = MockUI::new();

        HelpCommand::new(source, args(Some("Ops"), Some("bare")))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("No help available."));
    }

    #[test]
    fn unknown_command_is_not_found() {
        let (_temp, source) = setup();
        let mut ui = MockUI::new();

        let err = HelpCommand::new(source, args(Some("Ops"), Some("nope")))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, InvokeError::CommandNotFound { .. }));
    }
}
