//! Help for commands and listings of stubs.

use serde::Serialize;
use std::path::PathBuf;

use crate::context::EngineContext;
use crate::discovery::{
    has_commands_dir, resolve, visible_commands, CommandFile, LifecycleStage, NotFound,
};
use crate::params::{self, CommandHelp, ParameterSchema};

/// Help for one resolved command.
#[derive(Debug, Clone, Serialize)]
pub struct HelpReport {
    pub stub: String,
    pub command: CommandFile,
    pub schema: ParameterSchema,
    /// `None` means no help is available; that is not an error.
    pub help: Option<CommandHelp>,
}

/// Resolve a command and collect its help and parameters.
pub fn command_help(
    ctx: &EngineContext,
    stub: &str,
    command: &str,
) -> Result<HelpReport, NotFound> {
    let file = resolve(ctx, stub, command)?;
    let description = params::describe(&file);
    Ok(HelpReport {
        stub: stub.to_string(),
        command: file,
        schema: description.schema,
        help: description.help,
    })
}

/// One line of a stub listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub stage: LifecycleStage,
    pub synopsis: Option<String>,
}

/// The visible commands of a stub.
#[derive(Debug, Clone, Serialize)]
pub struct StubOverview {
    pub stub: String,
    pub root: PathBuf,
    /// `false` when the root has no `Commands` directory.
    pub has_commands_dir: bool,
    pub commands: Vec<CommandSummary>,
}

/// List a stub's visible commands with their one-line summaries.
pub fn stub_overview(ctx: &EngineContext, stub: &str) -> Result<StubOverview, NotFound> {
    let entry = ctx.stub(stub)?;
    let commands = visible_commands(&entry.root, &ctx.policy)
        .into_iter()
        .map(|file| CommandSummary {
            synopsis: params::help_for(&file)
                .as_ref()
                .and_then(|h| h.summary())
                .map(str::to_string),
            name: file.name,
            stage: file.stage,
        })
        .collect();

    Ok(StubOverview {
        stub: entry.name.clone(),
        root: entry.root.clone(),
        has_commands_dir: has_commands_dir(&entry.root),
        commands,
    })
}
