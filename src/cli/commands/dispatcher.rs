//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`ConfigSource`] for loading and saving the settings a command works on
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::args::{Cli, Commands, HelpArgs, SearchArgs, UpdateArgs};
use crate::config::{load_config, save_config, InvokeConfig};
use crate::context::EngineContext;
use crate::discovery::VisibilityPolicy;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::verbs::{route, Route, VirtualVerb};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where settings live, plus the stages enabled for this run only.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    overrides: VisibilityPolicy,
}

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overrides: VisibilityPolicy::default(),
        }
    }

    /// Enable stages on top of the persisted policy without saving them.
    pub fn with_overrides(mut self, overrides: VisibilityPolicy) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted settings.
    pub fn load(&self) -> Result<InvokeConfig> {
        load_config(&self.path)
    }

    /// Persist settings back to the same file.
    pub fn save(&self, config: &InvokeConfig) -> Result<()> {
        save_config(config, &self.path)
    }

    /// Build the engine context for this run.
    pub fn context(&self) -> Result<EngineContext> {
        let config = self.load()?;
        Ok(self.context_from(&config))
    }

    /// Engine context for already-loaded settings.
    pub fn context_from(&self, config: &InvokeConfig) -> EngineContext {
        let mut ctx = config.context();
        ctx.policy.alpha |= self.overrides.alpha;
        ctx.policy.beta |= self.overrides.beta;
        ctx
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: ConfigSource,
}

impl CommandDispatcher {
    /// Create a new dispatcher over the given settings.
    pub fn new(source: ConfigSource) -> Self {
        Self { source }
    }

    /// Get the settings source.
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = self.source.clone();
        match &cli.command {
            Some(Commands::Search(args)) => {
                super::search::SearchCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Help(args)) => {
                super::help::HelpCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Update(args)) => {
                super::update::UpdateCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Stubs(args)) => {
                super::stubs::StubsCommand::new(source, args.action.clone()).execute(ui)
            }
            Some(Commands::Visibility(args)) => {
                super::visibility::VisibilityCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            Some(Commands::Complete(args)) => {
                super::complete::CompleteCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Stub(words)) => self.dispatch_words(words, ui),
            None => super::list::ListCommand::new(source, None).execute(ui),
        }
    }

    /// Route free-form words. Verbs typed in any case still win over stubs.
    fn dispatch_words(&self, words: &[String], ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = self.source.clone();
        match route(words) {
            Route::ListStubs => super::list::ListCommand::new(source, None).execute(ui),
            Route::ListCommands(stub) => {
                super::list::ListCommand::new(source, Some(stub.to_string())).execute(ui)
            }
            Route::Verb(verb, rest) => {
                debug!("Routing '{}' to the {} verb", words[0], verb.name());
                match verb {
                    VirtualVerb::Search => {
                        let args = SearchArgs {
                            query: rest.to_vec(),
                            json: false,
                        };
                        super::search::SearchCommand::new(source, args).execute(ui)
                    }
                    VirtualVerb::Help => {
                        let args = HelpArgs {
                            stub: rest.first().cloned(),
                            command: rest.get(1).cloned(),
                        };
                        super::help::HelpCommand::new(source, args).execute(ui)
                    }
                    VirtualVerb::Update => {
                        let args = UpdateArgs {
                            stub: rest.first().cloned(),
                        };
                        super::update::UpdateCommand::new(source, args).execute(ui)
                    }
                }
            }
            Route::Invoke {
                stub,
                command,
                args,
            } => super::run::RunCommand::new(source, stub, command, args.to_vec()).execute(ui),
        }
    }
}
