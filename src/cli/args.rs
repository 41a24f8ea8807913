//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Anything that is not one of
//! the subcommands below is captured as a stub invocation.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::CONFIG_ENV;

/// invoke - Run commands from registered stubs.
#[derive(Debug, Parser)]
#[command(name = "invoke")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(override_usage = "invoke [OPTIONS] [STUB] [COMMAND] [ARGS]...")]
pub struct Cli {
    /// Path to config file (overrides ~/.invoke/config.yml)
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show alpha commands for this run
    #[arg(long)]
    pub alpha: bool,

    /// Show beta commands for this run
    #[arg(long)]
    pub beta: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search command names and help across all stubs
    Search(SearchArgs),

    /// Show help for a stub or one of its commands
    Help(HelpArgs),

    /// Refresh stubs from their remotes
    Update(UpdateArgs),

    /// Manage registered stubs
    Stubs(StubsArgs),

    /// Show or change which lifecycle stages are visible
    Visibility(VisibilityArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print completion candidates for partially typed words
    #[command(name = "__complete", hide = true)]
    Complete(CompleteArgs),

    /// Run a stub command: <STUB> [COMMAND] [ARGS]...
    #[command(external_subcommand)]
    Stub(Vec<String>),
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Words to look for in command names and help
    #[arg(num_args = 0..)]
    pub query: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `help` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HelpArgs {
    /// Stub to describe
    pub stub: Option<String>,

    /// Command to describe
    pub command: Option<String>,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    /// Update only this stub
    pub stub: Option<String>,
}

/// Arguments for the `stubs` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StubsArgs {
    #[command(subcommand)]
    pub action: StubsAction,
}

/// Subcommands of `stubs`.
#[derive(Debug, Clone, Subcommand)]
pub enum StubsAction {
    /// Register a stub
    Add(StubsAddArgs),

    /// Unregister a stub (files are left alone)
    Remove(StubsRemoveArgs),

    /// List registered stubs
    List(StubsListArgs),
}

/// Arguments for `stubs add`.
#[derive(Debug, Clone, clap::Args)]
pub struct StubsAddArgs {
    /// Name used on the command line
    pub name: String,

    /// Root directory of the stub
    pub path: PathBuf,

    /// Git remote tracked by `update`
    #[arg(long)]
    pub remote: Option<String>,

    /// Replace an existing stub with the same name
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `stubs remove`.
#[derive(Debug, Clone, clap::Args)]
pub struct StubsRemoveArgs {
    /// Stub to unregister
    pub name: String,
}

/// Arguments for `stubs list`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StubsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// On/off switch for a persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

/// Arguments for the `visibility` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VisibilityArgs {
    /// Persist alpha visibility
    #[arg(long = "alpha", value_name = "on|off")]
    pub alpha: Option<Toggle>,

    /// Persist beta visibility
    #[arg(long = "beta", value_name = "on|off")]
    pub beta: Option<Toggle>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Arguments for the hidden `__complete` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CompleteArgs {
    /// Words typed after `invoke`; the last one is being completed
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    pub words: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_args_has_no_command() {
        let cli = Cli::try_parse_from(["invoke"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_word_is_a_stub_invocation() {
        let cli =
            Cli::try_parse_from(["invoke", "Demo", "deploy", "-Environment", "prod"]).unwrap();
        match cli.command {
            Some(Commands::Stub(words)) => {
                assert_eq!(words, ["Demo", "deploy", "-Environment", "prod"]);
            }
            other => panic!("expected stub invocation, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_before_stub() {
        let cli = Cli::try_parse_from(["invoke", "--alpha", "--quiet", "Demo"]).unwrap();
        assert!(cli.alpha);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Stub(_))));
    }

    #[test]
    fn search_collects_query_words() {
        let cli = Cli::try_parse_from(["invoke", "search", "deploy", "prod", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.query, ["deploy", "prod"]);
                assert!(args.json);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn visibility_parses_toggles() {
        let cli = Cli::try_parse_from(["invoke", "visibility", "--alpha", "on"]).unwrap();
        match cli.command {
            Some(Commands::Visibility(args)) => {
                assert_eq!(args.alpha, Some(Toggle::On));
                assert_eq!(args.beta, None);
            }
            other => panic!("expected visibility, got {:?}", other),
        }
    }

    #[test]
    fn complete_accepts_flag_words() {
        let cli =
            Cli::try_parse_from(["invoke", "__complete", "Demo", "deploy", "-Env"]).unwrap();
        match cli.command {
            Some(Commands::Complete(args)) => {
                assert_eq!(args.words, ["Demo", "deploy", "-Env"]);
            }
            other => panic!("expected __complete, got {:?}", other),
        }
    }

    #[test]
    fn stubs_add_with_remote() {
        let cli = Cli::try_parse_from([
            "invoke",
            "stubs",
            "add",
            "Demo",
            "/srv/demo",
            "--remote",
            "https://example.com/demo.git",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Stubs(StubsArgs {
                action: StubsAction::Add(args),
            })) => {
                assert_eq!(args.name, "Demo");
                assert_eq!(args.remote.as_deref(), Some("https://example.com/demo.git"));
                assert!(!args.force);
            }
            other => panic!("expected stubs add, got {:?}", other),
        }
    }
}
