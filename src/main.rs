//! invoke CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use invoke::cli::{Cli, CommandDispatcher, Commands, ConfigSource};
use invoke::config::resolve_config_path;
use invoke::discovery::VisibilityPolicy;
use invoke::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; stdout belongs to listings, completions and children.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("invoke=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invoke=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("invoke starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
    }

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);
    let is_interactive = !matches!(cli.command, Some(Commands::Complete(_)));
    let mut ui = create_ui(is_interactive, output_mode);

    let config_path = match resolve_config_path(cli.config.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            ui.error(&e.to_string());
            return exit_code(e.exit_code());
        }
    };

    let source = ConfigSource::new(config_path).with_overrides(VisibilityPolicy {
        alpha: cli.alpha,
        beta: cli.beta,
    });
    let dispatcher = CommandDispatcher::new(source);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => exit_code(result.exit_code),
        Err(e) => {
            ui.error(&e.to_string());
            exit_code(e.exit_code())
        }
    }
}
