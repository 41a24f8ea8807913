//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Words that are not subcommands go
//! through verb routing first, so `invoke Search x` still searches.

pub mod complete;
pub mod completions;
pub mod dispatcher;
pub mod help;
pub mod list;
pub mod run;
pub mod search;
pub mod stubs;
pub mod update;
pub mod visibility;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, ConfigSource};
