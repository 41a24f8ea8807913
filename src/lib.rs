//! invoke - Run commands from registered stubs.
//!
//! A stub is a named directory whose `Commands` folder holds PowerShell
//! scripts, POSIX shell scripts and executables. `invoke <stub> <command>`
//! resolves a command by name, honouring `alpha.`/`beta.` lifecycle
//! prefixes, and runs it with the remaining arguments.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`completion`] - Shell completion queries
//! - [`config`] - Persisted registry and visibility settings
//! - [`context`] - The explicit engine context every operation takes
//! - [`discovery`] - Command discovery and resolution
//! - [`error`] - Error types and result aliases
//! - [`invoker`] - Launching commands and forwarding arguments
//! - [`params`] - Parameter and help introspection
//! - [`remote`] - Git-backed remote tracking for `update`
//! - [`stubs`] - The stub registry
//! - [`ui`] - Terminal output, spinners and themes
//! - [`verbs`] - `search`, `help` and `update`
//!
//! # Example
//!
//! ```
//! use invoke::context::EngineContext;
//! use invoke::discovery::{resolve, NotFound};
//! use invoke::stubs::{Stub, StubRegistry};
//!
//! let mut registry = StubRegistry::new();
//! registry.register(Stub::new("Demo", "/nonexistent/demo")).unwrap();
//! let ctx = EngineContext::new(registry);
//!
//! let err = resolve(&ctx, "Demo", "deploy").unwrap_err();
//! assert!(matches!(err, NotFound::Command { .. }));
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod invoker;
pub mod params;
pub mod remote;
pub mod stubs;
pub mod ui;
pub mod verbs;

pub use error::{InvokeError, Result};
