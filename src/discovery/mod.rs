//! Command discovery and resolution.
//!
//! - [`lifecycle`] - lifecycle stages, visibility policy, and the [`CommandFile`] model
//! - [`scanner`] - full scan of a stub's `Commands` tree
//! - [`resolver`] - targeted, precedence-ordered lookup of one command

pub mod lifecycle;
pub mod resolver;
pub mod scanner;

pub use lifecycle::{
    CommandFile, CommandKind, LifecycleStage, Location, ScriptLanguage, VisibilityPolicy,
    METADATA_PREFIX,
};
pub use resolver::{resolve, resolve_in_root, NotFound};
pub use scanner::{discover, has_commands_dir, visible_commands};
