//! Command resolution.
//!
//! Maps `(stub, command)` to exactly one file. Candidates come from the same
//! scan that listing uses, and names compare ASCII case-insensitively, so a
//! listed command always resolves to the variant shown. Among candidates:
//!
//! 1. `alpha.<command>` (if alpha is visible), directly in `Commands`, then in `Commands/<command>/`
//! 2. `beta.<command>` (if beta is visible), same two places
//! 3. `<command>`, same two places
//!
//! Each place prefers script forms over executable forms.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::lifecycle::{CommandFile, LifecycleStage, VisibilityPolicy, METADATA_PREFIX};
use super::scanner::discover;
use crate::context::EngineContext;
use crate::error::InvokeError;

/// Why resolution produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    /// The stub name is not registered.
    #[error("stub '{0}' is not registered")]
    Stub(String),

    /// The stub exists but has no visible command by this name.
    #[error("command '{command}' not found in stub '{stub}'")]
    Command { stub: String, command: String },
}

impl From<NotFound> for InvokeError {
    fn from(err: NotFound) -> Self {
        match err {
            NotFound::Stub(stub) => InvokeError::StubNotFound { stub },
            NotFound::Command { stub, command } => InvokeError::CommandNotFound { stub, command },
        }
    }
}

/// Resolve a command within a registered stub.
pub fn resolve(ctx: &EngineContext, stub: &str, command: &str) -> Result<CommandFile, NotFound> {
    let entry = ctx
        .registry
        .get(stub)
        .ok_or_else(|| NotFound::Stub(stub.to_string()))?;

    resolve_in_root(&entry.root, command, &ctx.policy).ok_or_else(|| NotFound::Command {
        stub: stub.to_string(),
        command: command.to_string(),
    })
}

/// Resolve a command under a stub root directly.
pub fn resolve_in_root(
    stub_root: &Path,
    command: &str,
    policy: &VisibilityPolicy,
) -> Option<CommandFile> {
    if !is_resolvable_name(command) {
        debug!("'{}' is not a resolvable command name", command);
        return None;
    }

    let found = discover(stub_root, policy)
        .into_iter()
        .find(|file| file.name.eq_ignore_ascii_case(command));
    match &found {
        Some(file) => debug!("Resolved '{}' to {}", command, file.path.display()),
        None => debug!("No visible '{}' under {}", command, stub_root.display()),
    }
    found
}

/// Command names users may type.
///
/// Lifecycle and metadata prefixes are rejected so that visibility is
/// governed by policy alone, and path-like names cannot escape `Commands`.
fn is_resolvable_name(command: &str) -> bool {
    if command.is_empty() || command.starts_with('.') {
        return false;
    }
    if command.contains(['/', '\\']) {
        return false;
    }
    let (stage, _) = LifecycleStage::split(command);
    if stage != LifecycleStage::Production {
        return false;
    }
    !command
        .get(..METADATA_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(METADATA_PREFIX))
}
