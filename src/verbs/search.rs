//! Keyword search across every registered stub.

use serde::Serialize;
use tracing::debug;

use crate::context::EngineContext;
use crate::discovery::{visible_commands, LifecycleStage};
use crate::error::{InvokeError, Result};
use crate::params;

/// One matching command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub stub: String,
    pub command: String,
    pub stage: LifecycleStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
}

/// Find visible commands whose name or help mentions `query`.
///
/// Matching is a case-insensitive substring test. Lifecycle variants of a
/// command count once, as the variant resolution would pick. Results are
/// sorted by stub, then command. An empty query is a usage error.
pub fn search(ctx: &EngineContext, query: &str) -> Result<Vec<SearchHit>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(InvokeError::Usage {
            message: "search requires a non-empty query".to_string(),
        });
    }

    let mut hits = Vec::new();
    for stub in ctx.registry.iter() {
        for file in visible_commands(&stub.root, &ctx.policy) {
            let help = params::help_for(&file);
            let name_match = file.name.to_lowercase().contains(&needle);
            let help_match = help.as_ref().is_some_and(|h| h.mentions(&needle));
            if !(name_match || help_match) {
                continue;
            }
            hits.push(SearchHit {
                stub: stub.name.clone(),
                command: file.name.clone(),
                stage: file.stage,
                synopsis: help.as_ref().and_then(|h| h.summary()).map(str::to_string),
            });
        }
    }

    hits.sort_by(|a, b| {
        a.stub
            .cmp(&b.stub)
            .then_with(|| a.command.to_lowercase().cmp(&b.command.to_lowercase()))
    });
    debug!("Search for '{}' matched {} command(s)", needle, hits.len());
    Ok(hits)
}
