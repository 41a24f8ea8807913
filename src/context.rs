//! Engine context.
//!
//! Every engine operation takes the registry and visibility policy
//! explicitly through an [`EngineContext`], so tests construct their own
//! instead of mutating process-wide state.

use crate::discovery::{NotFound, VisibilityPolicy};
use crate::invoker::Interpreters;
use crate::stubs::{Stub, StubRegistry};

/// Everything resolution and invocation read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineContext {
    pub registry: StubRegistry,
    pub policy: VisibilityPolicy,
    pub interpreters: Interpreters,
}

impl EngineContext {
    /// Create a context over a registry with production-only visibility.
    pub fn new(registry: StubRegistry) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    /// Replace the visibility policy.
    pub fn with_policy(mut self, policy: VisibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Look up a registered stub.
    pub fn stub(&self, name: &str) -> Result<&Stub, NotFound> {
        self.registry
            .get(name)
            .ok_or_else(|| NotFound::Stub(name.to_string()))
    }
}
