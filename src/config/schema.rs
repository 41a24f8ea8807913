//! Configuration schema.
//!
//! ```yaml
//! version: 1
//! visibility:
//!   alpha: false
//!   beta: true
//! interpreters:
//!   powershell: pwsh
//!   posix: sh
//! stubs:
//!   Demo:
//!     path: /srv/stubs/demo
//!     remote: https://example.com/demo.git
//! ```

use serde::{Deserialize, Serialize};

use crate::context::EngineContext;
use crate::discovery::VisibilityPolicy;
use crate::invoker::Interpreters;
use crate::stubs::StubRegistry;

/// Current schema version.
pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Persisted settings: registered stubs, visibility and interpreters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeConfig {
    /// Schema version for migration.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Which lifecycle stages are visible.
    #[serde(default)]
    pub visibility: VisibilityPolicy,

    /// Interpreter programs for scripts.
    #[serde(default)]
    pub interpreters: Interpreters,

    /// Registered stubs keyed by name.
    #[serde(default)]
    pub stubs: StubRegistry,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            visibility: VisibilityPolicy::default(),
            interpreters: Interpreters::default(),
            stubs: StubRegistry::default(),
        }
    }
}

impl InvokeConfig {
    /// Build the engine context these settings describe.
    pub fn context(&self) -> EngineContext {
        EngineContext {
            registry: self.stubs.clone(),
            policy: self.visibility,
            interpreters: self.interpreters.clone(),
        }
    }
}
