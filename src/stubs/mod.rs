//! Stub registry.
//!
//! A stub is a named namespace mapping to a root directory whose `Commands`
//! subtree holds invocable scripts and executables. The registry is pure
//! data: lookup, insert, remove. Persisting it is the job of [`crate::config`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{InvokeError, Result};

/// Top-level words intercepted before stub resolution.
///
/// A stub registered under one of these names can never be reached: the verb wins.
pub const RESERVED_NAMES: &[&str] = &[
    "search",
    "help",
    "update",
    "stubs",
    "visibility",
    "completions",
    "__complete",
];

/// Check whether a name collides with a reserved verb (case-insensitive).
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// A registered stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    /// Unique registry key.
    pub name: String,
    /// Root directory; need not exist.
    pub root: PathBuf,
    /// Remote repository tracked by `update`.
    pub remote: Option<String>,
    /// When the stub was registered.
    pub registered_at: Option<DateTime<Utc>>,
    /// Last successful `update`.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Stub {
    /// Create a stub with no remote-tracking metadata.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            remote: None,
            registered_at: None,
            last_updated: None,
        }
    }

    /// Attach a remote URL.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// The directory scanned for commands.
    pub fn commands_dir(&self) -> PathBuf {
        commands_dir(&self.root)
    }
}

/// The `Commands` directory under a stub root.
pub fn commands_dir(root: &Path) -> PathBuf {
    root.join("Commands")
}

/// On-disk shape of a stub; the name is the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubEntry {
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Name → stub mapping.
///
/// Names compare ASCII case-insensitively; each stub keeps the spelling it
/// was registered with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, StubEntry>",
    into = "BTreeMap<String, StubEntry>"
)]
pub struct StubRegistry {
    stubs: BTreeMap<String, Stub>,
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl From<BTreeMap<String, StubEntry>> for StubRegistry {
    fn from(entries: BTreeMap<String, StubEntry>) -> Self {
        let stubs = entries
            .into_iter()
            .map(|(name, entry)| {
                let stub = Stub {
                    name: name.clone(),
                    root: entry.path,
                    remote: entry.remote,
                    registered_at: entry.registered_at,
                    last_updated: entry.last_updated,
                };
                (key(&name), stub)
            })
            .collect();
        Self { stubs }
    }
}

impl From<StubRegistry> for BTreeMap<String, StubEntry> {
    fn from(registry: StubRegistry) -> Self {
        registry
            .stubs
            .into_values()
            .map(|stub| {
                let entry = StubEntry {
                    path: stub.root,
                    remote: stub.remote,
                    registered_at: stub.registered_at,
                    last_updated: stub.last_updated,
                };
                (stub.name, entry)
            })
            .collect()
    }
}

impl StubRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stub by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Stub> {
        self.stubs.get(&key(name))
    }

    /// Mutable lookup, used to record update metadata.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Stub> {
        self.stubs.get_mut(&key(name))
    }

    /// Register a stub, overwriting any existing entry with the same name
    /// in any case.
    ///
    /// Reserved verb names are rejected.
    pub fn register(&mut self, stub: Stub) -> Result<()> {
        if is_reserved(&stub.name) {
            return Err(InvokeError::ReservedStubName { name: stub.name });
        }
        if stub.name.trim().is_empty() {
            return Err(InvokeError::ConfigValidationError {
                message: "stub name cannot be empty".to_string(),
            });
        }
        tracing::debug!("Registering stub '{}' at {}", stub.name, stub.root.display());
        self.stubs.insert(key(&stub.name), stub);
        Ok(())
    }

    /// Insert without the reserved-name check.
    ///
    /// Mirrors what a hand-edited config file can contain.
    pub fn insert_unchecked(&mut self, stub: Stub) {
        self.stubs.insert(key(&stub.name), stub);
    }

    /// Remove a stub. The file tree under its root is left untouched.
    pub fn remove(&mut self, name: &str) -> Option<Stub> {
        self.stubs.remove(&key(name))
    }

    /// Whether a stub is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.stubs.contains_key(&key(name))
    }

    /// All stub names as registered, sorted case-insensitively.
    pub fn names(&self) -> Vec<&str> {
        self.stubs.values().map(|stub| stub.name.as_str()).collect()
    }

    /// Iterate stubs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Stub> {
        self.stubs.values()
    }

    /// Iterate stubs mutably in name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stub> {
        self.stubs.values_mut()
    }

    /// Number of registered stubs.
    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}
