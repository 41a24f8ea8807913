//! Command discovery.
//!
//! Scans a stub's `Commands` directory one level deep. Files directly in
//! `Commands` are candidates; inside a subfolder `D` only files named after
//! `D` (optionally `alpha.`/`beta.` prefixed) are. Everything else in a
//! subfolder is a helper file and stays invisible.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use super::lifecycle::{CommandFile, Location, VisibilityPolicy};
use crate::stubs::commands_dir;

/// Discover all commands under a stub root visible to `policy`.
///
/// A missing `Commands` directory yields an empty list. Results are sorted
/// by name, then by resolution precedence, so lifecycle variants of one
/// command are adjacent with the winning variant first.
pub fn discover(stub_root: &Path, policy: &VisibilityPolicy) -> Vec<CommandFile> {
    let commands = commands_dir(stub_root);
    let entries = match fs::read_dir(&commands) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No commands under {}: {}", commands.display(), e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_subfolder(&path, &mut found);
        } else if path.is_file() {
            if let Some(file) = CommandFile::from_path(&path, Location::Direct) {
                found.push(file);
            }
        }
    }

    found.retain(|file| policy.allows(file.stage));
    found.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.precedence().cmp(&b.precedence()))
            .then_with(|| a.path.cmp(&b.path))
    });

    debug!(
        "Discovered {} command file(s) under {}",
        found.len(),
        commands.display()
    );
    found
}

/// Discover commands, keeping only the variant resolution would pick per name.
pub fn visible_commands(stub_root: &Path, policy: &VisibilityPolicy) -> Vec<CommandFile> {
    let mut winners: BTreeMap<String, CommandFile> = BTreeMap::new();
    for file in discover(stub_root, policy) {
        let key = file.name.to_lowercase();
        match winners.get(&key) {
            Some(existing) if existing.precedence() <= file.precedence() => {}
            _ => {
                winners.insert(key, file);
            }
        }
    }
    winners.into_values().collect()
}

/// Whether the stub root has a `Commands` directory at all.
pub fn has_commands_dir(stub_root: &Path) -> bool {
    commands_dir(stub_root).is_dir()
}

fn scan_subfolder(dir: &Path, found: &mut Vec<CommandFile>) {
    let Some(folder) = dir.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match CommandFile::from_path(&path, Location::Subfolder) {
            Some(file) if file.name.eq_ignore_ascii_case(folder) => found.push(file),
            _ => trace!("Skipping helper file {}", path.display()),
        }
    }
}
