//! Sidecar metadata for executables.
//!
//! Native executables carry no parameter metadata of their own. A YAML file
//! named `metadata.<command>.yml` next to the executable can document them:
//!
//! ```yaml
//! synopsis: Rotate TLS certificates
//! description: |
//!   Replaces certificates that expire within the window.
//! parameters:
//!   - name: days
//!     type: int
//!     required: true
//!     help: Expiry window in days
//!   - name: mode
//!     values: [dry-run, apply]
//! examples:
//!   - invoke Ops rotate --days 30
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::help::CommandHelp;
use super::schema::{FlagStyle, Parameter, ParameterSchema};
use super::{CommandDescription, SchemaSource};
use crate::discovery::{CommandFile, METADATA_PREFIX};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidecarFile {
    synopsis: Option<String>,
    description: Option<String>,
    #[serde(default)]
    parameters: Vec<SidecarParameter>,
    #[serde(default)]
    examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidecarParameter {
    name: String,
    #[serde(rename = "type", default = "default_type")]
    type_name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    values: Vec<String>,
    help: Option<String>,
}

fn default_type() -> String {
    "string".to_string()
}

/// Schema source backed by a sidecar metadata file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSource;

impl SchemaSource for SidecarSource {
    fn describe(&self, file: &CommandFile) -> Result<CommandDescription> {
        let Some(path) = sidecar_path(file.dir(), &file.name) else {
            return Ok(CommandDescription::default());
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        parse_sidecar(&content).with_context(|| format!("invalid metadata in {}", path.display()))
    }
}

/// Locate `metadata.<command>.yml` (or `.yaml`) in `dir`.
pub fn sidecar_path(dir: &Path, command: &str) -> Option<PathBuf> {
    ["yml", "yaml"]
        .iter()
        .map(|ext| dir.join(format!("{}{}.{}", METADATA_PREFIX, command, ext)))
        .find(|p| p.is_file())
}

/// Parse sidecar YAML into a description.
pub fn parse_sidecar(content: &str) -> Result<CommandDescription> {
    let sidecar: SidecarFile = serde_yaml::from_str(content)?;

    let parameters = sidecar
        .parameters
        .into_iter()
        .map(|p| Parameter {
            name: p.name,
            type_name: p.type_name,
            required: p.required,
            values: p.values,
            help: p.help,
        })
        .collect();

    let help = CommandHelp {
        synopsis: sidecar.synopsis,
        description: sidecar.description,
        examples: sidecar.examples,
        parameters: Default::default(),
    };

    Ok(CommandDescription {
        schema: ParameterSchema::new(FlagStyle::DoubleDash, parameters),
        help: (!help.is_empty()).then_some(help),
    })
}
