//! Parameter introspection.
//!
//! Extracts the declared parameters and help of a resolved command. Two
//! sources sit behind the [`SchemaSource`] trait:
//!
//! - [`ScriptSource`] reads the script's own declarations
//! - [`SidecarSource`] reads `metadata.<command>.yml` next to an executable
//!
//! Nothing is cached: the file is re-read on every call, since it may change
//! between invocations.

pub mod help;
pub mod schema;
pub mod script;
pub mod sidecar;

pub use help::CommandHelp;
pub use schema::{FlagStyle, Parameter, ParameterSchema, ValidationIssue};
pub use script::{is_common_parameter, ScriptSource, COMMON_PARAMETERS};
pub use sidecar::SidecarSource;

use crate::discovery::{CommandFile, CommandKind, ScriptLanguage};

/// Parameters and help of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDescription {
    pub schema: ParameterSchema,
    pub help: Option<CommandHelp>,
}

/// Capability to describe a command file.
pub trait SchemaSource {
    /// Read the file (or its sidecar) and extract a description.
    fn describe(&self, file: &CommandFile) -> anyhow::Result<CommandDescription>;
}

/// The source responsible for a command file's kind.
pub fn source_for(file: &CommandFile) -> &'static dyn SchemaSource {
    match file.kind {
        CommandKind::Script(_) => &ScriptSource,
        CommandKind::Executable => &SidecarSource,
    }
}

/// Flag style used by a command kind when nothing is declared.
pub fn default_style(kind: CommandKind) -> FlagStyle {
    match kind {
        CommandKind::Script(ScriptLanguage::PowerShell) => FlagStyle::SingleDash,
        _ => FlagStyle::DoubleDash,
    }
}

/// Describe a command; failures degrade to an empty description.
pub fn describe(file: &CommandFile) -> CommandDescription {
    match source_for(file).describe(file) {
        Ok(description) => description,
        Err(e) => {
            tracing::warn!("Cannot introspect {}: {:#}", file.path.display(), e);
            CommandDescription {
                schema: ParameterSchema::empty(default_style(file.kind)),
                help: None,
            }
        }
    }
}

/// Extract the parameter schema of a command. Never fails.
pub fn introspect(file: &CommandFile) -> ParameterSchema {
    describe(file).schema
}

/// Structured help of a command, if it documents any.
pub fn help_for(file: &CommandFile) -> Option<CommandHelp> {
    describe(file).help
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Location;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn script_schema_comes_from_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greet.ps1");
        fs::write(&path, "param([Parameter(Mandatory)][string]$Name)\n").unwrap();

        let file = CommandFile::from_path(&path, Location::Direct).unwrap();
        let schema = introspect(&file);
        assert_eq!(schema.len(), 1);
        assert!(schema.get("Name").unwrap().required);
    }

    #[test]
    fn executable_schema_comes_from_sidecar() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("beta.rotate.exe");
        fs::write(&path, "").unwrap();
        fs::write(
            temp.path().join("metadata.rotate.yml"),
            "synopsis: Rotate\nparameters:\n  - name: days\n",
        )
        .unwrap();

        let file = CommandFile::from_path(&path, Location::Direct).unwrap();
        let desc = describe(&file);
        assert!(desc.schema.get("days").is_some());
        assert_eq!(desc.help.unwrap().summary(), Some("Rotate"));
    }

    #[test]
    fn executable_without_sidecar_is_opaque() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tool.exe");
        fs::write(&path, "").unwrap();

        let file = CommandFile::from_path(&path, Location::Direct).unwrap();
        let desc = describe(&file);
        assert!(desc.schema.is_empty());
        assert!(desc.help.is_none());
    }

    #[test]
    fn vanished_file_yields_empty_schema() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.ps1");
        fs::write(&path, "param($X)").unwrap();
        let file = CommandFile::from_path(&path, Location::Direct).unwrap();
        fs::remove_file(&path).unwrap();

        let schema = introspect(&file);
        assert!(schema.is_empty());
        assert_eq!(schema.style, FlagStyle::SingleDash);
    }

    #[test]
    fn broken_sidecar_degrades_gracefully() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tool.exe");
        fs::write(&path, "").unwrap();
        fs::write(temp.path().join("metadata.tool.yml"), "parameters: [[[").unwrap();

        let file = CommandFile::from_path(&path, Location::Direct).unwrap();
        assert!(introspect(&file).is_empty());
    }
}
