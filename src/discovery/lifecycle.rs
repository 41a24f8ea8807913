//! Command identity: lifecycle stages, file kinds, and file-name parsing.
//!
//! The lifecycle stage of a command is encoded in its file name
//! (`alpha.deploy.ps1`, `beta.deploy.ps1`, `deploy.ps1`). It is decoded
//! exactly once, when a [`CommandFile`] is built, and carried as an enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of sidecar help files. Never a command.
pub const METADATA_PREFIX: &str = "metadata.";

/// Release stage of a command.
///
/// Ordering follows resolution precedence: `Alpha` shadows `Beta`, which
/// shadows `Production`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Alpha,
    Beta,
    Production,
}

impl LifecycleStage {
    /// File-name prefix for this stage.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Alpha => "alpha.",
            Self::Beta => "beta.",
            Self::Production => "",
        }
    }

    /// Split a lifecycle prefix off a file name (ASCII case-insensitive).
    pub fn split(file_name: &str) -> (Self, &str) {
        for stage in [Self::Alpha, Self::Beta] {
            let prefix = stage.prefix();
            if starts_with_ignore_case(file_name, prefix) {
                return (stage, &file_name[prefix.len()..]);
            }
        }
        (Self::Production, file_name)
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha => write!(f, "alpha"),
            Self::Beta => write!(f, "beta"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Which lifecycle stages are visible to discovery and resolution.
///
/// Production is always visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    #[serde(default)]
    pub alpha: bool,
    #[serde(default)]
    pub beta: bool,
}

impl VisibilityPolicy {
    /// Production only.
    pub fn production() -> Self {
        Self::default()
    }

    /// Whether commands of this stage are visible.
    pub fn allows(&self, stage: LifecycleStage) -> bool {
        match stage {
            LifecycleStage::Alpha => self.alpha,
            LifecycleStage::Beta => self.beta,
            LifecycleStage::Production => true,
        }
    }
}

/// Interpreter family of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    PowerShell,
    Posix,
}

/// Script or native executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Script(ScriptLanguage),
    Executable,
}

/// Recognised file forms in lookup order: scripts first, then executables.
///
/// `None` is an extensionless file with an execute bit (Unix only).
pub const FILE_FORMS: &[(Option<&str>, CommandKind)] = &[
    (Some("ps1"), CommandKind::Script(ScriptLanguage::PowerShell)),
    (Some("sh"), CommandKind::Script(ScriptLanguage::Posix)),
    (Some("exe"), CommandKind::Executable),
    (None, CommandKind::Executable),
];

/// Where a command lives relative to the `Commands` directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Directly inside `Commands`.
    Direct,
    /// Inside `Commands/<name>/`.
    Subfolder,
}

/// A file that resolves as a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommandFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Command name without lifecycle prefix or extension.
    pub name: String,
    pub kind: CommandKind,
    pub stage: LifecycleStage,
    pub location: Location,
    /// Index into [`FILE_FORMS`].
    #[serde(skip)]
    form: usize,
}

impl CommandFile {
    /// Interpret a file as a command, if its name allows it.
    ///
    /// Returns `None` for metadata sidecars, unknown extensions, and
    /// extensionless files that are not executable.
    pub fn from_path(path: &Path, location: Location) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (stage, stem, form) = parse_file_name(file_name)?;

        if FILE_FORMS[form].0.is_none() && !is_executable(path) {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            name: stem.to_string(),
            kind: FILE_FORMS[form].1,
            stage,
            location,
            form,
        })
    }

    /// Whether this is an interpreted script.
    pub fn is_script(&self) -> bool {
        matches!(self.kind, CommandKind::Script(_))
    }

    /// Directory holding the file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Sort key matching resolver precedence.
    pub fn precedence(&self) -> (LifecycleStage, Location, usize) {
        (self.stage, self.location, self.form)
    }
}

/// Parse `[alpha.|beta.]<name>[.<ext>]` into stage, name and form index.
pub fn parse_file_name(file_name: &str) -> Option<(LifecycleStage, &str, usize)> {
    if starts_with_ignore_case(file_name, METADATA_PREFIX) {
        return None;
    }

    let (stage, rest) = LifecycleStage::split(file_name);
    let (stem, form) = match rest.rsplit_once('.') {
        Some((stem, ext)) => {
            let form = FILE_FORMS.iter().position(|(candidate, _)| {
                candidate.is_some_and(|c| c.eq_ignore_ascii_case(ext))
            })?;
            (stem, form)
        }
        None => (rest, FILE_FORMS.len() - 1),
    };

    if stem.is_empty() || starts_with_ignore_case(stem, METADATA_PREFIX) {
        return None;
    }

    Some((stage, stem, form))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}
