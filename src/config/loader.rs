//! Configuration file discovery, loading and saving.
//!
//! The config lives at `~/.invoke/config.yml` unless `--config` or
//! `INVOKE_CONFIG` points elsewhere. A missing file is not an error: it
//! means no stubs are registered yet.

use crate::config::schema::InvokeConfig;
use crate::config::validator::{validate, validate_config, Severity};
use crate::error::{InvokeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "INVOKE_CONFIG";

/// Default config location: `~/.invoke/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".invoke").join("config.yml"))
}

/// Pick the config path: explicit override first, then the default.
///
/// # Errors
///
/// Returns `ConfigValidationError` when no override is given and the home
/// directory cannot be determined.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().ok_or_else(|| InvokeError::ConfigValidationError {
            message: format!(
                "cannot determine home directory; set {} or pass --config",
                CONFIG_ENV
            ),
        }),
    }
}

/// Load the config at `path`, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<InvokeConfig> {
    match load_config_file(path) {
        Err(InvokeError::ConfigNotFound { .. }) => {
            debug!("No config at {}, using defaults", path.display());
            Ok(InvokeConfig::default())
        }
        other => other,
    }
}

/// Load a single config file and parse it into InvokeConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<InvokeConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InvokeError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InvokeError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into InvokeConfig.
///
/// Relative stub paths are resolved against the directory holding the
/// config file. Validation warnings are logged; errors fail the parse.
pub fn parse_config(content: &str, source_path: &Path) -> Result<InvokeConfig> {
    let mut config: InvokeConfig = if content.trim().is_empty() {
        InvokeConfig::default()
    } else {
        serde_yaml::from_str(content).map_err(|e| InvokeError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if let Some(base) = source_path.parent() {
        for stub in config.stubs.iter_mut() {
            if stub.root.is_relative() && !stub.root.as_os_str().is_empty() {
                stub.root = base.join(&stub.root);
            }
        }
    }

    for finding in validate_config(&config) {
        if finding.severity == Severity::Warning {
            warn!("{}", finding.message);
        }
    }
    validate(&config)?;

    Ok(config)
}

/// Save the config using an atomic write.
///
/// Writes to a temp file next to the target and renames it into place, so
/// the config is never left half-written.
pub fn save_config(config: &InvokeConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let content =
        serde_yaml::to_string(config).map_err(|e| InvokeError::ConfigValidationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

    let temp_path = path.with_extension("yml.tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;
    debug!("Saved config to {}", path.display());

    Ok(())
}
