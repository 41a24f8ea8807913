//! Configuration validation rules.
//!
//! - The schema version must be one this build understands
//! - Stub names and paths must be non-empty
//! - Stubs named after reserved verbs are reported; they can never be reached

use crate::config::schema::{InvokeConfig, CONFIG_VERSION};
use crate::error::{InvokeError, Result};
use crate::stubs::is_reserved;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be used.
    Error,
    /// The configuration works but something in it is unreachable.
    Warning,
}

/// Validation finding with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Stub name if the finding is stub-specific
    pub stub: Option<String>,
    pub severity: Severity,
}

/// Validate a configuration and return every finding.
pub fn validate_config(config: &InvokeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != CONFIG_VERSION {
        errors.push(ValidationError {
            rule: "unsupported-version".to_string(),
            message: format!(
                "Config version {} is not supported (expected {})",
                config.version, CONFIG_VERSION
            ),
            stub: None,
            severity: Severity::Error,
        });
    }

    for stub in config.stubs.iter() {
        if stub.name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "empty-stub-name".to_string(),
                message: "Stub names cannot be empty".to_string(),
                stub: None,
                severity: Severity::Error,
            });
        }
        if stub.root.as_os_str().is_empty() {
            errors.push(ValidationError {
                rule: "empty-stub-path".to_string(),
                message: format!("Stub '{}' has an empty path", stub.name),
                stub: Some(stub.name.clone()),
                severity: Severity::Error,
            });
        }
        if is_reserved(&stub.name) {
            errors.push(ValidationError {
                rule: "reserved-stub-name".to_string(),
                message: format!(
                    "Stub '{}' is shadowed by the reserved verb of the same name",
                    stub.name
                ),
                stub: Some(stub.name.clone()),
                severity: Severity::Warning,
            });
        }
    }

    errors
}

/// Validate and return Result (for convenience). Warnings do not fail.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any error-level rule fails.
pub fn validate(config: &InvokeConfig) -> Result<()> {
    let messages: Vec<_> = validate_config(config)
        .into_iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| e.message)
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(InvokeError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::Stub;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&InvokeConfig::default()).is_empty());
    }

    #[test]
    fn rejects_unknown_version() {
        let config = InvokeConfig {
            version: 7,
            ..Default::default()
        };
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "unsupported-version"));
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_empty_path() {
        let mut config = InvokeConfig::default();
        config.stubs.register(Stub::new("Demo", "")).unwrap();
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "empty-stub-path"));
    }

    #[test]
    fn reserved_name_is_only_a_warning() {
        let mut config = InvokeConfig::default();
        config.stubs.insert_unchecked(Stub::new("search", "/srv/search"));

        let errors = validate_config(&config);
        let finding = errors
            .iter()
            .find(|e| e.rule == "reserved-stub-name")
            .unwrap();
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.stub.as_deref(), Some("search"));
        assert!(validate(&config).is_ok());
    }
}
