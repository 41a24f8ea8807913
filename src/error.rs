//! Error types for invoke operations.
//!
//! This module defines [`InvokeError`], the primary error type used throughout
//! the engine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration and resolution problems (`StubNotFound`, `CommandNotFound`)
//!   are warning-level: completion paths swallow them, interactive paths report them
//! - Invocation problems (`CommandFailed`, `LaunchFailed`) carry the short command
//!   name so the top level can report them
//! - Use `anyhow::Error` (via `InvokeError::Other`) at collaborator seams such as git

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for invoke operations.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No stub is registered under this name.
    #[error("Stub '{stub}' is not registered")]
    StubNotFound { stub: String },

    /// The stub exists but does not expose this command.
    #[error("Command '{command}' not found in stub '{stub}'")]
    CommandNotFound { stub: String, command: String },

    /// The name collides with a reserved verb.
    #[error("'{name}' is a reserved verb and cannot be used as a stub name")]
    ReservedStubName { name: String },

    /// A stub with this name is already registered.
    #[error("Stub '{name}' is already registered")]
    DuplicateStub { name: String },

    /// The user supplied arguments the verb cannot work with.
    #[error("Usage: {message}")]
    Usage { message: String },

    /// The child process ran and exited unsuccessfully.
    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// The child process could not be started.
    #[error("Failed to launch '{command}': {message}")]
    LaunchFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InvokeError {
    /// Whether this error is a configuration or resolution miss.
    ///
    /// These are the errors that completion silently degrades on.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StubNotFound { .. } | Self::CommandNotFound { .. }
        )
    }

    /// Process exit code the CLI should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::Usage { .. }
            | Self::StubNotFound { .. }
            | Self::CommandNotFound { .. }
            | Self::ReservedStubName { .. }
            | Self::DuplicateStub { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for invoke operations.
pub type Result<T> = std::result::Result<T, InvokeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = InvokeError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn stub_not_found_displays_name() {
        let err = InvokeError::StubNotFound {
            stub: "Demo".into(),
        };
        assert!(err.to_string().contains("Demo"));
        assert!(err.is_not_found());
    }

    #[test]
    fn command_not_found_displays_stub_and_command() {
        let err = InvokeError::CommandNotFound {
            stub: "Demo".into(),
            command: "deploy".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Demo"));
        assert!(msg.contains("deploy"));
        assert!(err.is_not_found());
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = InvokeError::CommandFailed {
            command: "deploy".into(),
            code: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("deploy"));
        assert!(msg.contains('3'));
        assert_eq!(err.exit_code(), 3);
        assert!(!err.is_not_found());
    }

    #[test]
    fn usage_errors_exit_with_two() {
        let err = InvokeError::Usage {
            message: "search requires a query".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reserved_name_displays_name() {
        let err = InvokeError::ReservedStubName {
            name: "search".into(),
        };
        assert!(err.to_string().contains("search"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: InvokeError = io_err.into();
        assert!(matches!(err, InvokeError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(InvokeError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
