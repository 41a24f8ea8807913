//! Configuration loading, saving, and validation for invoke.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and atomic saving in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use invoke::config::{load_config, save_config, InvokeConfig};
//! use invoke::stubs::Stub;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//!
//! let mut config = load_config(&path).unwrap();
//! assert!(config.stubs.is_empty());
//!
//! config.stubs.register(Stub::new("Demo", temp.path())).unwrap();
//! save_config(&config, &path).unwrap();
//!
//! let ctx = load_config(&path).unwrap().context();
//! assert!(ctx.registry.contains("Demo"));
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, resolve_config_path,
    save_config, CONFIG_ENV,
};
pub use schema::{InvokeConfig, CONFIG_VERSION};
pub use validator::{validate, validate_config, Severity, ValidationError};
