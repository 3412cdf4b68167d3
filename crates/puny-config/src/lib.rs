//! Puny Configuration
//!
//! Project configuration stored in `puny.toml`, plus environment overrides.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Project config (`puny.toml`, found by walking up from a directory)
//! 2. Environment variables (`PUNY_DIALECT`, `PUNY_DIAGNOSTICS`)
//! 3. CLI flags (handled by the caller)
//!
//! # Example
//!
//! ```no_run
//! use puny_config::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new().load_from_directory(Path::new(".")).unwrap();
//! println!("{:?}", config.dialect());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
pub use project::{ColorSetting, DiagnosticFormat, DiagnosticsConfig, ProjectConfig, RunConfig};
