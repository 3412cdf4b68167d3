//! Project Configuration (puny.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dialect names accepted in `[run] dialect`
pub const DIALECT_NAMES: &[&str] = &["funcs", "basic"];

/// Project configuration from puny.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// How programs are run
    #[serde(default)]
    pub run: RunConfig,

    /// How diagnostics are reported
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// `[run]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Dialect used when the command line names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
}

/// `[diagnostics]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DiagnosticFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSetting>,
}

/// Diagnostic output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    #[default]
    Human,
    Json,
}

impl DiagnosticFormat {
    /// Parse an environment value; anything but `json` means human output
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Color choice for human diagnostics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    #[default]
    Auto,
    Always,
    Never,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(dialect) = &self.run.dialect {
            validate_dialect("run.dialect", dialect)?;
        }
        Ok(())
    }

    /// Configured dialect name, if any
    pub fn dialect(&self) -> Option<&str> {
        self.run.dialect.as_deref()
    }
}

pub(crate) fn validate_dialect(field: &str, dialect: &str) -> ConfigResult<()> {
    if DIALECT_NAMES.contains(&dialect) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "unknown dialect '{}', expected one of: {}",
                dialect,
                DIALECT_NAMES.join(", ")
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: ProjectConfig = toml::from_str(
            r#"
[run]
dialect = "basic"

[diagnostics]
format = "json"
color = "never"
"#,
        )
        .unwrap();
        assert_eq!(config.dialect(), Some("basic"));
        assert_eq!(config.diagnostics.format, Some(DiagnosticFormat::Json));
        assert_eq!(config.diagnostics.color, Some(ColorSetting::Never));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_unknown_dialect_fails_validation() {
        let config: ProjectConfig = toml::from_str("[run]\ndialect = \"cobol\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "run.dialect"
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(toml::from_str::<ProjectConfig>("[run]\nspeed = 3\n").is_err());
    }

    #[test]
    fn test_format_env_value() {
        assert_eq!(DiagnosticFormat::from_env_value("JSON"), DiagnosticFormat::Json);
        assert_eq!(DiagnosticFormat::from_env_value("text"), DiagnosticFormat::Human);
    }
}
