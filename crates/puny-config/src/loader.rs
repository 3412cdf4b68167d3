//! Configuration Loader
//!
//! Finds `puny.toml` and applies environment overrides on top of it.

use crate::project::{validate_dialect, ColorSetting, DiagnosticFormat, ProjectConfig};
use crate::ConfigResult;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "puny.toml";

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Project config (puny.toml)
/// 2. Environment variables (PUNY_*)
/// 3. CLI flags (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader {
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub project: ProjectConfig,

    /// Directory where puny.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `PUNY_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find puny.toml. A missing file is not an
    /// error; defaults are used instead.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config {
            project,
            project_root,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config {
            project,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// PUNY_DIALECT replaces `run.dialect`; PUNY_DIAGNOSTICS replaces `diagnostics.format`
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if self.ignore_env {
            return Ok(config);
        }

        if let Ok(dialect) = env::var("PUNY_DIALECT") {
            let dialect = dialect.trim().to_lowercase();
            if !dialect.is_empty() {
                validate_dialect("PUNY_DIALECT", &dialect)?;
                config.run.dialect = Some(dialect);
            }
        }

        if let Ok(format) = env::var("PUNY_DIAGNOSTICS") {
            config.diagnostics.format = Some(DiagnosticFormat::from_env_value(&format));
        }

        Ok(config)
    }
}

impl Config {
    /// Configured dialect name, if any
    pub fn dialect(&self) -> Option<&str> {
        self.project.dialect()
    }

    /// Effective diagnostic format (default: human)
    pub fn diagnostic_format(&self) -> DiagnosticFormat {
        self.project.diagnostics.format.unwrap_or_default()
    }

    /// Effective color setting (default: auto)
    pub fn color(&self) -> ColorSetting {
        self.project.diagnostics.color.unwrap_or_default()
    }

    /// Directory of the puny.toml in effect, if one was found
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}
