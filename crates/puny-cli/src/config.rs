//! CLI configuration via environment variables
//!
//! Settings that only concern the terminal front end. Project settings
//! (dialect, diagnostic format) live in `puny-config`.

use std::env;
use std::path::PathBuf;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Disable colored output (NO_COLOR)
    pub no_color: bool,
    /// Custom history file path (PUNY_HISTORY_FILE=/path/to/file)
    pub history_file: Option<PathBuf>,
    /// Disable history by default (PUNY_NO_HISTORY=1)
    pub no_history: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            no_color: lookup("NO_COLOR").is_some(),
            history_file: lookup("PUNY_HISTORY_FILE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            no_history: lookup("PUNY_NO_HISTORY").is_some_and(|v| is_truthy(&v)),
        }
    }

    /// Get the history file path
    ///
    /// Returns PUNY_HISTORY_FILE if set, else `~/.puny/history` when a home
    /// directory exists.
    pub fn get_history_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.history_file {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(".puny").join("history"))
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}
