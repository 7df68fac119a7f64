//! Configuration file.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/today/config.toml` by default. Command-line flags override
//! anything set here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use today_source::RuleConfig;

use crate::cli::ColorChoice;
use crate::error::{CliError, CliResult};

/// Configuration for the today command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodayConfig {
    /// Display settings.
    pub display: DisplaySettings,

    /// Calendar source settings.
    pub source: SourceSettings,

    /// Include, exclude and rewrite rules.
    pub rules: RuleConfig,
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Name of a registered style.
    pub style: Option<String>,

    /// Template pattern; cannot be combined with `style`.
    pub template: Option<String>,

    pub join_words: String,

    pub join_lines: String,

    pub color: ColorChoice,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            style: None,
            template: None,
            join_words: " ".to_string(),
            join_lines: "\n".to_string(),
            color: ColorChoice::Auto,
        }
    }
}

/// Calendar source settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Path or URL of the calendar.
    pub path: Option<String>,

    /// Cache directory for downloaded calendars.
    pub cache_dir: Option<PathBuf>,

    /// Cache expiry in humantime notation, e.g. "10m".
    pub cache_expiry: Option<String>,
}

impl SourceSettings {
    /// Parses `cache_expiry`, if set.
    pub fn cache_expiry(&self) -> CliResult<Option<Duration>> {
        self.cache_expiry
            .as_deref()
            .map(|text| {
                humantime::parse_duration(text)
                    .map_err(|e| CliError::Config(format!("invalid cache_expiry '{text}': {e}")))
            })
            .transpose()
    }
}

impl TodayConfig {
    /// Loads configuration from the default path, or defaults when it does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("today")
    }
}
