//! CLI error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use today_core::{ConfigError, FormatError, TracingError};
use today_source::SourceError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a `today` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Neither `--path` nor `[source] path` was given.
    #[error("you need to specify a path or URL of the iCal file (--path or ICAL_PATH)")]
    MissingSource,

    /// Style selection or template compilation failed.
    #[error(transparent)]
    Style(#[from] ConfigError),

    /// Rendering an event failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Reading, fetching or parsing the calendar failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Writing the output failed.
    #[error("cannot write to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub fn write(target: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            target: target.into(),
            source,
        }
    }
}
