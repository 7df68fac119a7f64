//! Source error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while acquiring or parsing a calendar.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading or writing a local file failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache path exists but is not a directory.
    #[error("cache must be a directory: {}", path.display())]
    CacheNotDirectory { path: PathBuf },

    /// The source URL uses a scheme other than http, https or file.
    #[error("source protocol not supported: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// The HTTP request failed before a response arrived.
    #[error("cannot fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("expected status code 200-299 but got {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// The calendar text is not valid iCalendar.
    #[error("cannot parse calendar: {message}")]
    Parse { message: String },

    /// A window bound does not match the expected layout.
    #[error("invalid time '{text}', expected dd.mm.yyyy HH:MM:SS")]
    InvalidTime { text: String },

    /// A recurring event carries a rule that cannot be expanded.
    #[error("cannot expand recurrence of '{summary}': {message}")]
    Recurrence { summary: String, message: String },

    /// A rule pattern failed to compile.
    #[error("invalid rule pattern '{pattern}': {source}")]
    Rule {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl SourceError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
