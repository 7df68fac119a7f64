//! Where a calendar comes from.

use std::fmt;
use std::path::PathBuf;

use today_core::CalendarInput;
use tracing::debug;
use url::Url;

use crate::cache::SourceCache;
use crate::error::{SourceError, SourceResult};
use crate::ics::parse_calendar;
use crate::window::SelectionWindow;

/// A local ICS file or a remote ICS URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarSource {
    File(PathBuf),
    Remote(Url),
}

impl CalendarSource {
    /// Interprets `input` as a URL when it has a scheme, otherwise as a path.
    ///
    /// # Errors
    ///
    /// Fails for URL schemes other than `http`, `https` and `file`.
    pub fn parse(input: &str) -> SourceResult<Self> {
        let Ok(url) = Url::parse(input) else {
            return Ok(Self::File(PathBuf::from(input)));
        };

        match url.scheme() {
            "http" | "https" => Ok(Self::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| SourceError::parse(format!("invalid file URL: {input}"))),
            scheme => Err(SourceError::UnsupportedScheme {
                scheme: scheme.to_string(),
            }),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Reads the raw calendar text. Remote sources go through `cache`.
    pub async fn read(&self, cache: &SourceCache) -> SourceResult<String> {
        match self {
            Self::File(path) => {
                debug!(path = %path.display(), "Reading calendar file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| SourceError::io(path, e))
            }
            Self::Remote(url) => cache.load_or_fetch(url).await,
        }
    }

    /// Reads and parses the calendar, expanding recurring events around `window`.
    pub async fn load(
        &self,
        cache: &SourceCache,
        window: &SelectionWindow,
    ) -> SourceResult<CalendarInput> {
        let text = self.read(cache).await?;
        let events = parse_calendar(&text, window)?;
        Ok(CalendarInput::new(text, events))
    }
}

impl fmt::Display for CalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}
