//! On-disk cache for remote calendars.
//!
//! A remote calendar is downloaded at most once per expiry period. The body
//! is stored as `<dir>/<name>.cached.ics` and its modification time decides
//! freshness.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use today_core::format_duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{SourceError, SourceResult};

/// Default time a downloaded calendar stays fresh.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(300);

const CACHE_SUFFIX: &str = ".cached.ics";

/// Cache location and expiry for remote calendars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCache {
    dir: PathBuf,
    expiry: Duration,
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(Self::default_dir(), DEFAULT_EXPIRY)
    }
}

impl SourceCache {
    /// Creates a cache. The directory is only created on first download.
    pub fn new(dir: impl Into<PathBuf>, expiry: Duration) -> Self {
        Self {
            dir: dir.into(),
            expiry,
        }
    }

    /// `<data-dir>/today/cache`, or a temp directory when the platform has no data dir.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("today")
            .join("cache")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// The file a calendar fetched from `url` is cached in.
    pub fn cache_path(&self, url: &Url) -> PathBuf {
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .or_else(|| url.host_str())
            .unwrap_or("calendar");
        self.dir.join(format!("{name}{CACHE_SUFFIX}"))
    }

    /// Time left before the file at `path` expires, if it exists and is fresh.
    pub fn remaining(&self, path: &Path, now: SystemTime) -> Option<Duration> {
        let modified = std::fs::metadata(path).ok()?.modified().ok()?;
        let expires = modified.checked_add(self.expiry)?;
        expires.duration_since(now).ok().filter(|left| !left.is_zero())
    }

    /// Whether the file at `path` exists and has not expired at `now`.
    pub fn is_fresh(&self, path: &Path, now: SystemTime) -> bool {
        self.remaining(path, now).is_some()
    }

    /// Creates the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Fails when the path exists but is not a directory, or cannot be created.
    pub fn ensure_dir(&self) -> SourceResult<()> {
        match std::fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SourceError::CacheNotDirectory {
                path: self.dir.clone(),
            }),
            Err(_) => {
                info!(dir = %self.dir.display(), "Creating cache directory");
                std::fs::create_dir_all(&self.dir).map_err(|e| SourceError::io(&self.dir, e))
            }
        }
    }

    /// Returns the calendar at `url`, downloading it when the cached copy is
    /// missing or expired.
    pub async fn load_or_fetch(&self, url: &Url) -> SourceResult<String> {
        self.ensure_dir()?;
        let path = self.cache_path(url);

        if let Some(left) = self.remaining(&path, SystemTime::now()) {
            let expires_in = chrono::Duration::from_std(left)
                .map(format_duration)
                .unwrap_or_default();
            debug!(
                path = %path.display(),
                %expires_in,
                "Using cached calendar"
            );
            return tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| SourceError::io(&path, e));
        }

        debug!(path = %path.display(), "Cache missing or expired");
        let body = fetch(url).await?;
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| SourceError::io(&path, e))?;
        Ok(body)
    }
}

async fn fetch(url: &Url) -> SourceResult<String> {
    let http_error = |source: reqwest::Error| SourceError::Http {
        url: url.to_string(),
        source,
    };

    info!(%url, "Fetching calendar");
    let client = reqwest::Client::builder()
        .user_agent(concat!("today/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(http_error)?;

    let response = client.get(url.clone()).send().await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(http_error)?;
    debug!(bytes = body.len(), "Downloaded calendar");
    Ok(body)
}
