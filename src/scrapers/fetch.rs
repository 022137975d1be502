//! Page retrieval.
//!
//! The crawl driver only talks to the [`Fetch`] trait, so the network can be
//! swapped for a fixture file or wrapped to capture what was fetched:
//!
//! - [`HttpFetcher`]: `reqwest` client with a request timeout
//! - [`LocalFetcher`]: always returns the contents of one local file
//! - [`SnapshotFetcher`]: decorator that writes each fetched page to a file

use crate::error::{CrawlError, FetchError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Retrieve the raw markup behind a URL.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Serves every URL from a single local file. Used for offline runs.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    path: PathBuf,
}

impl LocalFetcher {
    /// Serve the contents of `path` for every URL.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetch for LocalFetcher {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Wraps another fetcher and writes every page it returns to `path`,
/// overwriting the previous one.
///
/// A failed write is logged and the page is still returned.
pub struct SnapshotFetcher<F> {
    inner: F,
    path: PathBuf,
}

impl<F> SnapshotFetcher<F> {
    /// Wrap `inner`, capturing each fetched page to `path`.
    pub fn new(inner: F, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    /// File the latest page is written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: fmt::Debug> fmt::Debug for SnapshotFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotFetcher")
            .field("inner", &self.inner)
            .field("path", &self.path)
            .finish()
    }
}

impl<F: Fetch> Fetch for SnapshotFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let body = self.inner.fetch(url).await?;
        if let Err(e) = fs::write(&self.path, &body).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write page snapshot");
        }
        Ok(body)
    }
}
