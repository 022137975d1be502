//! Error types for the crawler.
//!
//! Two families of failure exist and they are handled very differently:
//!
//! - [`FetchError`]: a single page could not be retrieved. The crawl driver
//!   logs it and moves on to the next URL in the frontier.
//! - [`CrawlError`]: setup or persistence failed (bad seed URL, unwritable
//!   output, broken CSV). These abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve one page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// DNS resolution or TCP/TLS connection failed.
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Any other transport-level failure, including body decoding.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Local-mode read or snapshot failure.
    #[error("local file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Sort a `reqwest` error into the network-kind variants.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else if err.is_connect() {
            FetchError::Connect(err)
        } else {
            FetchError::Request(err)
        }
    }
}

/// Fatal errors: anything that stops the run as a whole.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL {url}: {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL {0} has no host")]
    MissingHost(String),

    #[error("invalid site pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://techcrunch.com/2023/01/01/x/".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 for https://techcrunch.com/2023/01/01/x/"
        );
    }

    #[test]
    fn test_missing_host_message() {
        let err = CrawlError::MissingHost("data:text/plain,hi".to_string());
        assert!(err.to_string().contains("has no host"));
    }
}
