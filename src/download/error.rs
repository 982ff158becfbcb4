//! Error types for the download module.
//!
//! Every variant carries the URL or path it concerns so a per-book failure
//! line can explain itself without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single GET against either backend or the streaming host.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request never produced a response.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error from reqwest.
        #[source]
        source: reqwest::Error,
    },

    /// Connect or read timeout elapsed.
    #[error("timeout fetching {url}")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// Any non-2xx answer.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },

    /// Response body was not the JSON document we expected.
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Error from serde_json.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the target file failed.
    #[error("cannot write {path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        /// Error from the filesystem.
        #[source]
        source: std::io::Error,
    },

    /// The URL could not be parsed, usually a bad configured base.
    #[error("malformed URL {url}")]
    InvalidUrl {
        /// Rejected input.
        url: String,
    },
}

impl DownloadError {
    /// Maps a reqwest error, promoting timeouts to [`DownloadError::Timeout`].
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// [`DownloadError::HttpStatus`] for `url`.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// [`DownloadError::Decode`] for `url`.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// [`DownloadError::Timeout`] for `url`.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// [`DownloadError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// [`DownloadError::InvalidUrl`].
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Status code, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs a
// url or path the source error does not carry.
