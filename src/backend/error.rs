//! Per-book error kinds.
//!
//! None of these abort a batch: the selector turns a primary failure into a
//! fallback attempt and a fallback failure into a failed outcome.

use std::path::PathBuf;

use thiserror::Error;

use crate::book::{AssetKind, BookId};
use crate::download::DownloadError;

/// Errors scoped to a single book and backend attempt.
#[derive(Debug, Error)]
pub enum BookError {
    /// The request itself failed (network, HTTP status, undecodable body).
    #[error("book {id}: {backend} request failed: {source}")]
    Transport {
        /// Book being resolved.
        id: BookId,
        /// Backend that was contacted.
        backend: &'static str,
        /// Underlying transport error.
        #[source]
        source: DownloadError,
    },

    /// The backend confirmed it does not know the book.
    #[error("book {id}: not found on {backend} backend")]
    NotFound {
        /// Book being resolved.
        id: BookId,
        /// Backend that answered.
        backend: &'static str,
    },

    /// Metadata parsed, but a required field was missing or empty.
    #[error("book {id}: incomplete metadata, missing {field}")]
    IncompleteMetadata {
        /// Book being resolved.
        id: BookId,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The required data file could not be downloaded.
    #[error("book {id}: {} download failed: {source}", .asset.as_str())]
    FatalAsset {
        /// Book being downloaded.
        id: BookId,
        /// Asset that failed.
        asset: AssetKind,
        /// Underlying transport error.
        #[source]
        source: DownloadError,
    },

    /// Writing a generated file failed.
    #[error("book {id}: cannot write {path}: {source}")]
    Io {
        /// Book being downloaded.
        id: BookId,
        /// File that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl BookError {
    /// Creates a `Transport` error.
    pub fn transport(id: BookId, backend: &'static str, source: DownloadError) -> Self {
        Self::Transport {
            id,
            backend,
            source,
        }
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(id: BookId, backend: &'static str) -> Self {
        Self::NotFound { id, backend }
    }

    /// Creates an `IncompleteMetadata` error.
    #[must_use]
    pub fn incomplete(id: BookId, field: &'static str) -> Self {
        Self::IncompleteMetadata { id, field }
    }

    /// Creates a `FatalAsset` error.
    pub fn fatal_asset(id: BookId, asset: AssetKind, source: DownloadError) -> Self {
        Self::FatalAsset { id, asset, source }
    }

    /// Creates an `Io` error.
    pub fn io(id: BookId, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            id,
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly kind label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::NotFound { .. } => "not_found",
            Self::IncompleteMetadata { .. } => "incomplete_metadata",
            Self::FatalAsset { .. } => "fatal_asset",
            Self::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id() -> BookId {
        BookId::new(5001).unwrap()
    }

    #[test]
    fn test_not_found_message_names_backend() {
        let err = BookError::not_found(id(), "secondary");
        let msg = err.to_string();
        assert!(msg.contains("5001"), "{msg}");
        assert!(msg.contains("secondary"), "{msg}");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_fatal_asset_message_names_asset() {
        let err = BookError::fatal_asset(
            id(),
            AssetKind::Data,
            DownloadError::http_status("http://host/x.kii", 503),
        );
        let msg = err.to_string();
        assert!(msg.contains("data download failed"), "{msg}");
        assert!(msg.contains("503"), "{msg}");
        assert_eq!(err.kind(), "fatal_asset");
    }

    #[test]
    fn test_incomplete_names_field() {
        let err = BookError::incomplete(id(), "publisherId");
        assert!(err.to_string().contains("publisherId"));
        assert_eq!(err.kind(), "incomplete_metadata");
    }
}
