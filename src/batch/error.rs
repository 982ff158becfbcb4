//! Run-level errors. Any of these stops the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent a run from starting or finishing its bookkeeping.
#[derive(Debug, Error)]
pub enum RunError {
    /// The device root does not exist or is not a directory.
    #[error("device root {path} not found\n  Suggestion: pass --root with the mounted pen directory")]
    MissingRoot {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The device root has no `book/` directory.
    #[error("book directory {path} not found\n  Suggestion: check that --root points at the pen itself")]
    MissingBookDir {
        /// Path that was checked.
        path: PathBuf,
    },

    /// Reading or truncating the pending queue file failed.
    #[error("pending queue {path}: {source}")]
    Queue {
        /// Queue file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Creates a `MissingRoot` error.
    pub fn missing_root(path: impl Into<PathBuf>) -> Self {
        Self::MissingRoot { path: path.into() }
    }

    /// Creates a `MissingBookDir` error.
    pub fn missing_book_dir(path: impl Into<PathBuf>) -> Self {
        Self::MissingBookDir { path: path.into() }
    }

    /// Creates a `Queue` error.
    pub fn queue(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Queue {
            path: path.into(),
            source,
        }
    }
}
