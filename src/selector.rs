//! Per-book backend selection.
//!
//! ```text
//! CheckExists -> Try(primary) -> Done(Success)
//!                     |
//!                     v
//!              Try(secondary) -> Done(Success) | Done(Failure)
//! ```
//!
//! Backends are tried in registration order. The first success ends the
//! book; after the last backend fails the book is a failure.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::backend::{Backend, BookError, Source};
use crate::book::{AssetSet, BookId};

/// Result of processing one book.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// All required files are on disk.
    Success(Source),
    /// Every backend failed; carries the last backend's error.
    Failure(BookError),
}

impl DownloadOutcome {
    /// Whether the book ended up on disk.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The serving source on success.
    #[must_use]
    pub fn source(&self) -> Option<Source> {
        match self {
            Self::Success(source) => Some(*source),
            Self::Failure(_) => None,
        }
    }
}

#[derive(Debug)]
enum State {
    CheckExists,
    Try(usize),
    Done(DownloadOutcome),
}

/// Chooses which backend serves each book.
pub struct BackendSelector {
    backends: Vec<Box<dyn Backend>>,
    book_dir: PathBuf,
    area: String,
}

impl std::fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("BackendSelector")
            .field("backends", &names)
            .field("book_dir", &self.book_dir)
            .field("area", &self.area)
            .finish()
    }
}

impl BackendSelector {
    /// Creates a selector with no backends writing into `book_dir`.
    #[must_use]
    pub fn new(book_dir: impl Into<PathBuf>, area: impl Into<String>) -> Self {
        Self {
            backends: Vec::new(),
            book_dir: book_dir.into(),
            area: area.into(),
        }
    }

    /// Appends a backend; earlier registrations are tried first.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        debug!(backend = backend.name(), "registered backend");
        self.backends.push(backend);
    }

    /// Output paths for `id`.
    #[must_use]
    pub fn assets_for(&self, id: BookId) -> AssetSet {
        AssetSet::new(&self.book_dir, id, &self.area)
    }

    /// Runs the selection state machine for one book.
    pub async fn select(&self, id: BookId) -> DownloadOutcome {
        let assets = self.assets_for(id);
        let mut last_error: Option<BookError> = None;
        let mut state = State::CheckExists;

        loop {
            state = match state {
                State::CheckExists => {
                    if assets.is_complete() {
                        debug!(%id, "data file present, skipping");
                        State::Done(DownloadOutcome::Success(Source::Existing))
                    } else {
                        State::Try(0)
                    }
                }
                State::Try(index) => match self.backends.get(index) {
                    Some(backend) => {
                        debug!(%id, backend = backend.name(), "trying backend");
                        match backend.fetch(id, &assets).await {
                            Ok(report) => State::Done(DownloadOutcome::Success(report.source)),
                            Err(error) => {
                                warn!(
                                    %id,
                                    backend = backend.name(),
                                    kind = error.kind(),
                                    error = %error,
                                    "backend failed"
                                );
                                last_error = Some(error);
                                State::Try(index + 1)
                            }
                        }
                    }
                    None => {
                        let error =
                            last_error.take().unwrap_or_else(|| BookError::not_found(id, "none"));
                        State::Done(DownloadOutcome::Failure(error))
                    }
                },
                State::Done(outcome) => {
                    debug!(%id, success = outcome.is_success(), "selection finished");
                    return outcome;
                }
            };
        }
    }
}
