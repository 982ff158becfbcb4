//! The device's pending-download queue file.
//!
//! One id per line. The device writes stray `\r` and NUL bytes; both are
//! stripped before validation. Lines that are not 1-5 digit numbers are
//! skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::book::BookId;

use super::error::RunError;

static QUEUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9]{1,5}$").expect("queue line pattern is valid")
});

/// Ids read from a queue file plus the lines that were rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQueue {
    /// Valid ids, ascending and deduplicated.
    pub ids: BTreeSet<BookId>,
    /// Non-blank lines that were not valid ids.
    pub skipped: Vec<String>,
}

/// Parses queue file contents.
#[must_use]
pub fn parse_pending(raw: &str) -> ParsedQueue {
    let mut parsed = ParsedQueue::default();
    for line in raw.lines() {
        let cleaned: String = line.chars().filter(|c| *c != '\r' && *c != '\0').collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }
        let id = QUEUE_LINE
            .is_match(cleaned)
            .then(|| cleaned.parse::<BookId>().ok())
            .flatten();
        match id {
            Some(id) => {
                parsed.ids.insert(id);
            }
            None => parsed.skipped.push(cleaned.to_string()),
        }
    }
    parsed
}

/// Handle to the queue file on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQueue {
    path: PathBuf,
}

impl PendingQueue {
    /// Wraps the queue file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the queue file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the queue. A missing file is an empty queue.
    ///
    /// # Errors
    ///
    /// [`RunError::Queue`] when the file exists but cannot be read.
    pub async fn load(&self) -> Result<ParsedQueue, RunError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no pending queue file");
                return Ok(ParsedQueue::default());
            }
            Err(error) => return Err(RunError::queue(&self.path, error)),
        };
        let parsed = parse_pending(&String::from_utf8_lossy(&bytes));
        for line in &parsed.skipped {
            warn!(line = %line, "skipping invalid pending queue entry");
        }
        debug!(count = parsed.ids.len(), "pending queue loaded");
        Ok(parsed)
    }

    /// Truncates the queue file to zero bytes. Does not create it.
    ///
    /// # Errors
    ///
    /// [`RunError::Queue`] when the file cannot be opened for writing.
    pub async fn clear(&self) -> Result<(), RunError> {
        match tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .await
        {
            Ok(_) => {
                info!(path = %self.path.display(), "pending queue cleared");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(RunError::queue(&self.path, error)),
        }
    }
}
