//! Sequential batch processing of book ids.
//!
//! Ids are processed in ascending order, one at a time. A failing book never
//! stops the batch. When the ids came from the device's pending queue and
//! every book succeeded, the queue file is truncated.

mod error;
mod pending;

pub use error::RunError;
pub use pending::{ParsedQueue, PendingQueue, parse_pending};

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::book::BookId;
use crate::selector::{BackendSelector, DownloadOutcome};

/// Where the ids of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrigin {
    /// Supplied on the command line; the queue file is never touched.
    Explicit,
    /// Read from the pending queue, which is cleared on full success.
    PendingQueue(PendingQueue),
}

/// Result of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Books now on disk (including ones that already were).
    pub succeeded: usize,
    /// Books no backend could deliver.
    pub failed: usize,
    /// Per-book outcomes in processing order.
    pub outcomes: Vec<(BookId, DownloadOutcome)>,
    /// Whether the pending queue file was truncated.
    pub queue_cleared: bool,
}

impl BatchSummary {
    /// Total books processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    fn record(&mut self, id: BookId, outcome: DownloadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push((id, outcome));
    }

    /// Whether a queue-driven run may clear the queue.
    #[must_use]
    pub fn fully_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded > 0
    }
}

/// Drives the selector over a set of ids.
#[derive(Debug)]
pub struct BatchRunner {
    selector: BackendSelector,
}

impl BatchRunner {
    /// Creates a runner around `selector`.
    #[must_use]
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Runs the batch without per-book notifications.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub async fn run(
        &self,
        ids: impl IntoIterator<Item = BookId>,
        origin: &IdOrigin,
    ) -> Result<BatchSummary, RunError> {
        self.run_with(ids, origin, |_, _, _| {}).await
    }

    /// Runs the batch, calling `on_book(position, id, outcome)` after each
    /// book. `position` is 1-based.
    ///
    /// # Errors
    ///
    /// [`RunError::Queue`] if the pending queue should be cleared but cannot
    /// be. Per-book failures are never errors.
    pub async fn run_with<F>(
        &self,
        ids: impl IntoIterator<Item = BookId>,
        origin: &IdOrigin,
        mut on_book: F,
    ) -> Result<BatchSummary, RunError>
    where
        F: FnMut(usize, BookId, &DownloadOutcome),
    {
        let ids: BTreeSet<BookId> = ids.into_iter().collect();
        info!(count = ids.len(), "starting batch");

        let mut summary = BatchSummary::default();
        for (index, id) in ids.into_iter().enumerate() {
            let outcome = self.selector.select(id).await;
            on_book(index + 1, id, &outcome);
            summary.record(id, outcome);
        }

        if let IdOrigin::PendingQueue(queue) = origin {
            if summary.fully_succeeded() {
                queue.clear().await?;
                summary.queue_cleared = true;
            } else {
                debug!(
                    failed = summary.failed,
                    succeeded = summary.succeeded,
                    "leaving pending queue untouched"
                );
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        Ok(summary)
    }
}
