//! CLI output formatting.
//!
//! Everything here is pure: the caller decides where lines go.

use pen_downloader_core::{BatchSummary, BookId, DownloadOutcome};

/// Message when neither ids nor queue entries were found.
pub const NOTHING_TO_DO: &str = "Nothing to download: no ids given and the pending queue is empty.";

/// One progress line per processed book.
#[must_use]
pub fn format_book_line(
    position: usize,
    total: usize,
    id: BookId,
    outcome: &DownloadOutcome,
) -> String {
    let width = total.to_string().len();
    match outcome {
        DownloadOutcome::Success(source) => format!(
            "[{position:>width$}/{total}] {} ok ({})",
            id.file_id(),
            source.as_str()
        ),
        DownloadOutcome::Failure(error) => format!(
            "[{position:>width$}/{total}] {} FAILED {}: {error}",
            id.file_id(),
            error.kind()
        ),
    }
}

/// Final summary block.
#[must_use]
pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = format!(
        "Done: {} succeeded, {} failed, {} total",
        summary.succeeded,
        summary.failed,
        summary.total()
    );
    if summary.queue_cleared {
        out.push_str("\nPending queue cleared.");
    }
    let failed: Vec<String> = summary
        .outcomes
        .iter()
        .filter(|(_, outcome)| !outcome.is_success())
        .map(|(id, _)| id.to_string())
        .collect();
    if !failed.is_empty() {
        out.push_str("\nFailed ids: ");
        out.push_str(&failed.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pen_downloader_core::{BookError, Source};

    fn id(value: u32) -> BookId {
        BookId::new(value).unwrap()
    }

    #[test]
    fn test_book_line_success() {
        let line = format_book_line(2, 12, id(9550), &DownloadOutcome::Success(Source::Primary));
        assert_eq!(line, "[ 2/12] 09550 ok (primary)");
    }

    #[test]
    fn test_book_line_failure_names_kind() {
        let outcome = DownloadOutcome::Failure(BookError::not_found(id(99_999), "secondary"));
        let line = format_book_line(1, 1, id(99_999), &outcome);
        assert!(line.starts_with("[1/1] 99999 FAILED "), "{line}");
        assert!(line.contains("not found"), "{line}");
    }

    #[test]
    fn test_summary_lists_failures_and_queue_state() {
        let summary = BatchSummary {
            succeeded: 1,
            failed: 1,
            outcomes: vec![
                (id(5001), DownloadOutcome::Success(Source::Secondary)),
                (
                    id(99_999),
                    DownloadOutcome::Failure(BookError::not_found(id(99_999), "secondary")),
                ),
            ],
            queue_cleared: false,
        };
        assert_eq!(
            format_summary(&summary),
            "Done: 1 succeeded, 1 failed, 2 total\nFailed ids: 99999"
        );
    }

    #[test]
    fn test_summary_reports_cleared_queue() {
        let summary = BatchSummary {
            succeeded: 1,
            failed: 0,
            outcomes: vec![(id(42), DownloadOutcome::Success(Source::Existing))],
            queue_cleared: true,
        };
        assert_eq!(
            format_summary(&summary),
            "Done: 1 succeeded, 0 failed, 1 total\nPending queue cleared."
        );
    }
}
