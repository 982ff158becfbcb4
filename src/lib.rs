//! Pen Downloader Core Library
//!
//! Downloads book files for a reading-pen device. Each book is looked up on
//! the primary REST API and, if that fails, on the legacy archive server.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`book`] - Book ids, metadata and on-device file naming
//! - [`download`] - HTTP transport with streaming downloads
//! - [`backend`] - Primary and secondary backends, metadata resolution, asset fetch
//! - [`selector`] - Per-book fallback between backends
//! - [`batch`] - Ordered batch runs and pending-queue handling
//! - [`device`] - Mounted device layout

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod batch;
pub mod book;
pub mod device;
pub mod download;
pub mod selector;
mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use backend::{
    AssetFetcher, Backend, BookError, Endpoints, MetadataResolver, PrimaryBackend,
    SecondaryBackend, Source, VersionSource,
};
pub use batch::{BatchRunner, BatchSummary, IdOrigin, PendingQueue, RunError};
pub use book::{AssetKind, AssetSet, BookId, BookIdError, BookMetadata};
pub use device::DeviceRoot;
pub use download::{DownloadError, HttpClient, ProgressMode};
pub use selector::{BackendSelector, DownloadOutcome};

use std::path::PathBuf;

/// Builds the selector used by the CLI: primary first, then secondary.
///
/// Both backends share `client`. The version map cache lives in the
/// returned selector, so build one per run.
#[must_use]
pub fn build_default_selector(
    client: &HttpClient,
    endpoints: &Endpoints,
    book_dir: impl Into<PathBuf>,
    progress: ProgressMode,
    version_source: VersionSource,
) -> BackendSelector {
    let fetcher = AssetFetcher::new(client.clone(), progress);
    let resolver = MetadataResolver::new(client.clone(), endpoints.clone(), version_source);

    let mut selector = BackendSelector::new(book_dir, endpoints.area.clone());
    selector.register(Box::new(PrimaryBackend::new(
        resolver,
        fetcher.clone(),
        endpoints.clone(),
    )));
    selector.register(Box::new(SecondaryBackend::new(
        client.clone(),
        fetcher,
        endpoints.clone(),
    )));
    selector
}
