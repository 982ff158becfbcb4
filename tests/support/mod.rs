//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use std::path::Path;

use pen_downloader_core::{
    BackendSelector, Endpoints, HttpClient, ProgressMode, VersionSource, build_default_selector,
};
use wiremock::MockServer;

/// Endpoints with every base pointed at `server`.
pub fn endpoints_for(server: &MockServer) -> Endpoints {
    Endpoints {
        primary_base: server.uri(),
        streaming_base: format!("{}/stream", server.uri()),
        secondary_base: format!("{}/legacy", server.uri()),
        ..Endpoints::default()
    }
}

/// The production backend chain against `server`, writing into `book_dir`.
pub fn selector_for(server: &MockServer, book_dir: &Path) -> BackendSelector {
    build_default_selector(
        &HttpClient::new(),
        &endpoints_for(server),
        book_dir,
        ProgressMode::Hidden,
        VersionSource::PerRun,
    )
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
