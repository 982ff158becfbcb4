//! Remote backends that can serve book files.
//!
//! # Architecture
//!
//! - [`Backend`] - Async trait each content source implements
//! - [`PrimaryBackend`] - Modern REST API: metadata join, then streaming assets
//! - [`SecondaryBackend`] - Legacy archive server keyed only by book id
//! - [`MetadataResolver`] - Media list + version map join for the primary API
//! - [`AssetFetcher`] - Writes description, thumbnail and data for one book
//! - [`Endpoints`] - Base URLs, area tag and not-found marker for both backends
//!
//! The [`crate::selector::BackendSelector`] tries backends in order.

mod assets;
mod error;
mod metadata;
mod primary;
mod secondary;
mod versions;

pub use assets::{AssetFetcher, AssetReport};
pub use error::BookError;
pub use metadata::{
    LenientText, MediaItem, MediaListResponse, MediaPublisher, MetadataResolver, ScalarId,
    VersionSource, join,
};
pub use primary::PrimaryBackend;
pub use secondary::SecondaryBackend;
pub use versions::{DEFAULT_VERSION, VersionMap, VersionMapResponse};

use async_trait::async_trait;

use crate::book::{AssetSet, BookId, DEFAULT_AREA};

/// Default base URL of the primary REST API.
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://api.ting.eu";

/// Default base URL the primary backend streams asset files from.
pub const DEFAULT_STREAMING_BASE_URL: &str = "https://stream.ting.eu";

/// Default base URL of the legacy archive server.
pub const DEFAULT_SECONDARY_BASE_URL: &str = "http://13.80.138.170";

/// Phrase the legacy server puts in a description body for unknown books.
pub const DEFAULT_NOT_FOUND_MARKER: &str = "Not Found";

/// Which backend produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Modern REST API.
    Primary,
    /// Legacy archive server.
    Secondary,
    /// Data file was already on disk; nothing was contacted.
    Existing,
}

impl Source {
    /// Stable label for logs and output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Existing => "existing",
        }
    }
}

/// Remote locations and fixed parameters for both backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Primary API base (`/download/medias`, `/download/versions/`).
    pub primary_base: String,
    /// Primary streaming base for `.png` and `.kii` files.
    pub streaming_base: String,
    /// Legacy archive server base.
    pub secondary_base: String,
    /// Two-letter language/region tag.
    pub area: String,
    /// Substring marking an unknown book in legacy description bodies.
    pub not_found_marker: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            primary_base: DEFAULT_PRIMARY_BASE_URL.to_string(),
            streaming_base: DEFAULT_STREAMING_BASE_URL.to_string(),
            secondary_base: DEFAULT_SECONDARY_BASE_URL.to_string(),
            area: DEFAULT_AREA.to_string(),
            not_found_marker: DEFAULT_NOT_FOUND_MARKER.to_string(),
        }
    }
}

impl Endpoints {
    /// `GET {primary}/download/medias?mids="{id}"` with the quotes URL-encoded.
    #[must_use]
    pub fn media_list_url(&self, id: BookId) -> String {
        let quoted = format!("\"{}\"", id.unpadded());
        format!(
            "{}/download/medias?mids={}",
            trim_base(&self.primary_base),
            urlencoding::encode(&quoted)
        )
    }

    /// `GET {primary}/download/versions/`.
    #[must_use]
    pub fn version_map_url(&self) -> String {
        format!("{}/download/versions/", trim_base(&self.primary_base))
    }

    /// `{streaming}/{publisherId}/{id}/{id}_{area}.png`.
    #[must_use]
    pub fn primary_thumbnail_url(&self, publisher_id: &str, id: BookId) -> String {
        let id = id.unpadded();
        format!(
            "{}/{publisher_id}/{id}/{id}_{}.png",
            trim_base(&self.streaming_base),
            self.area
        )
    }

    /// `{streaming}/{publisherId}/{id}/{version}/{fileId5}_{area}.kii`.
    #[must_use]
    pub fn primary_data_url(&self, publisher_id: &str, id: BookId, version: u32) -> String {
        format!(
            "{}/{publisher_id}/{}/{version}/{}_{}.kii",
            trim_base(&self.streaming_base),
            id.unpadded(),
            id.file_id(),
            self.area
        )
    }

    /// Legacy description endpoint.
    #[must_use]
    pub fn secondary_description_url(&self, id: BookId) -> String {
        format!(
            "{}/book-files/get-description/id/{}/area/{}/",
            trim_base(&self.secondary_base),
            id.unpadded(),
            self.area
        )
    }

    /// Legacy thumbnail endpoint.
    #[must_use]
    pub fn secondary_thumbnail_url(&self, id: BookId) -> String {
        self.secondary_file_url(id, "thumb")
    }

    /// Legacy data archive endpoint.
    #[must_use]
    pub fn secondary_data_url(&self, id: BookId) -> String {
        self.secondary_file_url(id, "archive")
    }

    fn secondary_file_url(&self, id: BookId, kind: &str) -> String {
        format!(
            "{}/book-files/get/id/{}/area/{}/type/{kind}/",
            trim_base(&self.secondary_base),
            id.unpadded(),
            self.area
        )
    }
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

/// A content source that can place one book's files into the book directory.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Downloads all assets of `id` into `assets`.
    ///
    /// On error, no files of `assets` are left behind.
    async fn fetch(&self, id: BookId, assets: &AssetSet) -> Result<AssetReport, BookError>;
}
