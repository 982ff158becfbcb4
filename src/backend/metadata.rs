//! Metadata resolution against the primary REST API.
//!
//! Two requests per book: the media list filtered by id and the full version
//! map. [`join`] combines them into a [`BookMetadata`].

use serde::Deserialize;
use serde::de::IgnoredAny;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::book::{BookId, BookMetadata};
use crate::download::HttpClient;

use super::error::BookError;
use super::versions::{VersionMap, VersionMapResponse};
use super::Endpoints;

const BACKEND: &str = "primary";

/// A JSON scalar the API sends as either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScalarId {
    /// Numeric form.
    Number(u64),
    /// String form.
    Text(String),
}

impl ScalarId {
    fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

/// A display field the API usually sends as a string. Numbers are kept as
/// their decimal text; arrays, objects and booleans are dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientText {
    /// String form.
    Text(String),
    /// Numeric form.
    Number(serde_json::Number),
    /// Anything else.
    Other(IgnoredAny),
}

impl LenientText {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Other(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Publisher object nested in a media item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPublisher {
    /// Publisher id used in streaming paths.
    pub publisher_id: Option<ScalarId>,
}

/// One element of the media list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaItem {
    /// Media id as reported by the API.
    pub mid: Option<ScalarId>,
    /// Book title.
    pub title: Option<LenientText>,
    /// Author name.
    pub author: Option<LenientText>,
    /// Publisher details.
    pub publisher: Option<MediaPublisher>,
}

/// Body of `GET {primary}/download/medias?mids="{id}"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MediaListResponse {
    /// Matching media; empty when the id is unknown.
    pub items: Vec<MediaItem>,
}

/// Joins the media list and version map into metadata for `id`.
///
/// # Errors
///
/// - [`BookError::NotFound`] when the media list is empty
/// - [`BookError::IncompleteMetadata`] when the publisher id is missing or empty
pub fn join(
    id: BookId,
    media: MediaListResponse,
    versions: &VersionMap,
) -> Result<BookMetadata, BookError> {
    let Some(item) = media.items.into_iter().next() else {
        return Err(BookError::not_found(id, BACKEND));
    };

    if let Some(mid) = item.mid.as_ref().map(ScalarId::to_text)
        && mid.trim_start_matches('0') != id.unpadded()
    {
        warn!(%id, %mid, "media list returned a different mid than requested");
    }

    let publisher_id = item
        .publisher
        .and_then(|p| p.publisher_id)
        .map(|p| p.to_text())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BookError::incomplete(id, "publisherId"))?;

    let version = versions.version_for(id);
    let author = item.author.and_then(LenientText::into_text);

    Ok(BookMetadata {
        id,
        publisher_id,
        version,
        title: item
            .title
            .and_then(LenientText::into_text)
            .unwrap_or_default(),
        author,
    })
}

/// How often the version map is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSource {
    /// Once per resolver, i.e. once per run.
    #[default]
    PerRun,
    /// Before every book.
    PerBook,
}

/// Resolves [`BookMetadata`] from the primary API.
///
/// Holds the per-run version map cache; create one resolver per run.
#[derive(Debug)]
pub struct MetadataResolver {
    client: HttpClient,
    endpoints: Endpoints,
    version_source: VersionSource,
    cached_versions: OnceCell<VersionMap>,
}

impl MetadataResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(client: HttpClient, endpoints: Endpoints, version_source: VersionSource) -> Self {
        Self {
            client,
            endpoints,
            version_source,
            cached_versions: OnceCell::new(),
        }
    }

    /// Fetches and joins metadata for `id`.
    ///
    /// # Errors
    ///
    /// [`BookError::Transport`] when either request fails, plus the errors of
    /// [`join`].
    #[instrument(skip(self), fields(backend = BACKEND))]
    pub async fn resolve(&self, id: BookId) -> Result<BookMetadata, BookError> {
        let media_url = self.endpoints.media_list_url(id);
        debug!(url = %media_url, "requesting media list");
        let media: MediaListResponse = self
            .client
            .get_json(&media_url)
            .await
            .map_err(|e| BookError::transport(id, BACKEND, e))?;

        if media.items.is_empty() {
            debug!(%id, "media list empty");
            return Err(BookError::not_found(id, BACKEND));
        }

        let metadata = match self.version_source {
            VersionSource::PerRun => {
                let versions = self
                    .cached_versions
                    .get_or_try_init(|| self.fetch_versions(id))
                    .await?;
                join(id, media, versions)?
            }
            VersionSource::PerBook => {
                let versions = self.fetch_versions(id).await?;
                join(id, media, &versions)?
            }
        };

        debug!(
            %id,
            publisher = %metadata.publisher_id,
            version = metadata.version,
            "metadata resolved"
        );
        Ok(metadata)
    }

    async fn fetch_versions(&self, id: BookId) -> Result<VersionMap, BookError> {
        let url = self.endpoints.version_map_url();
        debug!(url = %url, "requesting version map");
        let response: VersionMapResponse = self
            .client
            .get_json(&url)
            .await
            .map_err(|e| BookError::transport(id, BACKEND, e))?;
        let versions = VersionMap::from(response);
        debug!(entries = versions.len(), "version map loaded");
        Ok(versions)
    }
}
