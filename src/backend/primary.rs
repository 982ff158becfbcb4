//! Primary backend: REST metadata plus versioned streaming paths.

use async_trait::async_trait;
use tracing::instrument;

use crate::book::{AssetSet, BookId};

use super::assets::{AssetFetcher, AssetReport};
use super::error::BookError;
use super::metadata::MetadataResolver;
use super::{Backend, Endpoints, Source};

/// Downloads books listed by the primary REST API.
#[derive(Debug)]
pub struct PrimaryBackend {
    resolver: MetadataResolver,
    fetcher: AssetFetcher,
    endpoints: Endpoints,
}

impl PrimaryBackend {
    /// Creates the backend from its resolver and fetcher.
    #[must_use]
    pub fn new(resolver: MetadataResolver, fetcher: AssetFetcher, endpoints: Endpoints) -> Self {
        Self {
            resolver,
            fetcher,
            endpoints,
        }
    }
}

#[async_trait]
impl Backend for PrimaryBackend {
    fn name(&self) -> &'static str {
        "primary"
    }

    #[instrument(skip(self, assets), fields(backend = "primary"))]
    async fn fetch(&self, id: BookId, assets: &AssetSet) -> Result<AssetReport, BookError> {
        let metadata = match self.resolver.resolve(id).await {
            Ok(metadata) => metadata,
            Err(error) => {
                assets.remove_all().await;
                return Err(error);
            }
        };

        let description = metadata.description_text(&self.endpoints.area);
        let thumbnail_url = self
            .endpoints
            .primary_thumbnail_url(&metadata.publisher_id, id);
        let data_url =
            self.endpoints
                .primary_data_url(&metadata.publisher_id, id, metadata.version);

        self.fetcher
            .fetch(
                id,
                Source::Primary,
                &description,
                &thumbnail_url,
                &data_url,
                assets,
            )
            .await
    }
}
