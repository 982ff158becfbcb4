//! Secondary backend: the legacy archive server.
//!
//! The server answers every description request with 200; unknown books are
//! recognised by a marker phrase in the body.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::book::{AssetSet, BookId};
use crate::download::HttpClient;

use super::assets::{AssetFetcher, AssetReport};
use super::error::BookError;
use super::{Backend, Endpoints, Source};

const BACKEND: &str = "secondary";

/// Downloads books from the legacy archive server.
#[derive(Debug)]
pub struct SecondaryBackend {
    client: HttpClient,
    fetcher: AssetFetcher,
    endpoints: Endpoints,
}

impl SecondaryBackend {
    /// Creates the backend.
    #[must_use]
    pub fn new(client: HttpClient, fetcher: AssetFetcher, endpoints: Endpoints) -> Self {
        Self {
            client,
            fetcher,
            endpoints,
        }
    }

    fn is_unknown(&self, description: &str) -> bool {
        !self.endpoints.not_found_marker.is_empty()
            && description.contains(&self.endpoints.not_found_marker)
    }
}

#[async_trait]
impl Backend for SecondaryBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    #[instrument(skip(self, assets), fields(backend = BACKEND))]
    async fn fetch(&self, id: BookId, assets: &AssetSet) -> Result<AssetReport, BookError> {
        let description_url = self.endpoints.secondary_description_url(id);
        debug!(url = %description_url, "requesting legacy description");

        let description = match self.client.get_text(&description_url).await {
            Ok(body) => body,
            Err(error) => {
                assets.remove_all().await;
                return Err(BookError::transport(id, BACKEND, error));
            }
        };

        if self.is_unknown(&description) {
            debug!(%id, "legacy server reports unknown book");
            assets.remove_all().await;
            return Err(BookError::not_found(id, BACKEND));
        }

        self.fetcher
            .fetch(
                id,
                Source::Secondary,
                &description,
                &self.endpoints.secondary_thumbnail_url(id),
                &self.endpoints.secondary_data_url(id),
                assets,
            )
            .await
    }
}
