//! Asset download for one book: description, thumbnail, data.

use tracing::{debug, info, warn};

use crate::book::{AssetKind, AssetSet, BookId};
use crate::download::{HttpClient, ProgressMode};

use super::Source;
use super::error::BookError;

/// What a successful fetch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetReport {
    /// Backend that served the files.
    pub source: Source,
    /// Whether the optional thumbnail was stored.
    pub thumbnail: bool,
    /// Size of the data file in bytes.
    pub data_bytes: u64,
}

/// Writes the three files of a book in order, cleaning up on fatal failure.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: HttpClient,
    progress: ProgressMode,
}

impl AssetFetcher {
    /// Creates a fetcher. `progress` applies to data files only.
    #[must_use]
    pub fn new(client: HttpClient, progress: ProgressMode) -> Self {
        Self { client, progress }
    }

    /// Stores `description`, then the thumbnail, then the data file.
    ///
    /// A thumbnail failure is logged and tolerated. A data failure removes
    /// every file of `assets` and returns [`BookError::FatalAsset`].
    ///
    /// # Errors
    ///
    /// [`BookError::Io`] if the description cannot be written,
    /// [`BookError::FatalAsset`] if the data download fails.
    pub async fn fetch(
        &self,
        id: BookId,
        source: Source,
        description: &str,
        thumbnail_url: &str,
        data_url: &str,
        assets: &AssetSet,
    ) -> Result<AssetReport, BookError> {
        let description_path = assets.path(AssetKind::Description);
        if let Err(error) = tokio::fs::write(description_path, description).await {
            assets.remove_all().await;
            return Err(BookError::io(id, description_path, error));
        }
        debug!(%id, path = %description_path.display(), "description written");

        let thumbnail = match self
            .client
            .download_to_path(
                thumbnail_url,
                assets.path(AssetKind::Thumbnail),
                ProgressMode::Hidden,
            )
            .await
        {
            Ok(_) => true,
            Err(error) => {
                warn!(%id, backend = source.as_str(), error = %error, "thumbnail unavailable, continuing");
                false
            }
        };

        let data_bytes = match self
            .client
            .download_to_path(data_url, assets.path(AssetKind::Data), self.progress)
            .await
        {
            Ok(bytes) => bytes,
            Err(error) => {
                assets.remove_all().await;
                return Err(BookError::fatal_asset(id, AssetKind::Data, error));
            }
        };

        info!(
            %id,
            backend = source.as_str(),
            bytes = data_bytes,
            thumbnail,
            "book downloaded"
        );
        Ok(AssetReport {
            source,
            thumbnail,
            data_bytes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn setup() -> (TempDir, AssetSet, BookId) {
        let dir = TempDir::new().unwrap();
        let id = BookId::new(9550).unwrap();
        let assets = AssetSet::new(dir.path(), id, "en");
        (dir, assets, id)
    }

    #[tokio::test]
    async fn test_fetch_writes_all_three_files() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/thumb.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.kii"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"KII-DATA".to_vec()))
            .mount(&server)
            .await;

        let (_dir, assets, id) = setup();
        let fetcher = AssetFetcher::new(HttpClient::new(), ProgressMode::Hidden);
        let report = fetcher
            .fetch(
                id,
                Source::Primary,
                "Name: X\n",
                &format!("{}/thumb.png", server.uri()),
                &format!("{}/data.kii", server.uri()),
                &assets,
            )
            .await
            .unwrap();

        assert!(report.thumbnail);
        assert_eq!(report.data_bytes, 8);
        assert_eq!(
            std::fs::read_to_string(assets.path(AssetKind::Description)).unwrap(),
            "Name: X\n"
        );
        assert_eq!(std::fs::read(assets.path(AssetKind::Thumbnail)).unwrap(), b"PNG");
        assert_eq!(std::fs::read(assets.path(AssetKind::Data)).unwrap(), b"KII-DATA");
    }

    #[tokio::test]
    async fn test_missing_thumbnail_is_not_fatal() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/thumb.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.kii"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"KII".to_vec()))
            .mount(&server)
            .await;

        let (_dir, assets, id) = setup();
        let fetcher = AssetFetcher::new(HttpClient::new(), ProgressMode::Hidden);
        let report = fetcher
            .fetch(
                id,
                Source::Secondary,
                "desc",
                &format!("{}/thumb.png", server.uri()),
                &format!("{}/data.kii", server.uri()),
                &assets,
            )
            .await
            .unwrap();

        assert!(!report.thumbnail);
        assert!(!assets.path(AssetKind::Thumbnail).exists());
        assert!(assets.path(AssetKind::Data).exists());
    }

    #[tokio::test]
    async fn test_data_failure_removes_every_file() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/thumb.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.kii"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (dir, assets, id) = setup();
        let fetcher = AssetFetcher::new(HttpClient::new(), ProgressMode::Hidden);
        let result = fetcher
            .fetch(
                id,
                Source::Primary,
                "desc",
                &format!("{}/thumb.png", server.uri()),
                &format!("{}/data.kii", server.uri()),
                &assets,
            )
            .await;

        assert!(matches!(
            result,
            Err(BookError::FatalAsset {
                asset: AssetKind::Data,
                ..
            })
        ));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
