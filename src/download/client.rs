//! HTTP client wrapper for API calls and asset downloads.
//!
//! This module provides the `HttpClient` struct which handles text and JSON
//! requests plus streaming downloads into a fixed target path.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::progress::ProgressMode;
use crate::user_agent;

/// HTTP client shared by both backends.
///
/// Created once per run and reused for every request so connections are
/// pooled.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Client with the default 30 s connect / 300 s idle read timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Client with timeouts taken from configuration.
    ///
    /// `read_timeout_secs` bounds the silence between two reads, not the
    /// whole transfer, so a slow but steady data file still completes.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("reqwest client builder with plain timeouts");
        Self { client }
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on an invalid URL, a network failure, a
    /// non-success status or a body that cannot be read.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))
    }

    /// Fetches `url` and decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`get_text`](Self::get_text), plus [`DownloadError::Decode`]
    /// when the body does not match `T`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DownloadError> {
        let response = self.send(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;
        serde_json::from_slice(&body).map_err(|e| DownloadError::decode(url, e))
    }

    /// Streams `url` into `target`, replacing any existing file.
    ///
    /// On any failure after the file was created, the partial file is
    /// removed before the error is returned.
    ///
    /// # Returns
    ///
    /// Number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails, the server returns an
    /// error status or writing to disk fails.
    #[instrument(skip(self, progress), fields(url = %url, target = %target.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        target: &Path,
        progress: ProgressMode,
    ) -> Result<u64, DownloadError> {
        let response = self.send(url).await?;

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let mut file = File::create(target)
            .await
            .map_err(|e| DownloadError::io(target, e))?;

        let label = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bar = progress.bar(&label, content_length);

        let stream_result = stream_to_file(&mut file, response, url, target, &bar).await;
        bar.finish_and_clear();
        drop(file);

        match stream_result {
            Ok(bytes) => {
                debug!(bytes, "download complete");
                Ok(bytes)
            }
            Err(error) => {
                debug!(path = %target.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(target).await;
                Err(error)
            }
        }
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        debug!("sending request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

/// Copies the body chunk by chunk into `file`, ticking `bar`.
///
/// Kept separate so the caller can clean up on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    bar: &indicatif::ProgressBar,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
        bar.set_position(bytes_written);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}
