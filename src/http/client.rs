//! HTTP client with error classification for the install pipeline.
//!
//! Transport and status failures surface as [`InstallError::NetworkFailure`],
//! local write failures as [`InstallError::IoFailure`]. Nothing is retried.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

use crate::download::ProgressSink;
use crate::error::InstallError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and returns the body as text.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, InstallError> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InstallError::network(format!("request to {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(InstallError::network)?;

        response
            .text()
            .await
            .map_err(|e| InstallError::network(format!("failed to read response body: {}", e)))
    }

    /// Streams a response body into the writer produced by `create_writer`.
    ///
    /// The writer is only created once the server answered with a success
    /// status, and each chunk is written as soon as it arrives. Returns the
    /// number of bytes written.
    #[tracing::instrument(skip(self, create_writer, progress))]
    pub async fn download_file<W, F>(
        &self,
        url: &str,
        create_writer: F,
        progress: &dyn ProgressSink,
    ) -> Result<u64, InstallError>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InstallError::network(format!("request to {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(InstallError::network)?;

        // content-length is optional; 0 means unknown
        let total = response.content_length().unwrap_or(0);
        progress.start(total);

        let mut writer = create_writer().map_err(InstallError::io)?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(|e| {
            InstallError::network(format!("failed to read chunk from download stream: {}", e))
        })? {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")
                .map_err(InstallError::io)?;
            downloaded_bytes += chunk.len() as u64;
            progress.advance(chunk.len() as u64);
        }

        writer
            .flush()
            .context("Failed to flush downloaded file")
            .map_err(InstallError::io)?;
        progress.finish();

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
