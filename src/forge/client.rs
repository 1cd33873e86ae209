use async_trait::async_trait;
use log::debug;

use super::repo::ForgeRepo;
use crate::error::InstallError;
use crate::http::HttpClient;

/// Source of the raw release catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the releases of the configured repository as raw JSON text.
    async fn fetch_catalog(&self) -> Result<String, InstallError>;
}

/// Gitea-compatible forge serving `/api/v1/repos/{owner}/{repo}/releases`
pub struct Forge {
    pub http_client: HttpClient,
    pub base_url: String,
    pub repo: ForgeRepo,
}

impl Forge {
    #[tracing::instrument(skip(http_client))]
    pub fn new(http_client: HttpClient, base_url: &str, repo: ForgeRepo) -> Self {
        Self {
            http_client,
            base_url: base_url.to_string(),
            repo,
        }
    }
}

#[async_trait]
impl ReleaseSource for Forge {
    #[tracing::instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<String, InstallError> {
        let url = self.repo.releases_url(&self.base_url);
        debug!("Fetching releases of {} from {}...", self.repo, url);
        self.http_client.get_text(&url).await
    }
}
