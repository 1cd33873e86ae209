use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::path::PathBuf;

use crate::{
    archive::{ArchiveExtractor, ZipExtractor},
    forge::{Forge, ForgeRepo, ReleaseSource},
    http::HttpClient,
};

/// Forge hosting the Fig releases
pub const DEFAULT_FORGE_URL: &str = "https://git.fig-lang.cn";

/// Repository whose releases are installed
pub const DEFAULT_REPO: &str = "PuqiAR/Fig-TreeWalker";

/// Installer version, taken from git tags at build time
pub const INSTALLER_VERSION: &str = env!("FIG_INSTALLER_VERSION");

/// Values that drive one installer run
#[derive(Debug, Clone)]
pub struct Settings {
    pub forge_url: String,
    pub repo: ForgeRepo,
    /// Directory the archive is downloaded into before unpacking
    pub download_dir: PathBuf,
    /// Version shown in the banner and sent in the user agent
    pub version: String,
}

impl Settings {
    pub fn new(forge_url: Option<String>, repo: Option<String>, download_dir: Option<PathBuf>) -> Result<Self> {
        let repo = repo.as_deref().unwrap_or(DEFAULT_REPO);
        Ok(Self {
            forge_url: forge_url.unwrap_or_else(|| DEFAULT_FORGE_URL.to_string()),
            repo: repo
                .parse::<ForgeRepo>()
                .with_context(|| format!("Invalid repository '{}'", repo))?,
            download_dir: download_dir.unwrap_or_else(|| PathBuf::from(".")),
            version: INSTALLER_VERSION.to_string(),
        })
    }
}

pub struct Config<S: ReleaseSource, E: ArchiveExtractor> {
    pub source: S,
    pub http_client: HttpClient,
    pub extractor: E,
    pub settings: Settings,
}

impl Config<Forge, ZipExtractor> {
    pub fn new(settings: Settings) -> Result<Self> {
        let user_agent = format!("fig-installer/{}", settings.version);
        debug!("Using forge {} with user agent {}", settings.forge_url, user_agent);

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        let http_client = HttpClient::new(client);

        let source = Forge::new(http_client.clone(), &settings.forge_url, settings.repo.clone());

        Ok(Self {
            source,
            http_client,
            extractor: ZipExtractor,
            settings,
        })
    }
}
