//! Install pipeline: detect the platform, ask where to install, fetch the
//! catalog, ask which version, pick the archive, download it and install it.
//!
//! Each [`Stage`] runs one component and only advances on success. Any
//! failure ends the run as a [`PipelineError`] naming the stage.

use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    archive::ArchiveExtractor,
    asset::resolve_asset,
    catalog::{ReleaseCatalog, select_release},
    cleanup::{self, SharedCleanupContext},
    config::{Config, Settings},
    download::{DownloadProgress, download_archive},
    error::InstallError,
    forge::{Asset, Release, ReleaseSource},
    http::HttpClient,
    install::{ensure_not_installed, install_archive},
    platform::{Platform, PlatformDetector, default_install_path},
    runtime::Runtime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DetectPlatform,
    ResolvePath,
    FetchCatalog,
    SelectVersion,
    ResolveAsset,
    Download,
    Install,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DetectPlatform => "platform detection",
            Stage::ResolvePath => "install path resolution",
            Stage::FetchCatalog => "fetching releases",
            Stage::SelectVersion => "version selection",
            Stage::ResolveAsset => "artifact lookup",
            Stage::Download => "download",
            Stage::Install => "install",
        };
        write!(f, "{}", name)
    }
}

/// A run that stopped at `stage`
#[derive(Error, Debug)]
#[error("{stage} failed: {error}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub error: InstallError,
}

impl PipelineError {
    pub fn new(stage: Stage, error: InstallError) -> Self {
        Self { stage, error }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed { tag: String, path: PathBuf },
    /// The forge has no releases yet
    NothingToInstall,
}

/// Everything needed to download and install one release
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub release: Release,
    pub asset: Asset,
    pub install_path: PathBuf,
    pub platform: Platform,
}

pub struct Pipeline<R: Runtime, D: PlatformDetector, S: ReleaseSource, E: ArchiveExtractor> {
    pub runtime: R,
    pub detector: D,
    pub source: S,
    pub http_client: HttpClient,
    pub extractor: E,
    pub settings: Settings,
}

impl<R, D, S, E> Pipeline<R, D, S, E>
where
    R: Runtime + 'static,
    D: PlatformDetector,
    S: ReleaseSource,
    E: ArchiveExtractor,
{
    #[tracing::instrument(skip(runtime, detector, config))]
    pub fn new(runtime: R, detector: D, config: Config<S, E>) -> Self {
        Self {
            runtime,
            detector,
            source: config.source,
            http_client: config.http_client,
            extractor: config.extractor,
            settings: config.settings,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<Outcome, PipelineError> {
        println!("== Fig Online Installer v{} ==", self.settings.version);

        debug!("stage: {}", Stage::DetectPlatform);
        let platform = self
            .detect_platform()
            .map_err(|e| PipelineError::new(Stage::DetectPlatform, e))?;

        debug!("stage: {}", Stage::ResolvePath);
        let install_path = self
            .resolve_install_path(&platform)
            .map_err(|e| PipelineError::new(Stage::ResolvePath, e))?;

        debug!("stage: {}", Stage::FetchCatalog);
        let catalog = self
            .fetch_catalog()
            .await
            .map_err(|e| PipelineError::new(Stage::FetchCatalog, e))?;
        if catalog.is_empty() {
            println!("No version has been released!");
            return Ok(Outcome::NothingToInstall);
        }

        debug!("stage: {}", Stage::SelectVersion);
        let release = self
            .select_version(&catalog)
            .map_err(|e| PipelineError::new(Stage::SelectVersion, e))?;

        println!();
        println!("================================");
        println!("Installing Fig-{}", release.tag_name);

        debug!("stage: {}", Stage::ResolveAsset);
        let asset = resolve_asset(release, &platform)
            .map_err(|e| PipelineError::new(Stage::ResolveAsset, e))?;
        info!("Selected asset {}", asset.name);

        let request = InstallRequest {
            release: release.clone(),
            asset: asset.clone(),
            install_path,
            platform,
        };

        // Set up cleanup context for Ctrl-C handling
        let cleanup_ctx = cleanup::new_shared();
        let cleanup_ctx_clone = Arc::clone(&cleanup_ctx);

        let ctrl_c_handler = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted, cleaning up...");
                if let Ok(ctx) = cleanup_ctx_clone.lock() {
                    let removed = ctx.cleanup();
                    debug!("Removed {} leftover path(s)", removed);
                }
                std::process::exit(130); // Standard exit code for Ctrl-C
            }
        });

        let result = self.download_and_install(&request, cleanup_ctx).await;

        // Abort the Ctrl-C handler since installation completed (successfully or with error)
        ctrl_c_handler.abort();
        result?;

        println!(
            "Fig-{} install successfully to {} !",
            request.release.tag_name,
            request.install_path.display()
        );

        Ok(Outcome::Installed {
            tag: request.release.tag_name,
            path: request.install_path,
        })
    }

    fn detect_platform(&self) -> Result<Platform, InstallError> {
        let platform = self.detector.detect();
        info!("Detected platform {} ({})", platform, platform.token());
        if !platform.is_supported() {
            return Err(InstallError::UnsupportedPlatform {
                platform: platform.to_string(),
            });
        }
        Ok(platform)
    }

    fn resolve_install_path(&self, platform: &Platform) -> Result<PathBuf, InstallError> {
        let default_path = default_install_path(platform)?;
        let answer = self
            .runtime
            .prompt(&format!(
                "Install to (default: {}): ",
                default_path.display()
            ))
            .map_err(InstallError::io)?;
        println!();

        let install_path = if answer.is_empty() {
            default_path
        } else {
            PathBuf::from(answer)
        };

        // Fail before spending a download on a taken path
        ensure_not_installed(&self.runtime, &install_path)?;
        Ok(install_path)
    }

    async fn fetch_catalog(&self) -> Result<ReleaseCatalog, InstallError> {
        let raw = self.source.fetch_catalog().await?;
        ReleaseCatalog::parse(&raw)
    }

    fn select_version<'a>(&self, catalog: &'a ReleaseCatalog) -> Result<&'a Release, InstallError> {
        print!("{}", catalog.listing());

        let latest_name = catalog
            .latest()
            .map(|r| r.name.as_str())
            .unwrap_or_default();
        let answer = self
            .runtime
            .prompt(&format!(
                "Which version do you want to install({} if empty)(e.g. x.x.x/index)? ",
                latest_name
            ))
            .map_err(InstallError::io)?;
        println!();

        select_release(catalog, &answer)
    }

    async fn download_and_install(
        &self,
        request: &InstallRequest,
        cleanup_ctx: SharedCleanupContext,
    ) -> Result<(), PipelineError> {
        let archive_path = self.settings.download_dir.join(&request.asset.name);

        debug!("stage: {}", Stage::Download);
        let progress = DownloadProgress::new(&request.asset.name);
        download_archive(
            &self.runtime,
            &self.http_client,
            &request.asset.browser_download_url,
            &archive_path,
            &progress,
            Arc::clone(&cleanup_ctx),
        )
        .await
        .map_err(|e| PipelineError::new(Stage::Download, e))?;

        println!("{} download completed.", request.asset.name);
        println!("unzipping to {} ...", request.install_path.display());

        debug!("stage: {}", Stage::Install);
        install_archive(
            &self.runtime,
            &self.extractor,
            &archive_path,
            &request.install_path,
            cleanup_ctx,
        )
        .map_err(|e| PipelineError::new(Stage::Install, e))?;

        println!("unzipping completed");
        println!("cleaning...");
        Ok(())
    }
}
