use anyhow::Result;
use clap::Parser;
use fig_installer::config::{Config, INSTALLER_VERSION, Settings};
use fig_installer::error::InstallError;
use fig_installer::pipeline::{Outcome, Pipeline, PipelineError};
use fig_installer::platform::DefaultPlatformDetector;
use fig_installer::runtime::RealRuntime;
use std::path::PathBuf;
use std::process::ExitCode;

/// fig-installer - Fig Online Installer
///
/// Lists the published Fig releases, asks which one to install and where,
/// then downloads the archive for this platform and unpacks it in place.
#[derive(Parser, Debug)]
#[command(author, version = INSTALLER_VERSION, about)]
struct Cli {
    /// Forge base URL (defaults to https://git.fig-lang.cn)
    #[arg(long = "forge-url", env = "FIG_FORGE_URL", value_name = "URL")]
    pub forge_url: Option<String>,

    /// Repository publishing the releases, as "owner/repo"
    #[arg(long, env = "FIG_REPO", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Directory the archive is downloaded into (defaults to the current directory)
    #[arg(long = "download-dir", env = "FIG_DOWNLOAD_DIR", value_name = "PATH")]
    pub download_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let settings = Settings::new(cli.forge_url, cli.repo, cli.download_dir)?;
    let config = Config::new(settings)?;
    let pipeline = Pipeline::new(RealRuntime, DefaultPlatformDetector, config);
    Ok(pipeline.run().await?)
}

fn report(e: &anyhow::Error) {
    let Some(failure) = e.downcast_ref::<PipelineError>() else {
        eprintln!("error: {:#}", e);
        return;
    };

    eprintln!("error: {}", failure);
    if let InstallError::NoMatchingAsset { candidates, .. } = &failure.error {
        eprintln!("Could not find artifact. Available assets:");
        if candidates.is_empty() {
            eprintln!("    (none)");
        }
        for name in candidates {
            eprintln!("    {}", name);
        }
    }
}
