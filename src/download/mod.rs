//! Streams a release archive to disk.

pub mod progress;

use log::{info, warn};
use std::path::Path;

use crate::cleanup::{CleanupGuard, Leftover, SharedCleanupContext};
use crate::error::InstallError;
use crate::http::HttpClient;
use crate::runtime::Runtime;

pub use progress::{DownloadProgress, ProgressSink};

/// Downloads `url` to `dest`, reporting progress along the way.
///
/// `dest` is registered in the cleanup context while the transfer runs. On
/// failure the partial file is removed before the error is returned.
#[tracing::instrument(skip(runtime, http_client, progress, cleanup_ctx))]
pub async fn download_archive<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    url: &str,
    dest: &Path,
    progress: &dyn ProgressSink,
    cleanup_ctx: SharedCleanupContext,
) -> Result<u64, InstallError> {
    info!("Downloading {} to {:?}...", url, dest);

    let guard = CleanupGuard::new(cleanup_ctx, Leftover::PartialDownload(dest.to_path_buf()));
    let result = http_client
        .download_file(url, || runtime.create_file(dest), progress)
        .await;

    match result {
        Ok(bytes) => {
            guard.release();
            info!("Download complete.");
            Ok(bytes)
        }
        Err(e) => {
            progress.abandon();
            if runtime.exists(dest)
                && let Err(rm_err) = runtime.remove_file(dest)
            {
                warn!("Failed to remove partial download {:?}: {:#}", dest, rm_err);
            }
            guard.release();
            Err(e)
        }
    }
}
