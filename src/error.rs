//! Error taxonomy for the install pipeline.
//!
//! Every variant is terminal: the pipeline never retries, it reports the
//! failing step and exits non-zero. An empty release catalog is not an error
//! and is reported through [`crate::pipeline::Outcome::NothingToInstall`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    #[error("Malformed release catalog: {reason}")]
    MalformedCatalog { reason: String },

    #[error("Invalid selection '{input}': {reason}")]
    InvalidSelection { input: String, reason: String },

    #[error("Could not find a {platform} .zip artifact in release {tag}")]
    NoMatchingAsset {
        tag: String,
        platform: String,
        /// Names of every asset attached to the release, in catalog order.
        candidates: Vec<String>,
    },

    #[error("Archive failure: {message}")]
    ArchiveFailure { message: String },

    #[error("I/O failure: {message}")]
    IoFailure { message: String },

    #[error("{} already exists, refusing to overwrite", path.display())]
    AlreadyInstalled { path: PathBuf },
}

impl InstallError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::NetworkFailure {
            message: err.to_string(),
        }
    }

    /// Wraps a host-level error, keeping its whole context chain.
    pub fn io(err: anyhow::Error) -> Self {
        Self::IoFailure {
            message: format!("{:#}", err),
        }
    }

    pub fn archive(err: anyhow::Error) -> Self {
        Self::ArchiveFailure {
            message: format!("{:#}", err),
        }
    }

    pub fn invalid_selection(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
