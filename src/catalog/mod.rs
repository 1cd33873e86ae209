//! Release catalog parsing, listing and version selection.
//!
//! The forge returns releases newest first, so index 0 is the latest
//! release. The catalog is trusted as-is: no sorting, no deduplication.

mod selector;

use log::debug;
use std::fmt::Write;

use crate::error::InstallError;
use crate::forge::Release;

pub use selector::{MAX_LISTED, Selection, select_release};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCatalog {
    releases: Vec<Release>,
}

impl ReleaseCatalog {
    /// Parse the raw releases JSON.
    ///
    /// Anything other than an array of well-formed release objects is
    /// rejected. `[]` is a valid, empty catalog.
    #[tracing::instrument(skip(raw))]
    pub fn parse(raw: &str) -> Result<Self, InstallError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| InstallError::MalformedCatalog {
                reason: format!("response is not valid JSON: {}", e),
            })?;

        if !value.is_array() {
            return Err(InstallError::MalformedCatalog {
                reason: "expected a JSON array of releases".to_string(),
            });
        }

        let releases: Vec<Release> =
            serde_json::from_value(value).map_err(|e| InstallError::MalformedCatalog {
                reason: format!("unexpected release shape: {}", e),
            })?;

        debug!("Parsed {} releases", releases.len());
        Ok(Self { releases })
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn latest(&self) -> Option<&Release> {
        self.releases.first()
    }

    /// Text shown before the version prompt: the first [`MAX_LISTED`]
    /// releases, then a `.....` line when the catalog holds more.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "There are {} versions:", self.len());
        for (i, release) in self.releases.iter().take(MAX_LISTED).enumerate() {
            let summary = release.body.lines().next().unwrap_or_default();
            let _ = writeln!(out, "    {} {} - {}", i + 1, release.name, summary);
            let _ = writeln!(out, "        @{}", release.published_at);
        }
        if self.len() > MAX_LISTED {
            let _ = writeln!(out, "    .....");
        }
        out
    }
}
