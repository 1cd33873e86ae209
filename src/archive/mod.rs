mod zip;

use crate::runtime::Runtime;
use anyhow::Result;
use std::path::Path;

pub use zip::ZipExtractor;

/// Unpacks a downloaded release archive
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Whether `archive_path` looks like an archive this extractor reads
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Extract every entry of the archive below `extract_to`, keeping the
    /// archive's own directory layout. Returns the number of files written.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<usize>;
}
