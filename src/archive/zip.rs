use crate::runtime::Runtime;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::ArchiveExtractor;

/// Unpacks the `.zip` archives Fig releases are published as.
pub struct ZipExtractor;

impl ZipExtractor {
    /// Loads the whole archive: `ZipArchive` needs `Seek`, the runtime only hands out `Read`.
    fn load<R: Runtime>(runtime: &R, archive_path: &Path) -> Result<ZipArchive<Cursor<Vec<u8>>>> {
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
        ZipArchive::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", archive_path))
    }

    /// Writes one entry below `extract_to`. Returns false unless a file was written.
    fn unpack_entry<R: Runtime>(
        runtime: &R,
        entry: &EntryInfo,
        content: &mut dyn Read,
        extract_to: &Path,
    ) -> Result<bool> {
        let target = extract_to.join(&entry.relative);

        if entry.is_dir {
            runtime.create_dir_all(&target)?;
            return Ok(false);
        }

        if let Some(parent) = target.parent() {
            runtime.create_dir_all(parent)?;
        }
        let mut out = runtime.create_file(&target)?;
        std::io::copy(content, &mut out)
            .with_context(|| format!("Failed to extract file {:?}", target))?;

        #[cfg(unix)]
        if let Some(mode) = entry.mode
            && let Err(e) = runtime.set_permissions(&target, mode)
        {
            debug!("Failed to set permissions on {:?}: {}", target, e);
        }

        Ok(true)
    }
}

/// What the extractor needs to know about an entry besides its bytes
struct EntryInfo {
    relative: PathBuf,
    is_dir: bool,
    mode: Option<u32>,
}

impl ArchiveExtractor for ZipExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        archive_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<usize> {
        let mut archive = Self::load(runtime, archive_path)?;
        if archive.len() == 0 {
            bail!("Archive {:?} has no entries", archive_path);
        }

        let mut files = 0;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;
            let Some(relative) = entry.enclosed_name() else {
                debug!("Skipping entry with unsafe path: {}", entry.name());
                continue;
            };
            let info = EntryInfo {
                relative: relative.to_path_buf(),
                is_dir: entry.is_dir(),
                mode: entry.unix_mode(),
            };
            if Self::unpack_entry(runtime, &info, &mut entry, extract_to)? {
                files += 1;
            }
        }

        info!("Extracted {} file(s) into {:?}", files, extract_to);
        Ok(files)
    }
}
