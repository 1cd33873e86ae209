//! Unpacks a downloaded release archive into its final location.
//!
//! The archive is extracted next to the install path, then the extracted
//! top-level directory is renamed onto the install path. Until that rename
//! succeeds nothing exists at the install path.

use anyhow::anyhow;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveExtractor;
use crate::cleanup::{CleanupGuard, Leftover, SharedCleanupContext};
use crate::error::InstallError;
use crate::runtime::Runtime;

/// Fail with [`InstallError::AlreadyInstalled`] if `final_path` is taken.
pub fn ensure_not_installed<R: Runtime>(runtime: &R, final_path: &Path) -> Result<(), InstallError> {
    if runtime.exists(final_path) {
        return Err(InstallError::AlreadyInstalled {
            path: final_path.to_path_buf(),
        });
    }
    Ok(())
}

/// Directory the archive is unpacked into: the parent of the install path.
fn extraction_root(final_path: &Path) -> PathBuf {
    match final_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Install `archive_path` at `final_path` and delete the archive.
///
/// The archive must contain a single top-level directory named after the
/// archive file stem (`fig-2.0.0-linux.zip` holds `fig-2.0.0-linux/`).
#[tracing::instrument(skip(runtime, extractor, cleanup_ctx))]
pub fn install_archive<R: Runtime + 'static, E: ArchiveExtractor>(
    runtime: &R,
    extractor: &E,
    archive_path: &Path,
    final_path: &Path,
    cleanup_ctx: SharedCleanupContext,
) -> Result<(), InstallError> {
    ensure_not_installed(runtime, final_path)?;

    if !extractor.can_handle(archive_path) {
        return Err(InstallError::ArchiveFailure {
            message: format!("unsupported archive format: {}", archive_path.display()),
        });
    }

    let stem = archive_path
        .file_stem()
        .ok_or_else(|| InstallError::ArchiveFailure {
            message: format!("archive path {:?} has no file name", archive_path),
        })?;

    let root = extraction_root(final_path);
    runtime.create_dir_all(&root).map_err(InstallError::io)?;

    let extracted = root.join(stem);
    if runtime.exists(&extracted) {
        return Err(InstallError::ArchiveFailure {
            message: format!(
                "{} already exists, remove it before installing",
                extracted.display()
            ),
        });
    }

    info!("Unpacking {:?} into {:?}", archive_path, root);
    let guard = CleanupGuard::new(cleanup_ctx, Leftover::ExtractedTree(extracted.clone()));
    let result = unpack_and_rename(runtime, extractor, archive_path, &root, &extracted, final_path);
    if result.is_err()
        && runtime.exists(&extracted)
        && let Err(rm_err) = runtime.remove_dir_all(&extracted)
    {
        warn!("Failed to remove partially extracted {:?}: {:#}", extracted, rm_err);
    }
    guard.release();
    result?;

    runtime.remove_file(archive_path).map_err(InstallError::io)?;
    debug!("Removed archive {:?}", archive_path);
    Ok(())
}

fn unpack_and_rename<R: Runtime + 'static, E: ArchiveExtractor>(
    runtime: &R,
    extractor: &E,
    archive_path: &Path,
    root: &Path,
    extracted: &Path,
    final_path: &Path,
) -> Result<(), InstallError> {
    let files = extractor
        .extract(runtime, archive_path, root)
        .map_err(InstallError::archive)?;
    debug!("Unpacked {} file(s) from {:?}", files, archive_path);

    if !runtime.is_dir(extracted) {
        return Err(InstallError::archive(anyhow!(
            "archive has no top-level directory {:?}",
            extracted.file_name().unwrap_or_default()
        )));
    }

    runtime
        .rename(extracted, final_path)
        .map_err(InstallError::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{MockArchiveExtractor, ZipExtractor};
    use crate::cleanup;
    use crate::runtime::{MockRuntime, RealRuntime};
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    fn create_release_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> = FileOptions::default();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extraction_root() {
        assert_eq!(extraction_root(Path::new("/opt/Fig")), PathBuf::from("/opt"));
        assert_eq!(extraction_root(Path::new("Fig")), PathBuf::from("."));
    }

    #[test]
    fn test_install_archive_round_trip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("fig-2.0.0-linux.zip");
        create_release_zip(
            &archive,
            &[
                ("fig-2.0.0-linux/bin/fig", "fig binary"),
                ("fig-2.0.0-linux/lib/std.fig", "std"),
            ],
        );
        let final_path = dir.path().join("opt").join("Fig");
        let cleanup_ctx = cleanup::new_shared();

        install_archive(
            &RealRuntime,
            &ZipExtractor,
            &archive,
            &final_path,
            cleanup_ctx.clone(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(final_path.join("bin/fig")).unwrap(), "fig binary");
        assert_eq!(fs::read_to_string(final_path.join("lib/std.fig")).unwrap(), "std");
        assert!(!archive.exists());
        assert!(!dir.path().join("opt").join("fig-2.0.0-linux").exists());
        assert!(cleanup_ctx.lock().unwrap().leftovers().is_empty());
    }

    #[test]
    fn test_install_archive_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("fig-2.0.0-linux.zip");
        create_release_zip(&archive, &[("fig-2.0.0-linux/bin/fig", "new")]);
        let final_path = dir.path().join("Fig");
        fs::create_dir(&final_path).unwrap();
        fs::write(final_path.join("old"), "old install").unwrap();

        let err = install_archive(
            &RealRuntime,
            &ZipExtractor,
            &archive,
            &final_path,
            cleanup::new_shared(),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::AlreadyInstalled { ref path } if path == &final_path));
        // Nothing was touched
        assert!(archive.exists());
        assert_eq!(fs::read_to_string(final_path.join("old")).unwrap(), "old install");
        assert!(!dir.path().join("fig-2.0.0-linux").exists());
    }

    #[test]
    fn test_install_archive_without_expected_top_level_dir() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("fig-2.0.0-linux.zip");
        create_release_zip(&archive, &[("something-else/bin/fig", "bin")]);
        let final_path = dir.path().join("Fig");

        let err = install_archive(
            &RealRuntime,
            &ZipExtractor,
            &archive,
            &final_path,
            cleanup::new_shared(),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::ArchiveFailure { .. }));
        assert!(!final_path.exists());
        // The archive is kept for manual inspection
        assert!(archive.exists());
    }

    #[test]
    fn test_install_archive_corrupt_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("fig-2.0.0-linux.zip");
        fs::write(&archive, "not a zip").unwrap();
        let final_path = dir.path().join("Fig");

        let err = install_archive(
            &RealRuntime,
            &ZipExtractor,
            &archive,
            &final_path,
            cleanup::new_shared(),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::ArchiveFailure { .. }));
        assert!(!final_path.exists());
    }

    #[test]
    fn test_install_archive_refuses_existing_extraction_dir() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("fig-2.0.0-linux.zip");
        create_release_zip(&archive, &[("fig-2.0.0-linux/bin/fig", "bin")]);
        let leftover = dir.path().join("fig-2.0.0-linux");
        fs::create_dir(&leftover).unwrap();

        let err = install_archive(
            &RealRuntime,
            &ZipExtractor,
            &archive,
            &dir.path().join("Fig"),
            cleanup::new_shared(),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::ArchiveFailure { .. }));
        // The pre-existing directory is not ours to delete
        assert!(leftover.exists());
    }

    /// Runs an install whose final rename fails. `cleanup_fails` makes removing
    /// the extracted tree fail as well.
    fn install_with_failing_rename(cleanup_fails: bool) -> InstallError {
        let archive = Path::new("fig-1.0.0-linux.zip");
        let final_path = Path::new("/opt/Fig");
        let extracted = PathBuf::from("/opt/fig-1.0.0-linux");

        // The extracted directory only shows up once the extractor ran
        let extracted_exists = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        let mut runtime = MockRuntime::new();
        let final_clone = final_path.to_path_buf();
        let flag = extracted_exists.clone();
        runtime.expect_exists().returning(move |p| {
            p != final_clone.as_path() && flag.load(std::sync::atomic::Ordering::SeqCst)
        });
        runtime
            .expect_create_dir_all()
            .with(mockall::predicate::eq(PathBuf::from("/opt")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_is_dir()
            .with(mockall::predicate::eq(extracted.clone()))
            .returning(|_| true);
        runtime
            .expect_rename()
            .times(1)
            .returning(|_, _| Err(anyhow!("Permission denied")));
        runtime
            .expect_remove_dir_all()
            .with(mockall::predicate::eq(extracted.clone()))
            .times(1)
            .returning(move |_| {
                if cleanup_fails {
                    Err(anyhow!("Device or resource busy"))
                } else {
                    Ok(())
                }
            });

        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_can_handle().returning(|_| true);
        extractor
            .expect_extract::<MockRuntime>()
            .times(1)
            .returning(move |_, _, _| {
                extracted_exists.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(1)
            });

        let cleanup_ctx = cleanup::new_shared();
        let err = install_archive(&runtime, &extractor, archive, final_path, cleanup_ctx.clone())
            .unwrap_err();
        assert!(cleanup_ctx.lock().unwrap().leftovers().is_empty());
        err
    }

    #[test]
    fn test_install_archive_rename_failure_cleans_extracted_dir() {
        match install_with_failing_rename(false) {
            InstallError::IoFailure { message } => assert!(message.contains("Permission denied")),
            other => panic!("expected IoFailure, got {:?}", other),
        }
    }

    #[test_log::test]
    fn test_install_archive_cleanup_failure_keeps_original_error() {
        // The failed removal is only logged; the rename error is what surfaces
        match install_with_failing_rename(true) {
            InstallError::IoFailure { message } => {
                assert!(message.contains("Permission denied"));
                assert!(!message.contains("busy"));
            }
            other => panic!("expected IoFailure, got {:?}", other),
        }
    }
}
