use std::ffi::OsStr;
use std::path::Path;

use crate::error::InstallError;
use crate::forge::{Asset, Release};
use crate::platform::Platform;

/// Archive format published for every platform
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Trait for selecting an asset from a list of available assets
pub trait AssetPicker: Send + Sync {
    /// Pick the asset to install from the given list
    ///
    /// Returns `None` if no suitable asset is found
    fn pick<'a>(&self, assets: &'a [Asset]) -> Option<&'a Asset>;
}

/// Picks the first `.zip` asset whose name carries the platform token.
///
/// First match wins: assets are not ranked.
pub struct ZipAssetPicker {
    token: &'static str,
}

impl ZipAssetPicker {
    pub fn new(platform: &Platform) -> Self {
        Self {
            token: platform.token(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        name.contains(self.token) && name.contains(ARCHIVE_EXTENSION)
    }
}

impl AssetPicker for ZipAssetPicker {
    fn pick<'a>(&self, assets: &'a [Asset]) -> Option<&'a Asset> {
        assets.iter().find(|a| self.matches(&a.name))
    }
}

/// Find the archive of `release` built for `platform`.
///
/// On failure the error lists every asset name of the release so the
/// operator can pick one by hand. The asset name becomes the download file
/// name, so anything but a plain file name is refused.
#[tracing::instrument(skip(release), fields(tag = %release.tag_name))]
pub fn resolve_asset<'a>(
    release: &'a Release,
    platform: &Platform,
) -> Result<&'a Asset, InstallError> {
    let asset = ZipAssetPicker::new(platform)
        .pick(&release.assets)
        .ok_or_else(|| InstallError::NoMatchingAsset {
            tag: release.tag_name.clone(),
            platform: platform.token().to_string(),
            candidates: release.assets.iter().map(|a| a.name.clone()).collect(),
        })?;

    if !is_plain_file_name(&asset.name) {
        return Err(InstallError::ArchiveFailure {
            message: format!("asset name {:?} is not a plain file name", asset.name),
        });
    }
    Ok(asset)
}

fn is_plain_file_name(name: &str) -> bool {
    Path::new(name).file_name() == Some(OsStr::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::release;

    #[test]
    fn test_resolve_linux_zip() {
        let r = release(
            "2.0.0",
            &["fig-2.0.0-windows.zip", "fig-2.0.0-linux.zip", "fig-2.0.0-linux.tar.gz"],
        );
        let asset = resolve_asset(&r, &Platform::Linux).unwrap();
        assert_eq!(asset.name, "fig-2.0.0-linux.zip");
        assert_eq!(asset.browser_download_url, "https://example.com/fig-2.0.0-linux.zip");
    }

    #[test]
    fn test_first_match_wins() {
        let r = release(
            "2.0.0",
            &["fig-2.0.0-windows-debug.zip", "fig-2.0.0-windows.zip"],
        );
        let asset = resolve_asset(&r, &Platform::Windows).unwrap();
        assert_eq!(asset.name, "fig-2.0.0-windows-debug.zip");
    }

    #[test]
    fn test_requires_both_token_and_zip() {
        let r = release(
            "2.0.0",
            &["fig-2.0.0-linux.tar.gz", "fig-2.0.0-windows.zip", "checksums.txt"],
        );
        let err = resolve_asset(&r, &Platform::Linux).unwrap_err();
        match err {
            InstallError::NoMatchingAsset {
                tag,
                platform,
                candidates,
            } => {
                assert_eq!(tag, "2.0.0");
                assert_eq!(platform, "linux");
                assert_eq!(
                    candidates,
                    vec!["fig-2.0.0-linux.tar.gz", "fig-2.0.0-windows.zip", "checksums.txt"]
                );
            }
            other => panic!("expected NoMatchingAsset, got {:?}", other),
        }
    }

    #[test]
    fn test_token_match_is_case_sensitive() {
        let r = release("2.0.0", &["Fig-2.0.0-Linux.zip"]);
        assert!(resolve_asset(&r, &Platform::Linux).is_err());
    }

    #[test]
    fn test_release_without_assets() {
        let r = release("2.0.0", &[]);
        let err = resolve_asset(&r, &Platform::Linux).unwrap_err();
        assert!(matches!(err, InstallError::NoMatchingAsset { ref candidates, .. } if candidates.is_empty()));
    }

    #[test]
    fn test_asset_name_with_path_components_is_refused() {
        for name in ["../escaped-linux.zip", "/tmp/fig-linux.zip", "dl/fig-linux.zip"] {
            let r = release("2.0.0", &[name]);
            let err = resolve_asset(&r, &Platform::Linux).unwrap_err();
            assert!(
                matches!(err, InstallError::ArchiveFailure { ref message } if message.contains("not a plain file name")),
                "{} was accepted: {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_picker_trait_object() {
        let picker: Box<dyn AssetPicker> = Box::new(ZipAssetPicker::new(&Platform::Windows));
        let r = release("1.0.0", &["fig-1.0.0-linux.zip", "fig-1.0.0-windows.zip"]);
        assert_eq!(picker.pick(&r.assets).unwrap().name, "fig-1.0.0-windows.zip");
    }
}
