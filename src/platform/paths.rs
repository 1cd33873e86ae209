use std::path::PathBuf;

use super::Platform;
use crate::error::InstallError;

/// Conventional install directory for a platform.
///
/// The result is only a suggestion shown at the install-path prompt; the
/// operator may override it with any path.
pub fn default_install_path(platform: &Platform) -> Result<PathBuf, InstallError> {
    match platform {
        Platform::Windows => Ok(PathBuf::from(r"C:\Program Files\Fig")),
        Platform::Linux => Ok(PathBuf::from("/opt/Fig")),
        Platform::Darwin | Platform::Other(_) => Err(InstallError::UnsupportedPlatform {
            platform: platform.to_string(),
        }),
    }
}
