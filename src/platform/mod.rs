//! Platform detection and default install locations
//!
//! This module maps the running OS to a closed [`Platform`] enum, exposes the
//! token forge assets use to name their target OS, and knows where Fig is
//! conventionally installed on each supported platform.

mod detection;
mod paths;

pub use detection::{DefaultPlatformDetector, Platform, PlatformDetector};
pub use paths::default_install_path;

#[cfg(test)]
pub use detection::MockPlatformDetector;
