//! Asset selection module
//!
//! This module decides which file of a release to download for the
//! detected platform.

mod picker;

pub use picker::{ARCHIVE_EXTENSION, AssetPicker, ZipAssetPicker, resolve_asset};
