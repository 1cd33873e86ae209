//! Leftovers to remove when the installer is interrupted.
//!
//! The download registers the archive it is writing and the installer registers
//! the tree it is unpacking. The Ctrl-C task removes whatever is still
//! registered, newest first, before exiting.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Something half-written on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leftover {
    /// Archive still being streamed from the forge
    PartialDownload(PathBuf),
    /// Directory the archive is being unpacked into
    ExtractedTree(PathBuf),
}

impl Leftover {
    pub fn path(&self) -> &Path {
        match self {
            Leftover::PartialDownload(path) | Leftover::ExtractedTree(path) => path,
        }
    }

    fn remove(&self) -> std::io::Result<()> {
        match self {
            Leftover::PartialDownload(path) => std::fs::remove_file(path),
            Leftover::ExtractedTree(path) => std::fs::remove_dir_all(path),
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupContext {
    leftovers: Vec<Leftover>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leftovers(&self) -> &[Leftover] {
        &self.leftovers
    }

    pub fn add(&mut self, leftover: Leftover) {
        self.leftovers.push(leftover);
    }

    /// Forget `path` once it was committed or removed by its owner
    pub fn remove(&mut self, path: &Path) {
        self.leftovers.retain(|l| l.path() != path);
    }

    /// Remove every registered leftover, newest first. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;
        for leftover in self.leftovers.iter().rev() {
            if !leftover.path().exists() {
                continue;
            }
            debug!("Cleaning up {:?}", leftover);
            match leftover.remove() {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove {:?}: {}", leftover.path(), e),
            }
        }
        removed
    }
}

pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

/// Keeps a [`Leftover`] registered until [`CleanupGuard::release`] is called.
///
/// Dropping the guard without releasing leaves the entry registered, so an
/// interrupt arriving later still removes it.
pub struct CleanupGuard {
    ctx: SharedCleanupContext,
    path: PathBuf,
}

impl CleanupGuard {
    pub fn new(ctx: SharedCleanupContext, leftover: Leftover) -> Self {
        let path = leftover.path().to_path_buf();
        if let Ok(mut guard) = ctx.lock() {
            guard.add(leftover);
        }
        Self { ctx, path }
    }

    pub fn release(self) {
        if let Ok(mut guard) = self.ctx.lock() {
            guard.remove(&self.path);
        }
    }
}
