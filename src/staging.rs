//! The scratch area downloaded bundles unpack into.
//!
//! Release ZIPs unpack under a fixed staging root (by default
//! `$TMPDIR/plasticupdater`) before their subtrees are committed into the
//! live layout. The area is recreated on demand and its bundle subtrees are
//! removed after every attempt, successful or not, so a failed run never
//! leaves half-unpacked trees behind for the next one to trip over.
//!
//! Cleanup is strictly best-effort: a subtree that cannot be removed is
//! logged and otherwise ignored, and never changes the outcome of a run.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::utils::fs::{ensure_dir, remove_dir_all};

/// Handle to the staging directory and its well-known subtrees.
///
/// The unpacked client bundle lands in [`client_dir`](Self::client_dir) and
/// the server bundle in [`server_dir`](Self::server_dir), matching the
/// top-level directory each ZIP carries.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Creates a handle rooted at `root`. Nothing is created on disk yet.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The staging root bundles unpack into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the staging root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<&Path> {
        ensure_dir(&self.root)?;
        Ok(&self.root)
    }

    /// Where the client bundle's subtree lands after unpacking.
    #[must_use]
    pub fn client_dir(&self) -> PathBuf {
        self.root.join("client")
    }

    /// Where the server bundle's subtree lands after unpacking.
    #[must_use]
    pub fn server_dir(&self) -> PathBuf {
        self.root.join("server")
    }

    /// Removes both bundle subtrees, ignoring failures.
    ///
    /// Runs after every install attempt. The staging root itself is left in
    /// place; only the unpacked bundle trees are dropped.
    pub fn cleanup(&self) {
        for dir in [self.client_dir(), self.server_dir()] {
            if let Err(e) = remove_dir_all(&dir) {
                tracing::warn!("failed to clean staging dir {}: {e:#}", dir.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_root_creates_directory() {
        let temp = TempDir::new().unwrap();
        let staging = StagingArea::new(temp.path().join("plasticupdater"));

        assert!(!staging.root().exists());
        staging.ensure_root().unwrap();
        assert!(staging.root().is_dir());

        // Idempotent
        staging.ensure_root().unwrap();
    }

    #[test]
    fn test_subtree_paths_hang_off_root() {
        let staging = StagingArea::new(PathBuf::from("/tmp/plasticupdater"));
        assert_eq!(staging.client_dir(), PathBuf::from("/tmp/plasticupdater/client"));
        assert_eq!(staging.server_dir(), PathBuf::from("/tmp/plasticupdater/server"));
    }

    #[test]
    fn test_cleanup_removes_bundle_subtrees_only() {
        let temp = TempDir::new().unwrap();
        let staging = StagingArea::new(temp.path().to_path_buf());

        fs::create_dir_all(staging.client_dir().join("scripts")).unwrap();
        fs::create_dir_all(staging.server_dir()).unwrap();
        fs::write(staging.root().join("unrelated.txt"), "keep").unwrap();

        staging.cleanup();

        assert!(!staging.client_dir().exists());
        assert!(!staging.server_dir().exists());
        assert!(staging.root().join("unrelated.txt").exists());
    }

    #[test]
    fn test_cleanup_with_nothing_staged_is_silent() {
        let temp = TempDir::new().unwrap();
        let staging = StagingArea::new(temp.path().join("never-created"));
        staging.cleanup();
    }
}
