//! File system utilities for installing bundle contents
//!
//! This module provides the directory and relocation primitives used when
//! committing staged bundle subtrees into the live installation layout.
//!
//! # Key Features
//!
//! - **Cross-device moves**: [`move_entry`] falls back to copy-then-delete
//!   when the staging area and the install root live on different filesystems
//! - **Idempotent cleanup**: [`remove_dir_all`] is safe on paths that do not
//!   exist
//! - **Permission preservation**: recursive copies keep Unix mode bits, so
//!   executable bits set during archive extraction survive relocation
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasticup::utils::fs::{ensure_dir, move_entry, remove_dir_all};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! // Create the install root
//! ensure_dir(Path::new("/opt/plasticscm5"))?;
//!
//! // Move a staged subtree into place
//! move_entry(
//!     Path::new("/tmp/plasticupdater/client"),
//!     Path::new("/opt/plasticscm5/client"),
//! )?;
//!
//! // Drop the staging area; no error if it is already gone
//! remove_dir_all(Path::new("/tmp/plasticupdater"))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Arguments
///
/// * `path` - The directory path to create
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
///
/// # Examples
///
/// ```rust
/// use plasticup::utils::fs::ensure_dir;
/// use tempfile::tempdir;
///
/// # fn example() -> anyhow::Result<()> {
/// let temp = tempdir()?;
/// ensure_dir(&temp.path().join("client/theme"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path exists but is not a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Recursively copies a directory and all its contents to a new location.
///
/// Creates the destination directory if it doesn't exist and preserves the
/// directory structure. Regular file copies keep their Unix permission bits,
/// so executables stay executable.
///
/// # Arguments
///
/// * `src` - The source directory to copy from
/// * `dst` - The destination directory to copy to
///
/// # Returns
///
/// - `Ok(())` if the directory was copied successfully
/// - `Err` if the copy operation fails for any file or directory
///
/// # Behavior
///
/// - Creates destination directory if it doesn't exist
/// - Recursively copies all subdirectories
/// - Copies only regular files (skips symlinks and special files)
/// - Overwrites existing files in the destination
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    use walkdir::WalkDir;

    for entry in WalkDir::new(src).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Failed to relativize {}", entry.path().display()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
        // Skip symlinks and other file types
    }

    Ok(())
}

/// Moves a file or directory, falling back to copy-then-delete across
/// filesystems.
///
/// A plain rename fails with `CrossesDevices` when the staging area (usually
/// under `/tmp`) and the install root live on different mounts. In that case
/// the entry is copied recursively and the source removed afterwards.
///
/// # Arguments
///
/// * `src` - The entry to relocate
/// * `dst` - The destination path (parent directories are created as needed)
///
/// # Returns
///
/// - `Ok(())` if the entry now lives at `dst`
/// - `Err` if the rename failed for any other reason, or the fallback copy
///   failed partway
///
/// # Examples
///
/// ```rust
/// use plasticup::utils::fs::move_entry;
/// use tempfile::tempdir;
/// use std::fs;
///
/// # fn example() -> anyhow::Result<()> {
/// let temp = tempdir()?;
/// let src = temp.path().join("cm");
/// fs::write(&src, "#!/bin/sh\n")?;
///
/// move_entry(&src, &temp.path().join("client/cm"))?;
/// assert!(!src.exists());
/// # Ok(())
/// # }
/// ```
pub fn move_entry(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            if src.is_dir() {
                copy_dir(src, dst)?;
                remove_dir_all(src)?;
            } else {
                fs::copy(src, dst).with_context(|| {
                    format!(
                        "Failed to copy {} to {}",
                        src.display(),
                        dst.display()
                    )
                })?;
                fs::remove_file(src)
                    .with_context(|| format!("Failed to remove {}", src.display()))?;
            }
            Ok(())
        }
        Err(e) => Err(e).with_context(|| {
            format!("Failed to move {} to {}", src.display(), dst.display())
        }),
    }
}

/// Recursively removes a directory and all its contents.
///
/// Safe for cleanup operations where the directory may or may not exist:
/// removing a path that is already gone is not an error.
///
/// # Arguments
///
/// * `path` - The directory to remove
///
/// # Returns
///
/// - `Ok(())` if the directory was removed or didn't exist
/// - `Err` if the removal failed due to permissions or other filesystem errors
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}
