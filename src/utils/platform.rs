//! Platform helpers for privilege checks, permissions, and symlinks
//!
//! The installer targets Linux: it writes under `/opt`, marks launchers
//! executable, and links them into the system binary directory. This module
//! isolates the Unix-specific pieces so the rest of the crate stays free of
//! `cfg` noise. Non-Unix builds compile but report the operations as
//! unsupported.

use anyhow::{Context, Result};
use std::path::Path;

/// Returns whether the process is running with an effective UID of root.
///
/// The live layout lives under system directories, so installs targeting the
/// default paths refuse to start without this.
#[cfg(unix)]
#[must_use]
pub fn is_effective_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

/// Non-Unix builds never have root semantics.
#[cfg(not(unix))]
#[must_use]
pub fn is_effective_root() -> bool {
    false
}

/// Adds the executable bits to a file's existing permissions.
///
/// Sets `mode | 0o111`, preserving whatever read/write bits the file already
/// carries. Launchers extracted from ZIP bundles arrive without executable
/// bits, so the layout step applies this after relocating them.
///
/// # Examples
///
/// ```rust
/// # #[cfg(unix)] {
/// use plasticup::utils::platform::set_executable;
/// use std::os::unix::fs::PermissionsExt;
/// use tempfile::tempdir;
///
/// # fn example() -> anyhow::Result<()> {
/// let temp = tempdir()?;
/// let launcher = temp.path().join("cm");
/// std::fs::write(&launcher, "#!/bin/sh\n")?;
///
/// set_executable(&launcher)?;
///
/// let mode = std::fs::metadata(&launcher)?.permissions().mode();
/// assert_eq!(mode & 0o111, 0o111);
/// # Ok(())
/// # }
/// # }
/// ```
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read permissions of {}", path.display()))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions)
        .with_context(|| format!("Failed to mark {} executable", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn set_executable(path: &Path) -> Result<()> {
    anyhow::bail!(
        "marking {} executable is only supported on Unix",
        path.display()
    )
}

/// Creates a symlink at `link` pointing to `original`, replacing any
/// existing link at that path.
///
/// A stale link from a previous installation is removed first. A regular
/// file at the link path is not removed; the symlink call fails instead.
#[cfg(unix)]
pub fn replace_symlink(original: &Path, link: &Path) -> Result<()> {
    if let Ok(metadata) = std::fs::symlink_metadata(link)
        && metadata.file_type().is_symlink()
    {
        std::fs::remove_file(link)
            .with_context(|| format!("Failed to remove existing link {}", link.display()))?;
    }

    std::os::unix::fs::symlink(original, link).with_context(|| {
        format!(
            "Failed to link {} to {}",
            link.display(),
            original.display()
        )
    })?;
    Ok(())
}

#[cfg(not(unix))]
pub fn replace_symlink(original: &Path, link: &Path) -> Result<()> {
    let _ = original;
    anyhow::bail!(
        "creating the launcher link {} is only supported on Unix",
        link.display()
    )
}
