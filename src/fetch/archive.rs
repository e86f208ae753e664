//! Unpacking downloaded release archives.
//!
//! Release bundles arrive as ZIP files; the bundled runtime ships as a
//! gzip-compressed tarball. Both unpack into a destination directory,
//! creating it if needed. Unix permission bits recorded in the archives are
//! applied to the unpacked entries.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

use crate::utils::fs::ensure_dir;

/// Unpacks a ZIP archive held in memory into `dest_dir`.
pub(crate) fn extract_zip(bytes: &[u8], dest_dir: &Path) -> Result<()> {
    ensure_dir(dest_dir)?;
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("invalid ZIP archive")?;
    archive
        .extract(dest_dir)
        .with_context(|| format!("failed to unpack ZIP into {}", dest_dir.display()))?;
    Ok(())
}

/// Unpacks a gzip-compressed tarball held in memory into `dest_dir`.
pub(crate) fn extract_tar_gz(bytes: &[u8], dest_dir: &Path) -> Result<()> {
    ensure_dir(dest_dir)?;
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    archive
        .unpack(dest_dir)
        .with_context(|| format!("failed to unpack tarball into {}", dest_dir.display()))?;
    Ok(())
}
