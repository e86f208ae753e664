//! Filesystem and terminal helpers
//!
//! This module provides the utility functions the installer is built on: safe
//! directory manipulation, entry relocation across filesystems, Unix
//! permission and symlink handling, and progress bars for downloads.
//!
//! # Modules
//!
//! - [`fs`] - Directory creation, recursive copies, and cross-device moves
//! - [`platform`] - Privilege checks, executable bits, and symlinks
//! - [`progress`] - Progress bars and spinners for long-running operations
//!
//! # Example
//!
//! ```rust,no_run
//! use plasticup::utils::{ensure_dir, move_entry, ProgressBar};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! // Ensure the install root exists
//! ensure_dir(Path::new("/opt/plasticscm5"))?;
//!
//! // Relocate a staged subtree into the live layout
//! move_entry(Path::new("/tmp/plasticupdater/client"), Path::new("/opt/plasticscm5/client"))?;
//!
//! // Show progress
//! let progress = ProgressBar::new_download(1024 * 1024);
//! progress.set_message("Downloading...");
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{copy_dir, ensure_dir, move_entry, remove_dir_all};
pub use platform::{is_effective_root, replace_symlink, set_executable};
pub use progress::{disable_progress, ProgressBar, ProgressStyle};
