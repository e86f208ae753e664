//! Relocation of unpacked bundle trees into the live installation layout.
//!
//! Bundles unpack into the staging area first; nothing under the base
//! directory is touched until an archive has been fully downloaded and
//! extracted. The [`LayoutWriter`] then commits a staged tree in one pass:
//!
//! - The client tree moves to `<base>/client`, its bundled `theme` directory
//!   is hoisted to `<base>/theme`, and any `*.conf` files under
//!   `client/scripts` are adopted into the client root.
//! - Each launcher in [`LAUNCHERS`] moves from `client/scripts` into the
//!   client root, is marked executable, and gets a symlink in the system
//!   binary directory. The runtime setup launcher additionally has its
//!   install-dir placeholder substituted with the real runtime path.
//! - The bundled git library moves into the runtime's `lib` directory, and
//!   the emptied `scripts` directory is dropped.
//! - The server tree moves to `<base>/server`.
//!
//! Entries the bundle is expected to carry are checked before each move;
//! a missing one surfaces as [`InstallerError::Layout`] naming the path.
//! Placeholder substitution is the one non-fatal step: a failure there is
//! logged and the launcher keeps its placeholder.

use anyhow::Result;
use std::path::Path;

use crate::config::InstallConfig;
use crate::constants::{
    CLIENT_GIT_LIBRARY, LAUNCHERS, RUNTIME_DIR_TOKEN, RUNTIME_SETUP_LAUNCHER,
};
use crate::core::InstallerError;
use crate::utils::fs::{ensure_dir, move_entry, remove_dir_all};
use crate::utils::platform::{replace_symlink, set_executable};

/// Commits staged bundle trees into the layout described by an
/// [`InstallConfig`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutWriter<'a> {
    config: &'a InstallConfig,
}

impl<'a> LayoutWriter<'a> {
    /// Creates a writer targeting `config`'s directories.
    #[must_use]
    pub const fn new(config: &'a InstallConfig) -> Self {
        Self { config }
    }

    /// Moves a staged client tree into place and wires up its launchers.
    ///
    /// `staged` is the `client` directory the bundle unpacked into. On
    /// success the staged tree no longer exists; on failure the layout may
    /// hold a partial client and the caller reports the attempt as failed.
    pub fn commit_client(&self, staged: &Path) -> Result<()> {
        let client_dir = self.config.client_dir();
        if !staged.is_dir() {
            return Err(layout_error(staged, "client tree missing after unpacking").into());
        }
        move_entry(staged, &client_dir)?;

        let theme = client_dir.join("theme");
        if !theme.is_dir() {
            return Err(layout_error(&theme, "client bundle carries no theme").into());
        }
        move_entry(&theme, &self.config.base_dir.join("theme"))?;

        let scripts = client_dir.join("scripts");
        if !scripts.is_dir() {
            return Err(layout_error(&scripts, "client bundle carries no scripts").into());
        }
        self.adopt_config_files(&scripts, &client_dir)?;

        ensure_dir(&self.config.bin_dir)?;
        for &name in LAUNCHERS {
            self.install_launcher(&scripts, &client_dir, name)?;
        }

        let library = client_dir.join("gitlibs").join(CLIENT_GIT_LIBRARY);
        if !library.is_file() {
            return Err(layout_error(&library, "client bundle carries no git library").into());
        }
        let library_dest = self.config.runtime_dir().join("lib").join(CLIENT_GIT_LIBRARY);
        move_entry(&library, &library_dest)?;

        if let Err(e) = remove_dir_all(&scripts) {
            tracing::debug!("leaving scripts directory behind: {e:#}");
        }
        Ok(())
    }

    /// Moves a staged server tree to its place under the base directory.
    pub fn commit_server(&self, staged: &Path) -> Result<()> {
        if !staged.is_dir() {
            return Err(layout_error(staged, "server tree missing after unpacking").into());
        }
        move_entry(staged, &self.config.server_dir())?;
        // TODO: relocate the server control scripts and register the daemon
        Ok(())
    }

    /// Adopts `*.conf` files shipped under `scripts` into the client root.
    fn adopt_config_files(&self, scripts: &Path, client_dir: &Path) -> Result<()> {
        for entry in std::fs::read_dir(scripts)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "conf") {
                move_entry(&path, &client_dir.join(entry.file_name()))?;
            }
        }
        Ok(())
    }

    /// Hoists one launcher out of `scripts`, marks it executable, and links
    /// it from the system binary directory.
    fn install_launcher(&self, scripts: &Path, client_dir: &Path, name: &str) -> Result<()> {
        let script = scripts.join(name);
        if !script.is_file() {
            return Err(layout_error(&script, "launcher missing from client scripts").into());
        }
        let dest = client_dir.join(name);
        move_entry(&script, &dest)?;
        set_executable(&dest)?;
        replace_symlink(&dest, &self.config.bin_dir.join(name))?;

        if name == RUNTIME_SETUP_LAUNCHER
            && let Err(e) = self.patch_runtime_dir(&dest)
        {
            tracing::warn!("{e}");
        }
        Ok(())
    }

    /// Substitutes the runtime install-dir placeholder inside a launcher.
    fn patch_runtime_dir(&self, launcher: &Path) -> Result<(), InstallerError> {
        let patch_error = |e: std::io::Error| InstallerError::Patch {
            path: launcher.display().to_string(),
            reason: e.to_string(),
        };
        let contents = std::fs::read_to_string(launcher).map_err(patch_error)?;
        let runtime_dir = self.config.runtime_dir();
        let patched = contents.replace(RUNTIME_DIR_TOKEN, &runtime_dir.to_string_lossy());
        std::fs::write(launcher, patched).map_err(patch_error)?;
        Ok(())
    }
}

fn layout_error(path: &Path, reason: &str) -> InstallerError {
    InstallerError::Layout {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
