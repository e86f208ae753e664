//! Probing the host for the installed version.
//!
//! Production code uses [`BinaryProbe`], which asks the installed client
//! binary for its version. The [`VersionProbe`] trait exists so the
//! orchestrator can be driven by scripted fakes in tests without a live
//! installation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

use super::{InstallState, Version};
use crate::constants::PROBE_TIMEOUT;
use crate::core::InstallerError;

/// Reports whether an installation exists on this host and which version it
/// carries.
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Determine the installation state.
    ///
    /// Returns [`InstallState::NotInstalled`] when no installation is
    /// present. Fails only when an installation is present but its version
    /// cannot be read.
    async fn installed_state(&self) -> Result<InstallState, InstallerError>;
}

/// Probe that runs the installed client binary with a `version` argument.
///
/// The probe reports [`InstallState::NotInstalled`] without spawning
/// anything when the live root or the binary is absent. When the binary is
/// present, its standard output is captured as the version token, with
/// trailing whitespace stripped so the token compares equal to the one
/// scraped from the vendor page.
pub struct BinaryProbe {
    /// Root of the live layout; absence means nothing is installed
    base_dir: PathBuf,
    /// The entry-point binary asked for its version
    binary: PathBuf,
}

impl BinaryProbe {
    /// Creates a probe for the given live root and entry-point binary.
    #[must_use]
    pub const fn new(base_dir: PathBuf, binary: PathBuf) -> Self {
        Self { base_dir, binary }
    }
}

#[async_trait]
impl VersionProbe for BinaryProbe {
    async fn installed_state(&self) -> Result<InstallState, InstallerError> {
        if !self.base_dir.is_dir() || !self.binary.exists() {
            tracing::debug!(
                "no installation at {}, treating host as fresh",
                self.base_dir.display()
            );
            return Ok(InstallState::NotInstalled);
        }

        tracing::debug!("probing installed version via {} version", self.binary.display());

        let output_future = Command::new(&self.binary)
            .arg("version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = match timeout(PROBE_TIMEOUT, output_future).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(InstallerError::ProbeFailed {
                    reason: format!("failed to run {}: {e}", self.binary.display()),
                });
            }
            Err(_) => {
                return Err(InstallerError::ProbeFailed {
                    reason: format!(
                        "{} did not report a version within {} seconds",
                        self.binary.display(),
                        PROBE_TIMEOUT.as_secs()
                    ),
                });
            }
        };

        if !output.status.success() {
            return Err(InstallerError::ProbeFailed {
                reason: format!("{} exited with {}", self.binary.display(), output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = stdout.trim_end();
        tracing::debug!("installed version reported as {token:?}");
        Ok(InstallState::Installed(Version::new(token)))
    }
}
