//! Install and upgrade orchestration.
//!
//! One [`Installer`] run walks a small state machine:
//!
//! 1. **Privilege gate**: when the configuration targets the system
//!    directories, the run aborts immediately without elevated privileges.
//! 2. **Version discovery**: the vendor downloads page is scraped for the
//!    latest published version. An unreachable or unparsable page aborts the
//!    run before anything is touched.
//! 3. **Probe**: the installed client reports its own version, or its
//!    absence selects the first-install path.
//! 4. **Decision**: matching versions finish as up to date; a newer version
//!    on an installed host either upgrades (reserved, currently refused) or
//!    is skipped under `--no-upgrade`; a missing installation always takes
//!    the first install, `--no-upgrade` notwithstanding.
//!
//! A first install downloads everything before committing anything: the
//! runtime tarball unpacks straight into the base directory, both bundle
//! ZIPs unpack into the staging area, and only then are the client and
//! server trees committed into the live layout. The runtime must land
//! first since the client commit relocates a library into it.
//!
//! Failures during the install are reported, not rolled back; already
//! committed steps stay on disk. The staging subtrees are cleaned up after
//! every attempt, whichever way it ended.
//!
//! The decision half (steps 1-4) is available separately as [`plan`]
//! (`Installer::plan`) so a dry run can report what would happen without
//! mutating the host.

use anyhow::Result;

use crate::config::{BundleKind, InstallConfig};
use crate::core::InstallerError;
use crate::fetch::Fetcher;
use crate::layout::LayoutWriter;
use crate::staging::StagingArea;
use crate::trust::refresh_system_trust;
use crate::utils::fs::{ensure_dir, remove_dir_all};
use crate::utils::platform::is_effective_root;
use crate::version::{extract_first_version, InstallState, Version, VersionProbe};

/// What a run decided to do, before any of it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// The installed version matches the latest published one.
    UpToDate {
        /// The version both sides agree on
        version: Version,
    },
    /// No installation found; everything will be installed fresh.
    FirstInstall {
        /// The version that will be installed
        latest: Version,
    },
    /// A newer version exists but upgrading is suppressed.
    SkippedUpgrade {
        /// The version currently installed
        installed: Version,
        /// The newer published version
        latest: Version,
    },
    /// A newer version exists and an upgrade would run.
    Upgrade {
        /// The version currently installed
        installed: Version,
        /// The newer published version
        latest: Version,
    },
}

/// Terminal state of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; the host already runs the latest version.
    UpToDate,
    /// A newer version was detected but left alone per configuration.
    SkippedUpgrade,
    /// A first install finished.
    Complete {
        /// The version now installed
        version: Version,
    },
}

/// Drives one install/upgrade run against a fixed configuration.
///
/// The fetcher and probe are injected so the whole pipeline can run against
/// canned pages and scripted hosts in tests.
pub struct Installer<F, P> {
    config: InstallConfig,
    fetcher: F,
    probe: P,
}

impl<F: Fetcher, P: VersionProbe> Installer<F, P> {
    /// Creates an installer over `config` using the given fetcher and probe.
    pub const fn new(config: InstallConfig, fetcher: F, probe: P) -> Self {
        Self {
            config,
            fetcher,
            probe,
        }
    }

    /// The configuration this installer operates on.
    pub const fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Decides what a run would do without mutating the host.
    ///
    /// Performs the version-page fetch and the installed-version probe, both
    /// read-only, and maps the pair onto a [`Plan`].
    pub async fn plan(&self) -> Result<Plan> {
        let latest = self.latest_version().await?;
        let state = self.probe.installed_state().await?;

        Ok(match state {
            InstallState::NotInstalled => Plan::FirstInstall { latest },
            InstallState::Installed(installed) if installed == latest => {
                Plan::UpToDate { version: latest }
            }
            InstallState::Installed(installed) => {
                if self.config.no_upgrade {
                    Plan::SkippedUpgrade { installed, latest }
                } else {
                    Plan::Upgrade { installed, latest }
                }
            }
        })
    }

    /// Runs the full state machine to a terminal state.
    ///
    /// Errors carry an [`InstallerError`] describing which gate or install
    /// step failed; the staging area is cleaned up on every path that
    /// reached it.
    pub async fn run(&self) -> Result<Outcome> {
        if self.config.needs_root() && !is_effective_root() {
            return Err(InstallerError::PermissionDenied.into());
        }

        match self.plan().await? {
            Plan::UpToDate { .. } => {
                self.say("Already up to date.");
                Ok(Outcome::UpToDate)
            }
            Plan::SkippedUpgrade { latest, .. } => {
                self.say(format!("Skipping upgrade to version {latest}."));
                Ok(Outcome::SkippedUpgrade)
            }
            Plan::FirstInstall { latest } => self.first_install(&latest).await,
            Plan::Upgrade { .. } => Err(InstallerError::UpgradeUnimplemented.into()),
        }
    }

    /// Prints one narration line, unless the run is quiet.
    fn say(&self, line: impl std::fmt::Display) {
        if !self.config.quiet {
            println!("{line}");
        }
    }

    /// Scrapes the vendor page for the latest published version.
    ///
    /// Fetch and parse failures both collapse into
    /// [`InstallerError::VersionUnknown`]; there is nothing sensible to
    /// install without a version token.
    async fn latest_version(&self) -> Result<Version> {
        let url = self.config.version_page_url();
        let page = match self.fetcher.fetch_text(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("unable to open the downloads page: {e}");
                return Err(InstallerError::VersionUnknown.into());
            }
        };

        match extract_first_version(&page) {
            Some(version) => {
                tracing::debug!("latest published version is {version}");
                Ok(version)
            }
            None => {
                tracing::warn!("downloads page at {url} carries no version token");
                Err(InstallerError::VersionUnknown.into())
            }
        }
    }

    async fn first_install(&self, latest: &Version) -> Result<Outcome> {
        self.say("Installing Plastic SCM for the first time!");
        self.say(format!("Version: {latest}"));
        ensure_dir(&self.config.base_dir)?;

        let staging = StagingArea::new(self.config.staging_dir.clone());
        let result = self.install_bundles(latest, &staging).await;
        staging.cleanup();
        result?;

        self.say("All done!");
        Ok(Outcome::Complete {
            version: latest.clone(),
        })
    }

    /// Downloads the runtime and both bundles, then commits the bundles.
    ///
    /// Nothing under the base directory is written from a bundle until both
    /// ZIPs have unpacked cleanly into staging.
    async fn install_bundles(&self, version: &Version, staging: &StagingArea) -> Result<()> {
        self.install_runtime().await?;

        let staging_root = staging.ensure_root()?;
        let client_url = self.config.bundle_url(version, BundleKind::Client);
        self.say(format!("Downloading '{client_url}'..."));
        self.fetcher.fetch_zip(&client_url, staging_root).await?;

        let server_url = self.config.bundle_url(version, BundleKind::Server);
        self.say(format!("Downloading '{server_url}'..."));
        self.fetcher.fetch_zip(&server_url, staging_root).await?;

        let writer = LayoutWriter::new(&self.config);
        self.say("Installing client...");
        writer.commit_client(&staging.client_dir())?;
        self.say("Installing server...");
        writer.commit_server(&staging.server_dir())?;
        Ok(())
    }

    /// Unpacks the runtime tarball into the base directory and refreshes
    /// certificate trust through it.
    ///
    /// A failed unpack drops whatever partial runtime landed; later steps
    /// relocate files into the runtime tree and must not find a torso.
    async fn install_runtime(&self) -> Result<()> {
        let url = &self.config.runtime_url;
        self.say(format!("Downloading mono from '{url}'..."));

        if let Err(e) = self.fetcher.fetch_tar_gz(url, &self.config.base_dir).await {
            let runtime_dir = self.config.runtime_dir();
            if let Err(cleanup) = remove_dir_all(&runtime_dir) {
                tracing::warn!(
                    "failed to drop partial runtime at {}: {cleanup:#}",
                    runtime_dir.display()
                );
            }
            return Err(e.into());
        }

        if self.config.refresh_trust {
            refresh_system_trust(&self.config).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{
        version_page, write_runtime_tree, write_staged_client, write_staged_server,
    };
    use crate::test_utils::{FakeProbe, MockFetcher};
    use std::fs;
    use tempfile::TempDir;

    fn temp_config(temp: &TempDir) -> InstallConfig {
        InstallConfig {
            base_dir: temp.path().join("opt/plasticscm5"),
            bin_dir: temp.path().join("usr/bin"),
            staging_dir: temp.path().join("tmp/plasticupdater"),
            refresh_trust: false,
            ..InstallConfig::default()
        }
    }

    fn stub_full_install(fetcher: &MockFetcher, config: &InstallConfig, version: &str) {
        let v = Version::new(version);
        fetcher.stub_page(config.version_page_url(), version_page(version));
        fetcher.stub_archive(&config.runtime_url, write_runtime_tree);
        fetcher.stub_archive(config.bundle_url(&v, BundleKind::Client), |dest| {
            write_staged_client(&dest.join("client"))
        });
        fetcher.stub_archive(config.bundle_url(&v, BundleKind::Server), |dest| {
            write_staged_server(&dest.join("server"))
        });
    }

    #[tokio::test]
    async fn test_first_install_runs_the_expected_sequence() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        stub_full_install(&fetcher, &config, "9.0.16.1234");
        let installer = Installer::new(config.clone(), fetcher.clone(), FakeProbe::not_installed());

        let outcome = installer.run().await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Complete {
                version: Version::new("9.0.16.1234")
            }
        );
        let v = Version::new("9.0.16.1234");
        assert_eq!(
            fetcher.requests(),
            vec![
                config.version_page_url(),
                config.runtime_url.clone(),
                config.bundle_url(&v, BundleKind::Client),
                config.bundle_url(&v, BundleKind::Server),
            ]
        );

        assert!(config.client_dir().is_dir());
        assert!(config.server_dir().is_dir());
        assert!(config.base_dir.join("theme").is_dir());
        assert!(!config.staging_dir.join("client").exists());
        assert!(!config.staging_dir.join("server").exists());
    }

    #[tokio::test]
    async fn test_up_to_date_performs_no_mutations() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        let installer = Installer::new(
            config.clone(),
            fetcher.clone(),
            FakeProbe::installed("9.0.16.1234"),
        );

        let outcome = installer.run().await.unwrap();

        assert_eq!(outcome, Outcome::UpToDate);
        assert_eq!(fetcher.requests(), vec![config.version_page_url()]);
        assert!(!config.base_dir.exists());
        assert!(!config.staging_dir.exists());
    }

    #[tokio::test]
    async fn test_up_to_date_twice_leaves_no_trace() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        let installer = Installer::new(
            config.clone(),
            fetcher.clone(),
            FakeProbe::installed("9.0.16.1234"),
        );

        for _ in 0..2 {
            assert_eq!(installer.run().await.unwrap(), Outcome::UpToDate);
        }
        assert!(!config.base_dir.exists());
        assert!(!config.staging_dir.exists());
    }

    #[tokio::test]
    async fn test_no_upgrade_skips_newer_version_untouched() {
        let temp = TempDir::new().unwrap();
        let mut config = temp_config(&temp);
        config.no_upgrade = true;
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        let installer = Installer::new(
            config.clone(),
            fetcher.clone(),
            FakeProbe::installed("8.0.16.500"),
        );

        let outcome = installer.run().await.unwrap();

        assert_eq!(outcome, Outcome::SkippedUpgrade);
        assert_eq!(fetcher.requests(), vec![config.version_page_url()]);
        assert!(!config.base_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_install_ignores_no_upgrade() {
        let temp = TempDir::new().unwrap();
        let mut config = temp_config(&temp);
        config.no_upgrade = true;
        let fetcher = MockFetcher::new();
        stub_full_install(&fetcher, &config, "9.0.16.1234");
        let installer = Installer::new(config.clone(), fetcher, FakeProbe::not_installed());

        let outcome = installer.run().await.unwrap();

        assert!(matches!(outcome, Outcome::Complete { .. }));
        assert!(config.client_dir().is_dir());
    }

    #[tokio::test]
    async fn test_upgrade_is_refused_for_now() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        let installer = Installer::new(
            config.clone(),
            fetcher.clone(),
            FakeProbe::installed("8.0.16.500"),
        );

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::UpgradeUnimplemented)
        ));
        assert!(!config.base_dir.exists());
    }

    #[tokio::test]
    async fn test_unreachable_page_aborts_before_probing() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_failure(config.version_page_url(), "connection refused");
        let probe = FakeProbe::installed("9.0.16.1234");
        let installer = Installer::new(config.clone(), fetcher, probe.clone());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::VersionUnknown)
        ));
        assert_eq!(probe.probes(), 0);
        assert!(!config.base_dir.exists());
    }

    #[tokio::test]
    async fn test_page_without_version_token_aborts() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), "<html>down for maintenance</html>");
        let installer = Installer::new(config, fetcher, FakeProbe::not_installed());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::VersionUnknown)
        ));
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_the_run() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        let installer = Installer::new(
            config.clone(),
            fetcher,
            FakeProbe::failing("binary reported no version"),
        );

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::ProbeFailed { .. })
        ));
        assert!(!config.base_dir.exists());
    }

    #[tokio::test]
    async fn test_client_fetch_failure_skips_server_fetch() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let v = Version::new("9.0.16.1234");
        let fetcher = MockFetcher::new();
        stub_full_install(&fetcher, &config, "9.0.16.1234");
        fetcher.stub_failure(config.bundle_url(&v, BundleKind::Client), "connection reset");
        let installer = Installer::new(config.clone(), fetcher.clone(), FakeProbe::not_installed());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::Fetch { .. })
        ));
        assert_eq!(
            fetcher.requests(),
            vec![
                config.version_page_url(),
                config.runtime_url.clone(),
                config.bundle_url(&v, BundleKind::Client),
            ]
        );
        assert!(!config.staging_dir.join("client").exists());
        assert!(!config.staging_dir.join("server").exists());
    }

    #[tokio::test]
    async fn test_broken_client_bundle_still_cleans_staging() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let v = Version::new("9.0.16.1234");
        let fetcher = MockFetcher::new();
        stub_full_install(&fetcher, &config, "9.0.16.1234");
        // Client bundle unpacks fine but carries no theme directory
        fetcher.stub_archive(config.bundle_url(&v, BundleKind::Client), |dest| {
            let client = dest.join("client");
            write_staged_client(&client)?;
            fs::remove_dir_all(client.join("theme"))
        });
        let installer = Installer::new(config.clone(), fetcher, FakeProbe::not_installed());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::Layout { .. })
        ));
        assert!(!config.staging_dir.join("client").exists());
        assert!(!config.staging_dir.join("server").exists());
    }

    #[tokio::test]
    async fn test_runtime_fetch_failure_drops_partial_runtime() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        fetcher.stub_page(config.version_page_url(), version_page("9.0.16.1234"));
        fetcher.stub_archive(&config.runtime_url, |dest| {
            fs::create_dir_all(dest.join("mono").join("bin"))?;
            Err(std::io::Error::other("truncated archive"))
        });
        let installer = Installer::new(config.clone(), fetcher.clone(), FakeProbe::not_installed());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::Fetch { .. })
        ));
        assert!(!config.runtime_dir().exists());
        // The bundles were never requested
        assert_eq!(
            fetcher.requests(),
            vec![config.version_page_url(), config.runtime_url.clone()]
        );
    }

    #[tokio::test]
    async fn test_system_paths_require_elevated_privileges() {
        if is_effective_root() {
            // The gate cannot be exercised when the test runs as root
            return;
        }
        let config = InstallConfig::default();
        let fetcher = MockFetcher::new();
        let installer = Installer::new(config, fetcher.clone(), FakeProbe::not_installed());

        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::PermissionDenied)
        ));
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_plan_is_read_only() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let fetcher = MockFetcher::new();
        stub_full_install(&fetcher, &config, "9.0.16.1234");
        let installer = Installer::new(config.clone(), fetcher.clone(), FakeProbe::not_installed());

        let plan = installer.plan().await.unwrap();

        assert_eq!(
            plan,
            Plan::FirstInstall {
                latest: Version::new("9.0.16.1234")
            }
        );
        assert_eq!(fetcher.requests(), vec![config.version_page_url()]);
        assert!(!config.base_dir.exists());
        assert!(!config.staging_dir.exists());
    }
}
