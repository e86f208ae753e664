//! Run configuration for install and upgrade operations
//!
//! This module defines [`InstallConfig`], the resolved settings a run
//! operates under: where the live layout lives, where launchers are linked,
//! where bundles are staged, and which vendor endpoints are used. The CLI
//! builds one from flags and environment variables; tests build one pointing
//! at temporary directories.
//!
//! All derived paths and bundle URIs are computed here so the rest of the
//! crate never assembles them by hand.
//!
//! # Examples
//!
//! ```rust
//! use plasticup::config::{Channel, InstallConfig};
//!
//! let config = InstallConfig::default();
//! assert_eq!(config.base_dir.to_str(), Some("/opt/plasticscm5"));
//! assert_eq!(config.channel, Channel::Stable);
//! assert!(config.needs_root());
//! ```

use crate::constants::{
    DEFAULT_BASE_DIR, DEFAULT_DOWNLOAD_URL, DEFAULT_RUNTIME_URL, DEFAULT_SYSTEM_BIN_DIR,
    LABS_PATH, STAGING_DIR_NAME,
};
use crate::version::Version;
use std::path::{Path, PathBuf};

/// Release channel the latest version is read from.
///
/// The channel selects which vendor page is scraped for the version token.
/// Bundle URIs are always formed from the base download URL; labs builds are
/// published under the same installer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// The regular release feed
    #[default]
    Stable,
    /// The labs (preview) release feed
    Labs,
}

/// Which half of a release to download.
///
/// Each release ships as two ZIP bundles with the same URI shape, differing
/// only in the trailing slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    /// The client tools bundle
    Client,
    /// The server bundle
    Server,
}

impl BundleKind {
    /// The URI slug naming this bundle on the download endpoint.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Client => "clientzip",
            Self::Server => "serverzip",
        }
    }
}

/// Resolved settings for a single install/upgrade run.
///
/// Every path the run touches and every URI it fetches derives from this
/// struct. The defaults describe a system-wide installation; tests and
/// sandboxed runs override the directories to stay inside a temp root.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Release channel to read the latest version from
    pub channel: Channel,
    /// Leave an existing installation untouched when it is out of date
    pub no_upgrade: bool,
    /// Root of the live installation layout
    pub base_dir: PathBuf,
    /// Directory launcher symlinks are created in
    pub bin_dir: PathBuf,
    /// Directory downloaded bundles are staged and unpacked in
    pub staging_dir: PathBuf,
    /// Base URL of the vendor download site
    pub download_url: String,
    /// URL of the bundled runtime tarball
    pub runtime_url: String,
    /// Refresh certificate trust stores after the runtime lands
    pub refresh_trust: bool,
    /// Suppress step-by-step console narration
    pub quiet: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            no_upgrade: false,
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            bin_dir: PathBuf::from(DEFAULT_SYSTEM_BIN_DIR),
            staging_dir: std::env::temp_dir().join(STAGING_DIR_NAME),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            runtime_url: DEFAULT_RUNTIME_URL.to_string(),
            refresh_trust: true,
            quiet: false,
        }
    }
}

impl InstallConfig {
    /// The page scraped for the latest published version.
    ///
    /// Stable reads the download page itself; labs reads the labs page
    /// underneath it.
    #[must_use]
    pub fn version_page_url(&self) -> String {
        match self.channel {
            Channel::Stable => self.download_url.clone(),
            Channel::Labs => format!("{}/{}", self.download_url, LABS_PATH),
        }
    }

    /// The URI of a release bundle for `version`.
    #[must_use]
    pub fn bundle_url(&self, version: &Version, kind: BundleKind) -> String {
        format!(
            "{}/downloadinstaller/{}/plasticscm/linux/{}?Flags=None",
            self.download_url,
            version,
            kind.slug()
        )
    }

    /// The client subtree of the live layout.
    #[must_use]
    pub fn client_dir(&self) -> PathBuf {
        self.base_dir.join("client")
    }

    /// The server subtree of the live layout.
    #[must_use]
    pub fn server_dir(&self) -> PathBuf {
        self.base_dir.join("server")
    }

    /// The bundled runtime subtree of the live layout.
    #[must_use]
    pub fn runtime_dir(&self) -> PathBuf {
        self.base_dir.join("mono")
    }

    /// The installed entry-point binary probed for the current version.
    #[must_use]
    pub fn probe_binary(&self) -> PathBuf {
        self.client_dir().join("cm")
    }

    /// Whether this run must be root to proceed.
    ///
    /// True when any target directory is one of the system defaults. Runs
    /// redirected entirely into user-writable directories skip the
    /// privilege gate.
    #[must_use]
    pub fn needs_root(&self) -> bool {
        self.base_dir == Path::new(DEFAULT_BASE_DIR)
            || self.bin_dir == Path::new(DEFAULT_SYSTEM_BIN_DIR)
    }
}
