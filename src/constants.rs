//! Global constants used throughout the plasticup codebase.
//!
//! This module contains the vendor endpoints, the fixed pieces of the
//! installed filesystem layout, timeout durations, and retry parameters that
//! are used across multiple modules. Defining them centrally improves
//! maintainability and makes magic values more discoverable. All of them are
//! defaults: the live values travel inside [`crate::config::InstallConfig`],
//! which tests point at temporary roots and local endpoints.

use std::time::Duration;

/// Vendor page scraped for the latest published version and used as the stem
/// for the per-version bundle URLs.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://www.plasticscm.com/download";

/// Suffix appended to the download URL to reach the labs (prerelease) channel.
pub const LABS_PATH: &str = "labs";

/// Fixed URI of the Mono runtime archive the client and server depend on.
///
/// The archive is a gzipped tarball whose entries are rooted at `mono/`, so
/// extracting it into the base directory produces `<base>/mono`.
pub const DEFAULT_RUNTIME_URL: &str =
    "http://www.plasticscm.com/plasticrepo/plasticscm-mono-4.6.2/plasticscm-mono-4.6.2.tar.gz";

/// Default base directory of the live installation.
pub const DEFAULT_BASE_DIR: &str = "/opt/plasticscm5";

/// Default directory receiving one symlink per launcher.
pub const DEFAULT_SYSTEM_BIN_DIR: &str = "/usr/bin";

/// Name of the staging directory created under the system temp dir.
pub const STAGING_DIR_NAME: &str = "plasticupdater";

/// System CA bundle handed to the runtime's `cert-sync` tool when present.
pub const CA_BUNDLE_FILE: &str = "/etc/ssl/certs/ca-certificates.crt";

/// Launcher executables relocated out of `client/scripts` into the client
/// root and exposed through the system binary directory.
pub const LAUNCHERS: &[&str] = &[
    "clconfigureclient",
    "cm",
    "gtkplastic",
    "gtkmergetool",
    "plasticapi",
    "repostatscalculator",
    "mono_setup",
];

/// The one launcher that carries a placeholder for the runtime install dir.
pub const RUNTIME_SETUP_LAUNCHER: &str = "mono_setup";

/// Placeholder token inside [`RUNTIME_SETUP_LAUNCHER`] that gets substituted
/// with the absolute runtime installation path during the client commit.
pub const RUNTIME_DIR_TOKEN: &str = "@@MONOINSTALLDIR@@";

/// Shared library relocated from the client bundle into the runtime's `lib`
/// directory after the client commit.
pub const CLIENT_GIT_LIBRARY: &str = "libgit2_x64.so";

/// Sites whose certificates are imported into the runtime trust store after
/// the runtime bundle lands.
pub const TRUSTED_SITES: &[&str] =
    &["https://www.plasticscm.com/", "https://cloud.plasticscm.com/"];

/// Timeout for fetching the vendor version page (30 seconds).
///
/// Version discovery is a small HTML document; anything slower than this is
/// treated as unreachable.
pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for downloading a bundle archive (10 minutes).
///
/// Client and server bundles are several hundred megabytes on slow links, so
/// this is generous while still bounding a hung connection.
pub const ARCHIVE_FETCH_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for the installed-binary version probe (10 seconds).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for each certificate trust-store command (60 seconds).
pub const TRUST_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of attempts for a single fetch before giving up.
pub const FETCH_RETRY_ATTEMPTS: usize = 3;

/// Starting delay for exponential backoff between fetch attempts (500ms).
pub const FETCH_BACKOFF_START_MS: u64 = 500;

/// Maximum backoff delay between fetch attempts (5 seconds).
pub const FETCH_BACKOFF_MAX: Duration = Duration::from_secs(5);
