//! Command-line surface.
//!
//! A single-command tool: flags select the release channel, redirect the
//! filesystem layout for sandboxed runs, and tune output. Parsing maps the
//! flags onto an [`InstallConfig`]; the run loop itself lives in `main`.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Channel, InstallConfig};

/// Installer and updater for Plastic SCM on Linux.
#[derive(Parser, Debug)]
#[command(
    name = "plasticup",
    about = "Installer and updater for Plastic SCM on Linux",
    version,
    long_about = "Installs Plastic SCM from the vendor's release bundles: the bundled mono \
runtime, then the client and server, wired into /opt/plasticscm5 with launcher symlinks \
in /usr/bin. Running it again on an installed host checks for a newer release."
)]
pub struct Cli {
    /// Read the latest version from the labs (prerelease) channel
    #[arg(long)]
    pub labs: bool,

    /// Leave an existing installation untouched when a newer version exists
    #[arg(long)]
    pub no_upgrade: bool,

    /// Report what a run would do without touching the host
    #[arg(long)]
    pub check: bool,

    /// Install under this directory instead of /opt/plasticscm5.
    ///
    /// Together with --bin-dir this keeps a run entirely inside
    /// user-writable directories, which also skips the privilege check.
    #[arg(long, value_name = "DIR", env = "PLASTICUP_PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Create launcher symlinks in this directory instead of /usr/bin
    #[arg(long, value_name = "DIR", env = "PLASTICUP_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Stage downloaded bundles under this directory
    #[arg(long, value_name = "DIR", env = "PLASTICUP_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Base URL of the vendor download site
    #[arg(long, value_name = "URL", env = "PLASTICUP_DOWNLOAD_URL")]
    pub download_url: Option<String>,

    /// URL of the bundled runtime tarball
    #[arg(long, value_name = "URL", env = "PLASTICUP_RUNTIME_URL")]
    pub runtime_url: Option<String>,

    /// Skip the certificate trust refresh after the runtime lands
    #[arg(long)]
    pub no_trust_refresh: bool,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to RUST_LOG=debug. Mutually exclusive with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress everything except warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable progress bars and spinners
    #[arg(long, env = "PLASTICUP_NO_PROGRESS")]
    pub no_progress: bool,
}

impl Cli {
    /// Maps the parsed flags onto a full install configuration.
    ///
    /// Anything not overridden keeps the system-wide defaults. A trailing
    /// slash on the download URL is dropped so derived bundle URIs join
    /// cleanly.
    #[must_use]
    pub fn install_config(&self) -> InstallConfig {
        let mut config = InstallConfig::default();
        if self.labs {
            config.channel = Channel::Labs;
        }
        config.no_upgrade = self.no_upgrade;
        config.refresh_trust = !self.no_trust_refresh;
        config.quiet = self.quiet;
        if let Some(prefix) = &self.prefix {
            config.base_dir = prefix.clone();
        }
        if let Some(bin_dir) = &self.bin_dir {
            config.bin_dir = bin_dir.clone();
        }
        if let Some(staging_dir) = &self.staging_dir {
            config.staging_dir = staging_dir.clone();
        }
        if let Some(url) = &self.download_url {
            config.download_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.runtime_url {
            config.runtime_url = url.clone();
        }
        config
    }
}
