//! Certificate trust refresh after the runtime bundle lands.
//!
//! The bundled runtime ships its own certificate store, so a fresh install
//! walks through four refresh steps:
//!
//! 1. Rebuild the OS store with `update-ca-certificates` (Debian family) or
//!    `trust extract-compat` (Fedora family), whichever is on `PATH`.
//! 2. Sync the OS CA bundle into the runtime store with the runtime's
//!    `cert-sync`, when the bundle file exists.
//! 3. Import the vendor sites' SSL certificates with `certmgr`.
//! 4. Import the Mozilla roots with `mozroots`.
//!
//! Every step is best-effort: a tool that is missing, exits non-zero, or
//! hangs past its timeout is reported on the console and skipped. Trust
//! refresh never fails an install.

use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::config::InstallConfig;
use crate::constants::{CA_BUNDLE_FILE, TRUSTED_SITES, TRUST_COMMAND_TIMEOUT};

/// Refreshes the OS and runtime certificate stores.
pub async fn refresh_system_trust(config: &InstallConfig) {
    refresh_os_store(config.quiet).await;
    refresh_runtime_stores(config).await;
}

/// Rebuilds the OS certificate store with whichever system tool is present.
async fn refresh_os_store(quiet: bool) {
    if let Ok(tool) = which::which("update-ca-certificates") {
        run_tool(&tool, &[], quiet).await;
    } else if let Ok(tool) = which::which("trust") {
        run_tool(&tool, &["extract-compat"], quiet).await;
    } else {
        eprintln!("Unable to update certificates");
    }
}

/// Feeds the OS CA bundle and the vendor sites into the runtime's store.
async fn refresh_runtime_stores(config: &InstallConfig) {
    let cert_sync = config.runtime_dir().join("bin").join("cert-sync");
    if Path::new(CA_BUNDLE_FILE).exists() {
        run_tool(&cert_sync, &[CA_BUNDLE_FILE], config.quiet).await;
    }

    let certtools = config.base_dir.join("certtools");
    let certmgr = certtools.join("certmgr");
    for site in TRUSTED_SITES {
        run_tool(&certmgr, &["-ssl", "-m", "-y", site], config.quiet).await;
    }

    let mozroots = certtools.join("mozroots");
    run_tool(&mozroots, &["--import", "--machine", "--add-only"], config.quiet).await;
}

/// Runs one trust tool, echoing the invocation the way the rest of the
/// install narrates its steps. Returns whether the tool ran and succeeded.
async fn run_tool(program: &Path, args: &[&str], quiet: bool) -> bool {
    run_tool_with_timeout(program, args, TRUST_COMMAND_TIMEOUT, quiet).await
}

async fn run_tool_with_timeout(
    program: &Path,
    args: &[&str],
    timeout: Duration,
    quiet: bool,
) -> bool {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    if !quiet {
        println!("Executing '{rendered}'");
    }

    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);

    match tokio::time::timeout(timeout, command.status()).await {
        Ok(Ok(status)) if status.success() => return true,
        Ok(Ok(status)) => {
            tracing::debug!("'{rendered}' exited with {status}");
        }
        Ok(Err(e)) => {
            tracing::debug!("'{rendered}' failed to start: {e}");
        }
        Err(_) => {
            tracing::debug!("'{rendered}' timed out after {}s", timeout.as_secs());
        }
    }
    eprintln!("{}", "Failed!".red());
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runtime_refresh_tolerates_missing_tools() {
        let temp = TempDir::new().unwrap();
        let config = InstallConfig {
            base_dir: temp.path().join("opt"),
            ..InstallConfig::default()
        };
        // No runtime unpacked, so every tool spawn fails; none may panic or
        // surface an error.
        refresh_runtime_stores(&config).await;
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_tool_reports_exit_status() {
        assert!(run_tool(Path::new("/bin/sh"), &["-c", "exit 0"], true).await);
        assert!(!run_tool(Path::new("/bin/sh"), &["-c", "exit 3"], true).await);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_tool_kills_hung_tool_at_timeout() {
        let started = Instant::now();
        let ok = run_tool_with_timeout(
            Path::new("/bin/sh"),
            &["-c", "sleep 5"],
            Duration::from_millis(50),
            true,
        )
        .await;
        assert!(!ok);
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
