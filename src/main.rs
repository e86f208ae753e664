//! plasticup entry point
//!
//! Parses the command line, wires the HTTP fetcher and the binary version
//! probe into an installer, and runs it to a terminal state. `--check`
//! stops after the decision and reports what a run would do.
//!
//! An interrupt mid-run cleans the staging area before the process exits;
//! the live layout is left however far the run got.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plasticup::cli::Cli;
use plasticup::config::InstallConfig;
use plasticup::core::user_friendly_error;
use plasticup::fetch::HttpFetcher;
use plasticup::installer::{Installer, Plan};
use plasticup::staging::StagingArea;
use plasticup::utils::progress::disable_progress;
use plasticup::version::BinaryProbe;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    if cli.quiet || cli.no_progress {
        disable_progress();
    }

    let config = cli.install_config();
    match run(&cli, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli, config: InstallConfig) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let probe = BinaryProbe::new(config.base_dir.clone(), config.probe_binary());
    let staging = StagingArea::new(config.staging_dir.clone());
    let installer = Installer::new(config, fetcher, probe);

    if cli.check {
        return report_plan(&installer).await;
    }

    // The run cleans staging itself on its own paths; this covers Ctrl-C
    // mid-download.
    tokio::select! {
        outcome = installer.run() => outcome.map(|_| ()),
        _ = tokio::signal::ctrl_c() => {
            staging.cleanup();
            eprintln!("Interrupted.");
            std::process::exit(130);
        }
    }
}

/// Reports the decision a run would take, without taking it.
async fn report_plan(installer: &Installer<HttpFetcher, BinaryProbe>) -> Result<()> {
    match installer.plan().await? {
        Plan::UpToDate { version } => {
            println!("Already up to date (version {version}).");
        }
        Plan::FirstInstall { latest } => {
            println!("Would install Plastic SCM {latest} for the first time.");
        }
        Plan::SkippedUpgrade { installed, latest } => {
            println!(
                "Version {latest} is available; {installed} stays installed (--no-upgrade)."
            );
        }
        Plan::Upgrade { installed, latest } => {
            println!(
                "Would upgrade from {installed} to {latest} (upgrade support is not implemented yet)."
            );
        }
    }
    Ok(())
}

/// Installs the tracing subscriber, honoring `RUST_LOG` over the flags.
fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "plasticup=debug"
    } else if cli.quiet {
        "plasticup=warn"
    } else {
        "plasticup=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
