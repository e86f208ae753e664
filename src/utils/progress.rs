//! Progress indicators for downloads and long-running steps
//!
//! This module wraps the `indicatif` crate with installer-specific styling
//! and a kill switch for scripts and CI.
//!
//! # Environment Variables
//!
//! - `PLASTICUP_NO_PROGRESS`: Set to any value to disable all progress
//!   indicators
//!
//! # Examples
//!
//! ## Download progress
//!
//! ```rust
//! use plasticup::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new_download(2 * 1024 * 1024);
//! progress.set_message("client bundle");
//!
//! // As chunks arrive
//! progress.inc(64 * 1024);
//!
//! progress.finish_and_clear();
//! ```
//!
//! ## Spinner for indeterminate work
//!
//! ```rust
//! use plasticup::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner();
//! spinner.set_message("Extracting archive...");
//! spinner.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Process-wide switch flipped by `--no-progress`
static PROGRESS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disables all progress indicators for the rest of the process.
///
/// Called once during startup when `--no-progress` is set; the environment
/// variable covers the same need for callers that cannot pass a flag.
pub fn disable_progress() {
    PROGRESS_DISABLED.store(true, Ordering::SeqCst);
}

/// Checks if progress bars should be disabled.
///
/// Progress bars are disabled after [`disable_progress`] or when the
/// `PLASTICUP_NO_PROGRESS` environment variable is set to any value.
fn is_progress_disabled() -> bool {
    PROGRESS_DISABLED.load(Ordering::SeqCst) || std::env::var("PLASTICUP_NO_PROGRESS").is_ok()
}

/// A progress bar with consistent styling across installer operations.
///
/// Wraps the `indicatif` progress bar. When progress is disabled via
/// `PLASTICUP_NO_PROGRESS`, every constructor returns a hidden bar that
/// silently ignores all operations, so call sites never need to branch.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a progress bar for a download of `total_bytes` bytes.
    ///
    /// Displays bytes transferred, total bytes, and an ETA. Use
    /// [`ProgressBar::new_spinner`] when the content length is unknown.
    #[must_use]
    pub fn new_download(total_bytes: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(total_bytes);
            bar.set_style(ProgressStyle::download());
            bar
        };
        Self { inner: bar }
    }

    /// Creates a spinner for indeterminate progress operations.
    ///
    /// Used for downloads without a `Content-Length` header and for archive
    /// extraction, where the total amount of work is unknown up front.
    #[must_use]
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(ProgressStyle::spinner());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self { inner: bar }
    }

    /// Sets the message displayed alongside the progress bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Increments the progress bar by the specified amount.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Finishes the progress bar and displays a completion message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Finishes the progress bar and clears it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Pre-configured `indicatif` styles shared by every progress indicator.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Style for byte-oriented download bars.
    ///
    /// Template:
    ///
    /// ```text
    /// {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})
    /// ```
    #[must_use]
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{msg:.bold} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("━╸━")
    }

    /// Style for indeterminate spinners.
    #[must_use]
    pub fn spinner() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}
