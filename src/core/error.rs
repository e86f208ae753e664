//! Error handling for plasticup
//!
//! This module provides the error types and user-friendly error reporting for
//! the installer. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`InstallerError`] - Enumerated error types for every failure the
//!   install/upgrade run can abort with
//! - [`ErrorContext`] - Wrapper that adds user-friendly suggestions and
//!   details for terminal display
//!
//! # Failure taxonomy
//!
//! The variants mirror how the run can go wrong, in the order the run can hit
//! them:
//! - [`InstallerError::PermissionDenied`] - not running with enough privilege
//!   to touch the system layout; nothing has been modified yet.
//! - [`InstallerError::VersionUnknown`] - the vendor page was unreachable or
//!   did not contain a version token; nothing has been modified yet.
//! - [`InstallerError::ProbeFailed`] - the installed entry-point binary
//!   exists but the version probe could not run it.
//! - [`InstallerError::Fetch`] - a bundle download or extraction failed;
//!   aborts the attempt but never blocks staging cleanup.
//! - [`InstallerError::Layout`] - an expected file or directory was missing
//!   while relocating a staged bundle into the live layout.
//! - [`InstallerError::Patch`] - placeholder substitution inside a relocated
//!   launcher failed. This variant is downgraded to a logged warning at its
//!   only call site; it aborts nothing.
//! - [`InstallerError::UpgradeUnimplemented`] - the upgrade transition is
//!   reserved but its commit logic does not exist yet.
//! - [`InstallerError::Other`] - anything else that reaches the terminal
//!   display, such as filesystem context chains surfaced through `anyhow`.
//!
//! Staging cleanup failures never surface as errors at all; they are logged
//! and swallowed (see [`crate::staging`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasticup::core::{InstallerError, user_friendly_error};
//!
//! fn check_privileges() -> Result<(), InstallerError> {
//!     Err(InstallerError::PermissionDenied)
//! }
//!
//! match check_privileges() {
//!     Ok(()) => {}
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Colored error with a suggestion on stderr
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for plasticup operations.
///
/// Each variant represents a distinct way an install/upgrade run can abort.
/// Variants carry the context needed to tell the user what was being touched
/// when the run failed (URL, path, underlying reason).
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The run targets the system layout but is not running as root.
    ///
    /// Raised before any side effect; the live layout and the staging area
    /// are untouched when this is returned.
    #[error("this installer needs to be run with administrator privileges")]
    PermissionDenied,

    /// The latest published version could not be determined.
    ///
    /// Covers both an unreachable vendor page and a page whose markup no
    /// longer matches the version pattern. Raised before any side effect.
    #[error("unable to retrieve the latest version")]
    VersionUnknown,

    /// The installed entry-point binary exists but the version probe failed.
    ///
    /// # Fields
    /// - `reason`: spawn failure, timeout, or non-zero exit description
    #[error("unable to determine the installed version: {reason}")]
    ProbeFailed {
        /// Why the probe could not produce a version token
        reason: String,
    },

    /// A download or archive extraction failed.
    ///
    /// # Fields
    /// - `url`: the bundle URI being fetched
    /// - `reason`: network, HTTP status, or archive decode description
    #[error("unable to download from {url}: {reason}")]
    Fetch {
        /// The URI the fetch was addressed to
        url: String,
        /// What went wrong while downloading or extracting
        reason: String,
    },

    /// An expected file or directory was missing while committing a staged
    /// bundle into the live layout.
    ///
    /// # Fields
    /// - `path`: the entry that was expected to exist
    /// - `reason`: the relocation step that tripped over it
    #[error("unexpected bundle layout at {path}: {reason}")]
    Layout {
        /// The path the relocation step expected to find
        path: String,
        /// The operation that failed on it
        reason: String,
    },

    /// Placeholder substitution inside a relocated launcher failed.
    ///
    /// Never propagated past the client commit: the caller logs it and the
    /// install continues degraded (the launcher keeps its placeholder).
    #[error("unable to substitute the runtime install dir in {path}: {reason}")]
    Patch {
        /// The launcher file that kept its placeholder
        path: String,
        /// Why the rewrite failed
        reason: String,
    },

    /// The upgrade transition is reserved but not implemented yet.
    #[error("upgrading an existing installation is not implemented yet")]
    UpgradeUnimplemented,

    /// Fallback for errors that reach the display layer without one of the
    /// variants above.
    ///
    /// Built by [`user_friendly_error`] from an [`anyhow::Error`] chain, so
    /// the message already carries the failing step and its cause.
    #[error("{message}")]
    Other {
        /// Generic error message, including any cause chain
        message: String,
    },
}

/// Wrapper that pairs an [`InstallerError`] with terminal-friendly context.
///
/// The context carries an optional actionable suggestion (displayed green)
/// and optional details (displayed yellow). [`user_friendly_error`] builds
/// these from the error variants; `main` displays them on the way out.
pub struct ErrorContext {
    /// The underlying installer error
    pub error: InstallerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details attached.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Add an actionable suggestion, displayed green in the terminal.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred, displayed yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`] with a suggestion
/// tailored to the failure.
///
/// Recognizes [`InstallerError`] variants and common [`std::io::Error`]
/// kinds; everything else is wrapped with generic context so the user still
/// gets a readable message instead of a debug dump.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<InstallerError>() {
        Ok(installer_error) => return contextualize(installer_error),
        Err(other) => other,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(InstallerError::PermissionDenied)
                .with_suggestion("Re-run the installer with sudo")
                .with_details(
                    "The live layout lives under system directories that only root can modify",
                );
        }
    }

    let mut message = error.to_string();
    let causes: Vec<String> = error
        .chain()
        .skip(1)
        .map(std::string::ToString::to_string)
        .collect();
    if !causes.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            message.push_str(&format!("\n  {}: {cause}", i + 1));
        }
    }

    ErrorContext::new(InstallerError::Other { message })
        .with_suggestion("Re-run with --verbose to see which step failed")
}

fn contextualize(error: InstallerError) -> ErrorContext {
    match &error {
        InstallerError::PermissionDenied => ErrorContext::new(error)
            .with_suggestion("Re-run the installer with sudo")
            .with_details(
                "Installing writes under /opt and creates symlinks in the system binary directory",
            ),
        InstallerError::VersionUnknown => ErrorContext::new(error)
            .with_suggestion(
                "Check your network connection, or point --download-url at a reachable mirror",
            )
            .with_details(
                "The latest version is scraped from the vendor download page before anything else happens",
            ),
        InstallerError::ProbeFailed { .. } => ErrorContext::new(error).with_suggestion(
            "Check that the installed cm binary is runnable, or remove the installation root to force a fresh install",
        ),
        InstallerError::Fetch { .. } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and retry")
            .with_details("Downloads are retried a few times before the run gives up"),
        InstallerError::Layout { .. } => ErrorContext::new(error).with_details(
            "The downloaded bundle did not contain the expected directory layout; the vendor may have changed the archive structure",
        ),
        InstallerError::UpgradeUnimplemented => ErrorContext::new(error).with_suggestion(
            "Pass --no-upgrade to leave the existing installation untouched",
        ),
        InstallerError::Patch { .. } | InstallerError::Other { .. } => ErrorContext::new(error),
    }
}
