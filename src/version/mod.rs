//! Version discovery for installed and published releases.
//!
//! This module answers the two questions every run starts with: which version
//! does the vendor currently publish, and which version (if any) is installed
//! on this host.
//!
//! # Module Organization
//!
//! - Core types: [`Version`] and [`InstallState`]
//! - [`extract_first_version`] - Pure extraction of the published version
//!   token from vendor page markup
//! - [`probe`] - The [`VersionProbe`](probe::VersionProbe) trait and the
//!   shipped [`BinaryProbe`](probe::BinaryProbe) that asks the installed
//!   client binary for its version
//!
//! # Version Semantics
//!
//! Release tokens look like `9.0.16.4427` but carry no ordering the
//! installer relies on: two versions are either equal or different. The
//! decision between "up to date" and "out of date" is pure equality, so
//! [`Version`] is an opaque token type with no comparison beyond `Eq`.
//!
//! # Examples
//!
//! ## Extracting the published version from page markup
//!
//! ```rust
//! use plasticup::version::extract_first_version;
//!
//! let html = "Version: foo\n  <span>9.0.16.1234</span>";
//! let version = extract_first_version(html).unwrap();
//! assert_eq!(version.as_str(), "9.0.16.1234");
//! ```
//!
//! ## Comparing installed and published versions
//!
//! ```rust
//! use plasticup::version::{InstallState, Version};
//!
//! let latest = Version::new("9.0.16.4427");
//! let state = InstallState::Installed(Version::new("9.0.16.4427"));
//!
//! match state {
//!     InstallState::Installed(current) if current == latest => {
//!         println!("Already up to date.");
//!     }
//!     InstallState::Installed(_) => println!("Upgrade available"),
//!     InstallState::NotInstalled => println!("Fresh install"),
//! }
//! ```

pub mod probe;

pub use probe::{BinaryProbe, VersionProbe};

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Pattern locating the first published version token on a vendor page.
///
/// Matches a `Version:` label, then a `<span>` at the start of the next
/// line's markup whose leading run of token characters is the version. The
/// token ends at the first space or tag character.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Version:.*\n *<span>([^ <]*)").expect("version pattern is valid")
});

/// An opaque release version token, compared only for equality.
///
/// Tokens are taken verbatim from the vendor page or the installed binary.
/// No ordering or component math is defined; the installer only ever asks
/// whether two tokens are the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Wraps a token captured from a page or probe.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as text, for URIs and display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the probe found on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// The live root or its entry-point binary is absent
    NotInstalled,
    /// An installation exists and reported this version
    Installed(Version),
}

/// Extracts the first published version token from vendor page markup.
///
/// Returns `None` when the pattern does not appear or the captured token is
/// empty. Callers treat `None` as "latest version unknown"; this function
/// never fails.
#[must_use]
pub fn extract_first_version(html: &str) -> Option<Version> {
    let captures = VERSION_PATTERN.captures(html)?;
    let token = captures.get(1)?.as_str();
    if token.is_empty() {
        None
    } else {
        Some(Version::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version_from_span_markup() {
        let html = "Version: foo\n  <span>9.0.16.1234</span>";
        assert_eq!(
            extract_first_version(html),
            Some(Version::new("9.0.16.1234"))
        );
    }

    #[test]
    fn test_extract_takes_first_of_many() {
        let html = "\
            <h3>Version:</h3>\n\
            <span>11.0.16.7248</span> released today\n\
            Version: older\n\
            <span>10.0.16.6505</span>";
        assert_eq!(
            extract_first_version(html),
            Some(Version::new("11.0.16.7248"))
        );
    }

    #[test]
    fn test_extract_token_ends_at_space() {
        let html = "Version:\n<span>9.0.16.4427 (LTS)</span>";
        assert_eq!(
            extract_first_version(html),
            Some(Version::new("9.0.16.4427"))
        );
    }

    #[test]
    fn test_extract_requires_span_on_next_line() {
        // The span must follow on the line after the label
        let html = "Version: 9.0.16.4427 with no span markup";
        assert_eq!(extract_first_version(html), None);

        let blank_line = "Version:\n\n<span>9.0.16.4427</span>";
        assert_eq!(extract_first_version(blank_line), None);
    }

    #[test]
    fn test_extract_empty_page_is_none() {
        assert_eq!(extract_first_version(""), None);
    }

    #[test]
    fn test_extract_empty_token_is_none() {
        let html = "Version:\n<span> 9.0.16.4427</span>";
        assert_eq!(extract_first_version(html), None);
    }

    #[test]
    fn test_version_equality_is_textual() {
        assert_eq!(Version::new("9.0.16.4427"), Version::new("9.0.16.4427"));
        assert_ne!(Version::new("9.0.16.4427"), Version::new("9.0.16.4428"));
        // No normalization: tokens are compared verbatim
        assert_ne!(Version::new("9.0"), Version::new("9.0.0"));
    }

    #[test]
    fn test_version_display_round_trips() {
        let version = Version::new("11.0.16.7248");
        assert_eq!(version.to_string(), "11.0.16.7248");
        assert_eq!(version.as_str(), "11.0.16.7248");
    }
}
