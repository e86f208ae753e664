//! plasticup - Plastic SCM installer and updater for Linux
//!
//! Installs Plastic SCM from the vendor's release bundles and keeps an
//! installed host current. One run scrapes the vendor downloads page for
//! the latest published version, probes the installed client for the
//! version it already runs, and either finishes as up to date or performs
//! a first install: the bundled mono runtime unpacks under the base
//! directory, the client and server ZIPs unpack into a staging area, and
//! their trees are committed into the live layout with launcher symlinks
//! in the system binary directory.
//!
//! # Architecture Overview
//!
//! The pipeline is strictly sequential and built from injected parts:
//!
//! - An [`installer::Installer`] owns one run and walks the decision state
//!   machine (privilege gate, version discovery, probe, then install,
//!   upgrade, or nothing).
//! - A [`fetch::Fetcher`] downloads pages and archives; the shipped
//!   [`fetch::HttpFetcher`] streams over HTTPS with retries and progress
//!   bars, while tests substitute canned responses.
//! - A [`version::VersionProbe`] reports what is installed by running the
//!   installed client binary; tests script it.
//! - The [`layout::LayoutWriter`] relocates staged bundle trees into the
//!   live layout, and the [`staging::StagingArea`] guarantees the staged
//!   subtrees are cleaned up after every attempt.
//!
//! Every path and URI derives from one [`config::InstallConfig`], so the
//! whole pipeline can be pointed at a temporary root.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line flags mapped onto an install configuration
//! - [`config`] - The injected configuration all components derive from
//! - [`constants`] - Vendor URIs, fixed paths, launcher names, timeouts
//! - [`core`] - Error taxonomy and user-facing error rendering
//! - [`fetch`] - HTTP downloads and archive extraction
//! - [`installer`] - The install/upgrade state machine
//! - [`layout`] - Commits staged trees into the live layout
//! - [`staging`] - Staging area lifecycle and best-effort cleanup
//! - [`trust`] - Certificate store refresh through the bundled runtime
//! - [`version`] - Version tokens, page scraping, and the install probe
//! - [`utils`] - Filesystem moves, symlinks, permissions, progress bars

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod fetch;
pub mod installer;
pub mod layout;
pub mod staging;
pub mod trust;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
