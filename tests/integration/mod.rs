//! Integration test suite for plasticup
//!
//! Drives the compiled binary end to end through its command line
//! surface. Network-facing tests point every remote URL at a closed
//! local port so they exercise the failure paths without leaving the
//! machine; the happy-path pipeline is covered at the library level
//! where the fetcher can be stubbed.
//!
//! Organized by area:
//! - `cli_surface`: flag parsing, help and version output
//! - `install_flow`: privilege gating and offline failure behavior

#[path = "../common/mod.rs"]
mod common;

mod cli_surface;
mod install_flow;
