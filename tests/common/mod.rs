//! Shared helpers for the plasticup integration tests.

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;

/// Command builder for the installed `plasticup` binary.
///
/// Strips the environment variables the binary reads so results do not
/// depend on the surrounding shell.
pub fn plasticup() -> assert_cmd::Command {
    let mut command = assert_cmd::Command::cargo_bin("plasticup").unwrap();
    command
        .env_remove("PLASTICUP_PREFIX")
        .env_remove("PLASTICUP_BIN_DIR")
        .env_remove("PLASTICUP_STAGING_DIR")
        .env_remove("PLASTICUP_DOWNLOAD_URL")
        .env_remove("PLASTICUP_RUNTIME_URL")
        .env_remove("PLASTICUP_NO_PROGRESS")
        .env_remove("RUST_LOG");
    command
}

/// Flags that confine a run to `temp` and point every remote surface at
/// a closed local port, so nothing reaches the vendor endpoints or the
/// system install tree.
pub fn sandbox_flags(temp: &TempDir) -> Vec<String> {
    let root = temp.path();
    vec![
        "--prefix".into(),
        path_string(&root.join("opt")),
        "--bin-dir".into(),
        path_string(&root.join("bin")),
        "--staging-dir".into(),
        path_string(&root.join("staging")),
        "--download-url".into(),
        "http://127.0.0.1:1".into(),
        "--runtime-url".into(),
        "http://127.0.0.1:1/runtime.tar.gz".into(),
        "--no-trust-refresh".into(),
        "--no-progress".into(),
    ]
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
