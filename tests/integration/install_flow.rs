//! Install pipeline tests: privilege gating and offline failure paths.
//!
//! Every run here points the download endpoints at a closed local port,
//! so the binary exercises its error handling without network access and
//! without ever mutating the directories it was aimed at.

use plasticup::utils::is_effective_root;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::{plasticup, sandbox_flags};

#[test]
fn test_system_install_requires_privileges() {
    if is_effective_root() {
        return;
    }

    plasticup()
        .args(["--download-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("administrator privileges"));
}

#[test]
fn test_unreachable_vendor_page_fails_cleanly() {
    let temp = TempDir::new().unwrap();

    plasticup()
        .args(sandbox_flags(&temp))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "unable to retrieve the latest version",
        ));

    assert!(!temp.path().join("opt").exists());
    assert!(!temp.path().join("bin").exists());
    assert!(!temp.path().join("staging").exists());
}

#[test]
fn test_check_mode_skips_privilege_gate() {
    plasticup()
        .args(["--check", "--download-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("unable to retrieve the latest version")
                .and(predicate::str::contains("administrator privileges").not()),
        );
}

#[test]
fn test_quiet_run_keeps_stdout_empty() {
    let temp = TempDir::new().unwrap();

    plasticup()
        .arg("--quiet")
        .args(sandbox_flags(&temp))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "unable to retrieve the latest version",
        ));
}
