//! Command line surface tests: flag parsing, help and version output.

use predicates::prelude::*;

use crate::common::plasticup;

#[test]
fn test_help_lists_install_options() {
    plasticup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installer and updater for Plastic SCM"))
        .stdout(predicate::str::contains("--labs"))
        .stdout(predicate::str::contains("--no-upgrade"))
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--prefix"))
        .stdout(predicate::str::contains("--staging-dir"));
}

#[test]
fn test_version_reports_package_name() {
    plasticup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plasticup"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    plasticup()
        .args(["--verbose", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    plasticup()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
