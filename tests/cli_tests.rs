//! Binary-level CLI tests: argument parsing and help output.
//!
//! Nothing here talks to a daemon; commands that need one are covered by
//! the IPC integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("respite")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("respite")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("respite"));
}

#[test]
fn rejects_out_of_range_work_minutes() {
    Command::cargo_bin("respite")
        .unwrap()
        .args(["start", "--work", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn completions_generate_bash_script() {
    Command::cargo_bin("respite")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("respite"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("respite")
        .unwrap()
        .arg("snooze")
        .assert()
        .failure();
}
