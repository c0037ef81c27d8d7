use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_harlens_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("harlens")
}

#[test]
fn test_completion_bash() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_harlens()"))
        .stdout(predicate::str::contains("complete"));
}

#[test]
fn test_completion_zsh() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef harlens"));
}

#[test]
fn test_completion_fish() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--shell").arg("fish");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("complete -c harlens"));
}

#[test]
fn test_completion_lists_subcommands() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("events"));
}

#[test]
fn test_completion_invalid_shell() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--shell").arg("invalid");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completion_help() {
    let mut cmd = Command::new(get_harlens_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("INSTALLATION"));
}
