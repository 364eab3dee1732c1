//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_migrate_help() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.arg("migrate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--reset"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_seed_help() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.arg("seed").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--test-database-url"));
}

#[test]
fn test_env_flag_rejects_unknown_value() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.env_remove("BIZTIME_ENV")
        .args(["--env", "production", "migrate"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.args(["serve", "--in-memory", "--bind", "not-an-address"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--bind"));
}
