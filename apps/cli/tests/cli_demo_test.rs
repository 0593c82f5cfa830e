//! Integration tests for the `netsec demo` command.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn netsec(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("netsec").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_demo_division_by_zero_reports_origin() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .arg("demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter the try block"))
        .stderr(predicate::str::contains("Error occured in python script name ["))
        .stderr(predicate::str::contains("demo.rs] line number ["))
        .stderr(predicate::str::contains("error message [division by zero]"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_demo_with_divisor_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .args(["demo", "--divisor", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 / 1 = 1"));
}

#[test]
fn test_demo_json_report() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .args(["demo", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"message\": \"division by zero\""))
        .stdout(predicate::str::contains("\"line_number\""));
}

#[test]
fn test_demo_with_disabled_probe_still_uses_trace() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .env("NETSEC_PROBE", "disabled")
        .arg("demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("demo.rs] line number ["))
        .stderr(predicate::str::contains("[Unknown]").not());
}

#[test]
fn test_demo_with_custom_label_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".netsecrc"), "[render]\nlabel = \"source file\"\n").unwrap();

    netsec(&temp_dir)
        .arg("demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error occured in source file ["));
}

#[test]
fn test_invalid_log_level_fails() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .args(["--log-level", "loud", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration value"));
}
