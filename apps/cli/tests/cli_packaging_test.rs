//! Integration tests for the `netsec requirements`, `netsec package` and `netsec config` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn netsec(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("netsec").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_requirements_lists_entries() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("requirements.txt"), "pandas\n\nnumpy\n-e .\n").unwrap();

    netsec(&temp_dir)
        .arg("requirements")
        .assert()
        .success()
        .stdout(predicate::eq("pandas\nnumpy\n"));
}

#[test]
fn test_requirements_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .arg("requirements")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("requirements file not found"));
}

#[test]
fn test_requirements_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dev-requirements.txt");
    fs::write(&path, "pytest\n").unwrap();

    netsec(&temp_dir)
        .arg("requirements")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("pytest"));
}

#[test]
fn test_package_shows_metadata() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("requirements.txt"), "fastapi\n").unwrap();

    netsec(&temp_dir)
        .arg("package")
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"NetworkSecurity\""))
        .stdout(predicate::str::contains("\"fastapi\""));
}

#[test]
fn test_config_shows_defaults() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("probe = \"track_caller\""))
        .stdout(predicate::str::contains("label = \"python script name\""));
}

#[test]
fn test_config_explicit_file_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("netsec.toml");
    fs::write(&path, "[capture]\nprobe = \"backtrace\"\nskip_frames = 1\n").unwrap();

    netsec(&temp_dir)
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("probe = \"backtrace\""))
        .stdout(predicate::str::contains("skip_frames = 1"));
}

#[test]
fn test_config_missing_explicit_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    netsec(&temp_dir)
        .args(["--config", "absent.toml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
