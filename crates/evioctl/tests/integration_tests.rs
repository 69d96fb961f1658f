//! Integration tests for the evioctl binary
//!
//! No real input devices are assumed; these cover argument handling, error
//! exit codes and discovery over scratch directories.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn evioctl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evioctl")?;
    cmd.env_remove("EVIOCTL_CONFIG").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn help_lists_commands() -> TestResult {
    evioctl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("listen").and(predicate::str::contains("rumble")));
    Ok(())
}

#[test]
fn missing_node_exits_with_device_not_found() -> TestResult {
    let dir = tempfile::tempdir()?;
    let node = dir.path().join("event99");
    evioctl()?
        .args(["info"])
        .arg(&node)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Device not found"));
    Ok(())
}

#[test]
fn json_errors_are_reported_on_stdout() -> TestResult {
    let dir = tempfile::tempdir()?;
    let node = dir.path().join("event99");
    let output = evioctl()?.args(["--json", "caps"]).arg(&node).output()?;
    assert_eq!(output.status.code(), Some(2));

    let body: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body.get("success"), Some(&Value::Bool(false)));
    Ok(())
}

#[test]
fn find_in_empty_directory_reports_no_devices() -> TestResult {
    let dir = tempfile::tempdir()?;
    let output = evioctl()?
        .args(["--json", "find", "keyboard"])
        .env("EVIOCTL_INPUT_DIR", dir.path())
        .output()?;
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body.get("success"), Some(&Value::Bool(true)));
    assert_eq!(body.get("devices"), Some(&Value::Array(Vec::new())));
    Ok(())
}

#[test]
fn invalid_config_exits_with_validation_code() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("engine.yaml");
    fs::write(&config, "read_batch: 0\n")?;

    evioctl()?
        .args(["find", "mouse", "--config"])
        .arg(&config)
        .env("EVIOCTL_INPUT_DIR", dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("read_batch"));
    Ok(())
}
