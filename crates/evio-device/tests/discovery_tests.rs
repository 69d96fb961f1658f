//! Discovery over a scratch directory standing in for `/dev/input`.
//!
//! Regular files open like device nodes but reject every control call, so
//! they classify as nothing.

use evio_device::{DeviceKind, EngineConfig, find_in};
use std::fs;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn empty_directory_finds_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let found = find_in(dir.path(), DeviceKind::Keyboard, &EngineConfig::default())?;
    assert!(found.is_empty());
    Ok(())
}

#[test]
fn non_matching_nodes_are_closed_and_skipped() -> TestResult {
    let dir = tempfile::tempdir()?;
    for index in 0..3 {
        fs::write(dir.path().join(format!("event{index}")), b"")?;
    }
    let found = find_in(dir.path(), DeviceKind::Joystick, &EngineConfig::default())?;
    assert!(found.is_empty());
    Ok(())
}

#[test]
fn scan_stops_at_first_gap() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("event0"), b"")?;
    // event1 is missing, so event2 is never opened even though it would fail.
    fs::create_dir(dir.path().join("event2"))?;
    let found = find_in(dir.path(), DeviceKind::Mouse, &EngineConfig::default())?;
    assert!(found.is_empty());
    Ok(())
}

#[test]
fn open_failure_other_than_missing_aborts_scan() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("event0"), b"")?;
    // A directory cannot be opened for writing.
    fs::create_dir(dir.path().join("event1"))?;
    let err = find_in(dir.path(), DeviceKind::Keyboard, &EngineConfig::default()).err();
    let err = err.ok_or("scan should fail")?;
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("event1"));
    Ok(())
}
