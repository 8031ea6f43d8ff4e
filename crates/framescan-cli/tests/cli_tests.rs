use std::process::Command;

use framescan_test_harness::fixtures;
use serde_json::Value;

fn framescan() -> Command {
    Command::new(env!("CARGO_BIN_EXE_framescan"))
}

fn events(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_details_prints_one_event() {
    let dir = fixtures::fixture_dir();
    let path = fixtures::generate_test_video(dir.path(), "cli_details", 1.0);

    let output = framescan().arg("details").arg(&path).output().unwrap();
    assert!(output.status.success());

    let events = events(&output.stdout);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "file_details");
    assert_eq!(events[0]["details"]["width"], 320);
    assert_eq!(events[0]["details"]["height"], 240);
}

#[test]
fn test_thumbs_written_to_output_dir() {
    let dir = fixtures::fixture_dir();
    let path = fixtures::generate_test_video(dir.path(), "cli_thumbs", 1.0);
    let out = dir.path().join("images");

    let output = framescan()
        .args(["thumbs", "-o"])
        .arg(&out)
        .arg(&path)
        .args(["0", "15"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = events(&output.stdout);
    assert_eq!(events.len(), 2);
    for event in &events {
        let image = event["result"]["image_path"].as_str().unwrap();
        assert!(std::fs::metadata(image).unwrap().len() > 0);
    }
    assert_eq!(events[1]["result"]["is_last"], true);
}

#[test]
fn test_unwritable_output_dir_still_ends_batch() {
    let dir = fixtures::fixture_dir();
    let path = fixtures::generate_test_video(dir.path(), "cli_blocked", 1.0);
    let blocked = dir.path().join("images");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let output = framescan()
        .args(["thumbs", "-o"])
        .arg(&blocked)
        .arg(&path)
        .args(["0", "15"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let events = events(&output.stdout);
    assert_eq!(events.len(), 2);
    let last = &events[1]["result"];
    assert_eq!(last["is_last"], true);
    assert!(last["image_error"].as_str().is_some());
}

#[test]
fn test_missing_file_fails() {
    let dir = fixtures::fixture_dir();
    let output = framescan()
        .arg("details")
        .arg(dir.path().join("missing.mp4"))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let events = events(&output.stdout);
    assert_eq!(events.last().unwrap()["event"], "open_failed");
}
