use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};

/// Host command isolated from any config or env in the caller's tree.
fn host(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tubemark-host");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TUBEMARK_CONFIG")
        .env_remove("TUBEMARK_STORAGE_BACKEND")
        .env_remove("TUBEMARK_STORAGE_PATH")
        .env_remove("TUBEMARK_STORAGE_KEY")
        .env_remove("TUBEMARK_TRACKER_INTERVAL")
        .env_remove("TUBEMARK_MAX_MESSAGE_BYTES")
        .env_remove("TUBEMARK_QUEUE_CAPACITY")
        .env_remove("TUBEMARK_LOG");
    cmd
}

fn frame(value: &Value) -> Vec<u8> {
    let body = serde_json::to_vec(value).unwrap();
    let mut out = (body.len() as u32).to_ne_bytes().to_vec();
    out.extend(body);
    out
}

fn read_frames(mut bytes: &[u8]) -> Vec<Value> {
    let mut out = Vec::new();
    while bytes.len() >= 4 {
        let len = u32::from_ne_bytes(bytes[..4].try_into().unwrap()) as usize;
        out.push(serde_json::from_slice(&bytes[4..4 + len]).unwrap());
        bytes = &bytes[4 + len..];
    }
    out
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    host(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("track"));
}

#[test]
fn exec_reports_unknown_video() {
    let dir = tempfile::tempdir().unwrap();
    host(dir.path())
        .args(["--memory", "exec", r#"{"type":"CHECK_VIDEO","id":"nope"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"success":false,"data":null}"#));
}

#[test]
fn exec_rejects_non_json_argument() {
    let dir = tempfile::tempdir().unwrap();
    host(dir.path())
        .args(["--memory", "exec", "CHECK_VIDEO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON command object"));
}

#[test]
fn exec_persists_between_runs_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/videos.json");
    let path_arg = path.to_str().unwrap();

    host(dir.path())
        .args([
            "--storage-path",
            path_arg,
            "exec",
            r#"{"type":"NEW_VIDEO","id":"v1","title":"T","time":42,"duration":100}"#,
        ])
        .assert()
        .success();

    host(dir.path())
        .args([
            "--storage-path",
            path_arg,
            "exec",
            r#"{"type":"CHECK_VIDEO","id":"v1"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"success":true,"data":{"time":42}}"#,
        ));

    assert!(path.exists());
}

#[test]
fn serve_answers_each_frame_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = frame(&json!({
        "type": "MARK_VIDEO",
        "id": "v2",
        "title": "Intro",
        "time": 10,
        "duration": 200
    }));
    input.extend(frame(&json!({"type": "CHECK_VIDEO", "id": "v2"})));
    input.extend(frame(&json!({
        "type": "REMOVE_MARK",
        "id": "v2",
        "timestamp": {"title": "Intro", "time": 10}
    })));
    input.extend(frame(&json!({"type": "REMOVE_VIDEO", "id": "v2"})));

    let output = host(dir.path())
        .args(["--memory", "serve"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let replies = read_frames(&output);
    assert_eq!(replies.len(), 4);
    assert_eq!(replies[0], json!({"success": true, "data": null}));
    assert_eq!(replies[1], json!({"success": false, "data": null}));
    assert_eq!(replies[2], json!({"success": true, "data": null}));
    // the mark removal already deleted the placeholder record
    assert_eq!(replies[3]["success"], false);
}

#[test]
fn track_reports_positions_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("videos.json");
    let path_arg = path.to_str().unwrap();

    host(dir.path())
        .args([
            "--storage-path",
            path_arg,
            "exec",
            r#"{"type":"NEW_VIDEO","id":"v","title":"T"}"#,
        ])
        .assert()
        .success();

    host(dir.path())
        .args(["--storage-path", path_arg, "track", "v", "--interval", "10ms"])
        .write_stdin("5\n5\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 updates, 1 unchanged"));

    host(dir.path())
        .args([
            "--storage-path",
            path_arg,
            "exec",
            r#"{"type":"CHECK_VIDEO","id":"v"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""time":9"#));
}
