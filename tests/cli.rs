//! CLI tests: run the `emx-teamcity` binary against event logs

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_emx-teamcity"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata").join(name)
}

#[test]
fn cli_replays_file_to_stdout() {
    let output = bin().arg(fixture("one_passing.ndjson")).output().unwrap();
    assert!(output.status.success());
    let expected = std::fs::read_to_string(fixture("one_passing.expected")).unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn cli_reads_stdin() {
    let input = std::fs::read(fixture("two_features.ndjson")).unwrap();
    let mut child = bin()
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&input).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let expected = std::fs::read_to_string(fixture("two_features.expected")).unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn cli_strict_fails_on_malformed_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ndjson");
    std::fs::write(&path, "{\"type\": \"test-run-started\"}\nnot json\n").unwrap();

    let output = bin().arg("--strict").arg(&path).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("broken.ndjson:2:"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn cli_lenient_skips_malformed_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.ndjson");
    let mut content = std::fs::read_to_string(fixture("one_passing.ndjson")).unwrap();
    content.insert_str(0, "garbage\n");
    std::fs::write(&path, content).unwrap();

    let output = bin().arg(&path).output().unwrap();
    assert!(output.status.success());
    let expected = std::fs::read_to_string(fixture("one_passing.expected")).unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn cli_missing_file() {
    let output = bin().arg("does/not/exist.ndjson").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to open event log"), "stderr: {}", stderr);
}
