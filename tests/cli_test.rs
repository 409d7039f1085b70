use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SMALL: &str = r#"{
    "2": ["2", "11"],
    "9": ["11", "8", "10"],
    "10": ["3"],
    "11": ["7", "5"],
    "8": ["7", "3"],
    "12": ["10"]
}"#;

fn write_graph(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("graph.json");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_sort_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_graph(&temp_dir, SMALL);

    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.arg(&path);
    cmd.assert()
        .success()
        .stdout("3 5 7\n10 11 8\n12 2 9\n");
}

#[test]
fn test_sort_with_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_graph(&temp_dir, SMALL);

    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.args([path.as_str(), "--disable", "7"]);
    cmd.assert().success().stdout("3 5\n10\n12\n");
}

#[test]
fn test_chain_with_repeated_disable() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.args(["--disable", "3", "--disable", "99"]);
    cmd.write_stdin(r#"{"1": ["2"], "2": ["3"], "3": ["4"]}"#);
    cmd.assert().success().stdout("4\n");
}

#[test]
fn test_flatten_from_stdin() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.arg("--flatten");
    cmd.write_stdin(r#"{"1": ["2"], "2": ["3"], "3": ["4"]}"#);
    cmd.assert().success().stdout("4\n3\n2\n1\n");
}

#[test]
fn test_json_output() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.arg("--json");
    cmd.write_stdin(r#"{"b": ["a"], "c": ["a"]}"#);
    cmd.assert()
        .success()
        .stdout("[[\"a\"],[\"b\",\"c\"]]\n");
}

#[test]
fn test_json_output_is_array() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.arg("--json");
    cmd.write_stdin(r#"{"b": ["a"], "c": ["a"]}"#);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.is_array());
    assert_eq!(value, serde_json::json!([["a"], ["b", "c"]]));
}

#[test]
fn test_json_flatten_output() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.args(["--json", "--flatten"]);
    cmd.write_stdin(r#"{"1": ["2"], "2": ["3"]}"#);
    cmd.assert().success().stdout("[\"3\",\"2\",\"1\"]\n");
}

#[test]
fn test_disable_name_with_comma() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.args(["--disable", "a,b"]);
    cmd.write_stdin(r#"{"c": ["a,b"], "d": []}"#);
    cmd.assert().success().stdout("d\n");
}

#[test]
fn test_empty_graph() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.write_stdin("{}");
    cmd.assert().success().stdout("");
}

#[test]
fn test_cycle_fails() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.write_stdin(r#"{"1": ["2"], "2": ["3"], "3": ["4"], "4": ["1"], "6": ["7"]}"#);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Circular dependencies exist among these nodes: 1, 2, 3, 4",
        ));
}

#[test]
fn test_invalid_json_fails() {
    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.write_stdin("not json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.json");

    let mut cmd = Command::cargo_bin("tolerant-toposort").unwrap();
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}
