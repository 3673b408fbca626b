//! End-to-end tests for the verify_md5deep binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_verify_md5deep"))
        .args(args)
        .output()
        .expect("failed to launch verify_md5deep")
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "ship.md5deep.txt",
        "%%%% HASHDEEP-1.0\n%%%% size,md5,sha256,filename\n## Invoked from: /cruise\n1,111,00,./a.txt\n1,222,00,./b.txt\n1,444,00,./c.txt\n",
    );
    let b = write(dir.path(), "shore.md5deep.txt", "111  ./a.txt\n333  ./b.txt\n");
    (dir, a, b)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_differences_exit_zero() {
    let (_dir, a, b) = setup();
    let output = run(&[a.to_str().unwrap(), b.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("~ ./b.txt  (A: 222, B: 333)"));
    assert!(text.contains("- ./c.txt  444"));
    assert!(!text.contains("= ./a.txt"));
}

#[test]
fn test_show_all() {
    let (_dir, a, b) = setup();
    let output = run(&[a.to_str().unwrap(), b.to_str().unwrap(), "-a"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("= ./a.txt  111"));
}

#[test]
fn test_identical_manifests() {
    let (_dir, a, _b) = setup();
    let output = run(&[a.to_str().unwrap(), a.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("manifests are identical"));
}

#[test]
fn test_missing_file_fails() {
    let (dir, a, _b) = setup();
    let missing = dir.path().join("nope.txt");
    let output = run(&[a.to_str().unwrap(), missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("File not found"));
}

#[test]
fn test_malformed_line_fails() {
    let (dir, a, _b) = setup();
    let bad = write(dir.path(), "bad.txt", "1,111,00,./a.txt\n1,222\n");
    let output = run(&[a.to_str().unwrap(), bad.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Line 2"));
}

#[test]
fn test_lenient_skips_malformed_line() {
    let (dir, a, _b) = setup();
    let bad = write(dir.path(), "bad.txt", "1,111,00,./a.txt\n1,222\n");
    let output = run(&[a.to_str().unwrap(), bad.to_str().unwrap(), "--lenient"]);

    assert!(output.status.success());
}

#[test]
fn test_json_output_file() {
    let (dir, a, b) = setup();
    let report = dir.path().join("report.json");
    let output = run(&[
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(printed["summary"]["only_in_a"], 1);

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(written["summary"]["mismatched"], 1);
}
