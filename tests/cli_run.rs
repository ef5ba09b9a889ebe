mod common;

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn batch_run_reports_each_file() {
    let tmp = TempDir::new().unwrap();
    let logs = tmp.path().join("logs");
    fs::create_dir(&logs).unwrap();
    common::write_default_fixture(&logs, "a.bin");
    common::write_default_fixture(&logs, "b.bin");
    fs::write(logs.join("c.bin"), b"corrupt").unwrap();
    let out = tmp.path().join("reports");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let output = cmd
        .arg("run")
        .arg("--input")
        .arg(&logs)
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Batch Mode"));
    assert!(text.contains("Finished analyzing a.bin"));
    assert!(text.contains("Finished analyzing b.bin"));
    assert_eq!(text.matches("Analysis failed for c.bin").count(), 1);
    assert!(out.join("a.pdf").is_file());
    assert!(out.join("b.pdf").is_file());
    assert!(!out.join("c.pdf").exists());
}

#[test]
fn single_file_failure_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("bad.bin");
    fs::write(&input, b"corrupt").unwrap();

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let output = cmd
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(tmp.path().join("reports"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("File Mode"));
    assert!(text.contains("Analysis failed for bad.bin"));
}

#[test]
fn prompted_input_is_used() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_default_fixture(tmp.path(), "arc.bin");
    let out = tmp.path().join("reports");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    cmd.arg("run")
        .arg("--out")
        .arg(&out)
        .write_stdin(format!("{}\n", input.display()));
    cmd.assert().success();
    assert!(out.join("arc.pdf").is_file());
}

#[test]
fn missing_input_fails_without_output_dir() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("reports");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(tmp.path().join("nope"))
        .arg("--out")
        .arg(&out);
    cmd.assert().failure();
    assert!(!out.exists());
}
