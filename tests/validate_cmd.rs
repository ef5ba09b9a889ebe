mod common;

use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn validate_command_ok() {
    let tmp = TempDir::new().unwrap();
    let path = common::write_default_fixture(tmp.path(), "plan.bin");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let out = cmd.arg("validate").arg("--input").arg(&path).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("File: plan.bin"));
    assert!(text.contains("Moving leaves: 5 of 8"));
    assert!(text.contains("Beam holds: 2"));
    assert!(std::fs::read_dir(tmp.path()).unwrap().count() == 1);
}

#[test]
fn validate_json_document() {
    let tmp = TempDir::new().unwrap();
    let path = common::write_default_fixture(tmp.path(), "plan.bin");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let out = cmd
        .arg("validate")
        .arg("--input")
        .arg(&path)
        .arg("--json")
        .output()
        .unwrap();
    assert!(out.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["tool"]["schema"], "v1");
    assert_eq!(doc["file"], "plan.bin");
    assert_eq!(doc["header"]["signature"], "VOSTL");
    assert_eq!(doc["mlc"]["num_leaves"], 8);
    assert_eq!(doc["mlc"]["bank_split"], 4);
    assert_eq!(doc["mlc"]["moved_leaves"], serde_json::json!([2, 3, 6, 7, 8]));
    assert_eq!(doc["num_beamholds"], 2);
}

#[test]
fn validate_rejects_corrupt_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("junk.bin");
    std::fs::write(&path, b"junk").unwrap();

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    cmd.arg("validate").arg("--input").arg(&path);
    cmd.assert().failure();
}

#[test]
fn validate_applies_analysis_flags() {
    let tmp = TempDir::new().unwrap();
    let path = common::write_default_fixture(tmp.path(), "plan.bin");

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let out = cmd
        .args(["validate", "--json", "--bank-split", "2", "--input"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(out.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["mlc"]["bank_split"], 2);
    assert_eq!(doc["mlc"]["bank_a_moved"], 1);
    assert_eq!(doc["mlc"]["bank_b_moved"], 4);

    let mut cmd = Command::cargo_bin("kira-tlogqc").unwrap();
    let out = cmd
        .args(["validate", "--json", "--moved-threshold", "1.0", "--input"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(out.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["mlc"]["moved_leaves"], serde_json::json!([]));
}
