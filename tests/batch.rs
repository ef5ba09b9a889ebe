mod common;

use std::fs;

use kira_tlogqc::batch::{self, BatchMode, analyze_file};
use kira_tlogqc::config::AnalysisConfig;
use kira_tlogqc::error::AnalysisError;
use kira_tlogqc::tlog::AXIS_MLC;
use kira_tlogqc::tlog::layout::write_header;
use tempfile::TempDir;

fn pdfs_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn directory_with_one_corrupt_file() {
    for corrupt in ["a.bin", "b.bin", "c.bin"] {
        let tmp = TempDir::new().unwrap();
        let logs = tmp.path().join("logs");
        fs::create_dir(&logs).unwrap();
        for name in ["a.bin", "b.bin", "c.bin"] {
            if name == corrupt {
                fs::write(logs.join(name), b"VOSTL but not really").unwrap();
            } else {
                common::write_default_fixture(&logs, name);
            }
        }
        let out = tmp.path().join("out");
        let report = batch::run(&logs, &AnalysisConfig::with_out_dir(&out)).unwrap();

        assert_eq!(report.mode, BatchMode::Directory);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded().count(), 2);
        let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec![corrupt]);
        assert!(matches!(
            report.failed().next().unwrap().result,
            Err(AnalysisError::Decode { .. })
        ));
        assert_eq!(pdfs_in(&out).len(), 2);
        assert!(pdfs_in(&out).iter().all(|n| n.ends_with(".pdf")));
    }
}

#[test]
fn missing_input_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let err = batch::run(
        &tmp.path().join("missing.bin"),
        &AnalysisConfig::with_out_dir(&out),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::InputNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn single_file_report_name() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_default_fixture(tmp.path(), "Arc1_20240101.bin");
    let out = tmp.path().join("reports");
    let report = batch::run(&input, &AnalysisConfig::with_out_dir(&out)).unwrap();
    assert_eq!(report.mode, BatchMode::File);
    let written = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(written, &out.join("Arc1_20240101.pdf"));
    assert!(fs::read(written).unwrap().starts_with(b"%PDF"));
    assert_eq!(pdfs_in(&out), vec!["Arc1_20240101.pdf".to_string()]);
}

#[test]
fn failed_file_leaves_no_report() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("broken.bin");
    fs::write(&input, vec![0u8; 2048]).unwrap();
    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();

    let err = analyze_file(&input, &AnalysisConfig::with_out_dir(&out)).unwrap_err();
    assert_eq!(err.kind(), "decode");
    assert!(err.to_string().contains("broken.bin"));
    assert!(pdfs_in(&out).is_empty());
}

#[test]
fn zero_sampling_interval_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let mut log = common::fixture_log(6, 4, &[1]);
    log.header.sampling_interval_ms = 0;
    let input = common::write_fixture(tmp.path(), "zero.bin", &log);
    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();

    let err = analyze_file(&input, &AnalysisConfig::with_out_dir(&out)).unwrap_err();
    assert!(matches!(err, AnalysisError::Configuration(_)));
    assert!(pdfs_in(&out).is_empty());
}

#[test]
fn oversized_header_fails_alone() {
    let tmp = TempDir::new().unwrap();
    let logs = tmp.path().join("logs");
    fs::create_dir(&logs).unwrap();
    common::write_default_fixture(&logs, "a.bin");
    common::write_default_fixture(&logs, "c.bin");

    let mut header = common::fixture_log(1, 4, &[1]).header;
    let mlc_index = header
        .axis_codes
        .iter()
        .position(|&c| c == AXIS_MLC)
        .unwrap();
    header.samples_per_axis[mlc_index] = i32::MAX;
    header.num_subbeams = 0;
    header.num_snapshots = 0;
    let mut buf = Vec::new();
    write_header(&mut buf, &header).unwrap();
    fs::write(logs.join("b.bin"), buf).unwrap();

    let out = tmp.path().join("out");
    let report = batch::run(&logs, &AnalysisConfig::with_out_dir(&out)).unwrap();
    let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec!["b.bin"]);
    assert_eq!(pdfs_in(&out), vec!["a.pdf".to_string(), "c.pdf".to_string()]);
}

#[test]
fn colliding_report_names_are_reported() {
    let tmp = TempDir::new().unwrap();
    let logs = tmp.path().join("logs");
    fs::create_dir(&logs).unwrap();
    for name in ["a.bin", "a.bin.gz", "a.dlg", "b.bin"] {
        common::write_default_fixture(&logs, name);
    }
    let out = tmp.path().join("out");
    let report = batch::run(&logs, &AnalysisConfig::with_out_dir(&out)).unwrap();

    let succeeded: Vec<&str> = report.succeeded().map(|o| o.name.as_str()).collect();
    assert_eq!(succeeded, vec!["a.bin", "b.bin"]);
    for outcome in report.failed() {
        let err = outcome.result.as_ref().unwrap_err();
        assert_eq!(err.kind(), "report");
        let msg = err.to_string();
        assert!(msg.contains(&outcome.name));
        assert!(msg.contains("a.pdf"));
        assert!(msg.contains("a.bin"));
    }
    assert_eq!(report.failed().count(), 2);
    assert_eq!(pdfs_in(&out), vec!["a.pdf".to_string(), "b.pdf".to_string()]);
}

#[test]
fn analyze_file_needs_existing_output_dir() {
    let tmp = TempDir::new().unwrap();
    let input = common::write_default_fixture(tmp.path(), "arc.bin");
    let out = tmp.path().join("never-made");

    let err = analyze_file(&input, &AnalysisConfig::with_out_dir(&out)).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(!out.exists());
}
