mod common;

use std::fs;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use kira_tlogqc::tlog::layout::{HEADER_SIZE, MAX_SAMPLES_PER_AXIS, SUBBEAM_SIZE, write_header};
use kira_tlogqc::tlog::reader::{decode_tlog, read_tlog};
use kira_tlogqc::tlog::writer::write_tlog;
use kira_tlogqc::tlog::{AXIS_MLC, LogReader, VarianLogReader};
use tempfile::TempDir;

fn encoded(n: usize, leaves: usize) -> Vec<u8> {
    let log = common::fixture_log(n, leaves, &[1, leaves]);
    let mut buf = Vec::new();
    write_tlog(&mut buf, &log).unwrap();
    buf
}

#[test]
fn written_fixture_decodes() {
    let original = common::fixture_log(12, 8, &[2, 7]);
    let mut buf = Vec::new();
    write_tlog(&mut buf, &original).unwrap();

    let log = decode_tlog(&buf).unwrap();
    assert_eq!(log.header.signature, "VOSTL");
    assert_eq!(log.header.version, "3.0");
    assert_eq!(log.header.sampling_interval_ms, common::SAMPLING_MS);
    assert_eq!(log.header.num_snapshots, 12);
    assert_eq!(log.subbeams.len(), 1);
    assert_eq!(log.subbeams[0].name, "Field 1");
    assert_eq!(log.num_leaves(), 8);
    assert_eq!(log.axes.mlc.moving_leaves(0.003), vec![2, 7]);
    assert_eq!(log.num_beamholds(), 2);
    assert!(log.axes.jaws.x1.is_some());
    assert!(log.axes.jaws.x2.is_none());
    assert_eq!(log, original);
}

#[test]
fn layout_size_matches_header() {
    let buf = encoded(5, 4);
    // collimator, gantry, Y1, X1, MU, beam hold, control point, MLC
    let snapshot_values = 7 + (2 + 4);
    assert_eq!(
        buf.len(),
        HEADER_SIZE + SUBBEAM_SIZE + 5 * snapshot_values * 2 * 4
    );
    let log = decode_tlog(&buf).unwrap();
    let mlc_index = log
        .header
        .axis_codes
        .iter()
        .position(|&c| c == AXIS_MLC)
        .unwrap();
    assert_eq!(log.header.samples_per_axis[mlc_index], 6);
}

#[test]
fn wrong_signature_is_rejected() {
    let mut buf = encoded(4, 4);
    buf[..5].copy_from_slice(b"XXXXX");
    let err = decode_tlog(&buf).unwrap_err();
    assert!(format!("{:#}", err).contains("signature"));
}

#[test]
fn truncated_data_is_rejected() {
    let buf = encoded(6, 4);
    let err = decode_tlog(&buf[..buf.len() - 3]).unwrap_err();
    assert!(format!("{:#}", err).contains("truncated"));
    assert!(decode_tlog(&buf[..100]).is_err());
    assert!(decode_tlog(&[]).is_err());
}

#[test]
fn gzip_input_decodes() {
    let tmp = TempDir::new().unwrap();
    let raw = encoded(8, 6);
    let path = tmp.path().join("delivery.bin.gz");
    let mut enc = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    enc.write_all(&raw).unwrap();
    enc.finish().unwrap();

    let log = VarianLogReader.read(&path).unwrap();
    assert_eq!(log.axes.num_snapshots(), 8);
    assert_eq!(log.num_leaves(), 6);
}

#[test]
fn garbage_file_fails_to_read() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.txt");
    fs::write(&path, "not a trajectory log").unwrap();
    assert!(read_tlog(&path).is_err());

    let empty = tmp.path().join("empty.bin");
    fs::write(&empty, b"").unwrap();
    assert!(read_tlog(&empty).is_err());
}

/// A bare header claiming an absurd MLC sample count with no snapshots.
fn oversized_mlc_header(samples: i32) -> Vec<u8> {
    let mut header = common::fixture_log(1, 4, &[1]).header;
    let mlc_index = header
        .axis_codes
        .iter()
        .position(|&c| c == AXIS_MLC)
        .unwrap();
    header.samples_per_axis[mlc_index] = samples;
    header.num_subbeams = 0;
    header.num_snapshots = 0;
    let mut buf = Vec::new();
    write_header(&mut buf, &header).unwrap();
    buf
}

#[test]
fn oversized_sample_count_is_rejected() {
    let buf = oversized_mlc_header(i32::MAX);
    assert_eq!(buf.len(), HEADER_SIZE);
    let err = decode_tlog(&buf).unwrap_err();
    assert!(format!("{:#}", err).contains("samples per axis"));

    assert!(decode_tlog(&oversized_mlc_header(MAX_SAMPLES_PER_AXIS + 1)).is_err());
    assert!(decode_tlog(&oversized_mlc_header(MAX_SAMPLES_PER_AXIS)).is_ok());
}
