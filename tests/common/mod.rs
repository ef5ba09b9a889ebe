#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kira_tlogqc::tlog::writer::write_tlog_file;
use kira_tlogqc::tlog::{Axis, AxisData, Jaws, Mlc, Subbeam, TrajectoryLog};

pub const SAMPLING_MS: i32 = 100;

fn series(n: usize, f: impl Fn(usize) -> f64) -> Vec<f64> {
    (0..n).map(f).collect()
}

/// `n` snapshots, `num_leaves` leaves of which `moved` (1-based) travel.
pub fn fixture_log(n: usize, num_leaves: usize, moved: &[usize]) -> TrajectoryLog {
    let control_point = Axis::new(series(n, |i| i as f64), series(n, |i| i as f64));
    let mu = Axis::new(
        series(n, |i| (i * i) as f64 * 0.25),
        series(n, |i| (i * i) as f64 * 0.25 + 0.5),
    );
    let gantry = Axis::new(series(n, |i| 180.0 + i as f64), series(n, |i| 180.0 + i as f64 - 0.125));
    let collimator = Axis::new(vec![10.0; n], vec![10.0; n]);
    // Holds start at snapshots 3 and 7.
    let beam_hold = Axis::new(
        series(n, |i| if (3..5).contains(&i) || (7..8).contains(&i) { 1.0 } else { 0.0 }),
        vec![0.0; n],
    );

    let leaves = (1..=num_leaves)
        .map(|leaf| {
            if moved.contains(&leaf) {
                let actual = series(n, |i| leaf as f64 * 0.5 + i as f64 * 0.25);
                let expected = series(n, |i| leaf as f64 * 0.5 + i as f64 * 0.25 - 0.0625);
                Axis::new(actual, expected)
            } else {
                Axis::new(vec![1.5; n], vec![1.5; n])
            }
        })
        .collect();
    let mlc = Mlc {
        carriage_a: Axis::new(vec![0.0; n], vec![0.0; n]),
        carriage_b: Axis::new(vec![0.0; n], vec![0.0; n]),
        leaves,
    };

    let axes = AxisData {
        control_point,
        mu,
        gantry,
        collimator,
        beam_hold,
        jaws: Jaws {
            x1: Some(Axis::new(vec![5.0; n], vec![5.0; n])),
            y1: Some(Axis::new(vec![4.0; n], vec![3.5; n])),
            ..Jaws::default()
        },
        mlc,
        other: BTreeMap::new(),
    };
    let subbeams = vec![Subbeam {
        control_point: 0,
        mu: 100.0,
        rad_time: 12.5,
        sequence: 0,
        name: "Field 1".to_string(),
    }];
    TrajectoryLog::from_axes(SAMPLING_MS, subbeams, axes)
}

pub fn write_fixture(dir: &Path, name: &str, log: &TrajectoryLog) -> PathBuf {
    let path = dir.join(name);
    write_tlog_file(&path, log).unwrap();
    path
}

pub fn write_default_fixture(dir: &Path, name: &str) -> PathBuf {
    write_fixture(dir, name, &fixture_log(12, 8, &[2, 3, 6, 7, 8]))
}
