use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::io::read_log_bytes;
use crate::tlog::layout::{
    SUBBEAM_NAME_LEN, SUBBEAM_RESERVED_LEN, SUBBEAM_SIZE, TlogHeader, read_f32, read_header,
    read_i32, read_text, skip,
};
use crate::tlog::{
    AXIS_BEAM_HOLD, AXIS_COLLIMATOR, AXIS_CONTROL_POINT, AXIS_GANTRY, AXIS_MLC, AXIS_MU, AXIS_X1,
    AXIS_X2, AXIS_Y1, AXIS_Y2, Axis, AxisData, Jaws, Mlc, Subbeam, TrajectoryLog,
};

pub fn read_tlog(path: &Path) -> Result<TrajectoryLog> {
    let bytes = read_log_bytes(path)?;
    let log = decode_tlog(&bytes).with_context(|| format!("invalid log {}", path.display()))?;
    debug!(
        path = %path.display(),
        snapshots = log.axes.num_snapshots(),
        leaves = log.num_leaves(),
        "tlog_decoded"
    );
    Ok(log)
}

pub fn decode_tlog(bytes: &[u8]) -> Result<TrajectoryLog> {
    let header = read_header(bytes)?;
    let header_size = header.header_size as usize;
    let n_subbeams = header.num_subbeams as usize;
    let n_snapshots = header.num_snapshots as usize;

    let subbeams_end = header_size + n_subbeams * SUBBEAM_SIZE;
    let expected = header
        .snapshot_bytes()
        .checked_mul(n_snapshots)
        .and_then(|data| data.checked_add(subbeams_end))
        .context("declared log size overflows")?;
    if bytes.len() < expected {
        bail!(
            "log truncated: expected at least {} bytes, got {}",
            expected,
            bytes.len()
        );
    }

    let subbeams = read_subbeams(&bytes[header_size..subbeams_end], n_subbeams)?;
    let axes = read_axis_data(&bytes[subbeams_end..expected], &header)?;

    Ok(TrajectoryLog {
        header,
        subbeams,
        axes,
    })
}

fn read_subbeams(mut r: &[u8], n: usize) -> Result<Vec<Subbeam>> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let control_point = read_i32(&mut r)?;
        let mu = read_f32(&mut r)?;
        let rad_time = read_f32(&mut r)?;
        let sequence = read_i32(&mut r)?;
        let name = read_text(&mut r, SUBBEAM_NAME_LEN)
            .with_context(|| format!("failed to read subbeam {} name", i))?;
        skip(&mut r, SUBBEAM_RESERVED_LEN)?;
        out.push(Subbeam {
            control_point,
            mu,
            rad_time,
            sequence,
            name,
        });
    }
    Ok(out)
}

fn read_axis_data(data: &[u8], header: &TlogHeader) -> Result<AxisData> {
    let n_snapshots = header.num_snapshots as usize;
    let mut columns: Vec<Vec<Axis>> = header
        .samples_per_axis
        .iter()
        .map(|&s| (0..s).map(|_| Axis::with_capacity(n_snapshots)).collect())
        .collect();

    let mut r = data;
    for _ in 0..n_snapshots {
        for axis in columns.iter_mut() {
            for sample in axis.iter_mut() {
                let expected = read_f32(&mut r)? as f64;
                let actual = read_f32(&mut r)? as f64;
                sample.push(expected, actual);
            }
        }
    }

    let mut by_code: BTreeMap<i32, Vec<Axis>> = BTreeMap::new();
    for (&code, cols) in header.axis_codes.iter().zip(columns) {
        if by_code.insert(code, cols).is_some() {
            bail!("duplicate axis code {} in header", code);
        }
    }

    let control_point = take_single(&mut by_code, AXIS_CONTROL_POINT, "control point")?;
    let mu = take_single(&mut by_code, AXIS_MU, "MU")?;
    let gantry = take_single(&mut by_code, AXIS_GANTRY, "gantry")?;
    let collimator = take_single(&mut by_code, AXIS_COLLIMATOR, "collimator")?;
    let beam_hold = take_single(&mut by_code, AXIS_BEAM_HOLD, "beam hold")?;
    let jaws = Jaws {
        x1: take_optional(&mut by_code, AXIS_X1),
        x2: take_optional(&mut by_code, AXIS_X2),
        y1: take_optional(&mut by_code, AXIS_Y1),
        y2: take_optional(&mut by_code, AXIS_Y2),
    };

    let mut mlc_cols = by_code
        .remove(&AXIS_MLC)
        .context("trajectory log missing MLC axis")?
        .into_iter();
    let (Some(carriage_a), Some(carriage_b)) = (mlc_cols.next(), mlc_cols.next()) else {
        bail!("MLC axis must carry two carriage samples");
    };
    let mlc = Mlc {
        carriage_a,
        carriage_b,
        leaves: mlc_cols.collect(),
    };

    Ok(AxisData {
        control_point,
        mu,
        gantry,
        collimator,
        beam_hold,
        jaws,
        mlc,
        other: by_code,
    })
}

fn take_single(by_code: &mut BTreeMap<i32, Vec<Axis>>, code: i32, name: &str) -> Result<Axis> {
    let mut cols = by_code
        .remove(&code)
        .with_context(|| format!("trajectory log missing {} axis", name))?;
    if cols.len() != 1 {
        bail!("{} axis has {} samples per snapshot, expected 1", name, cols.len());
    }
    Ok(cols.remove(0))
}

fn take_optional(by_code: &mut BTreeMap<i32, Vec<Axis>>, code: i32) -> Option<Axis> {
    match by_code.remove(&code) {
        Some(mut cols) if cols.len() == 1 => Some(cols.remove(0)),
        Some(cols) => {
            by_code.insert(code, cols);
            None
        }
        None => None,
    }
}
