//! Varian trajectory log model and decoder.
//!
//! A log is a fixed-size header, a block of subbeam records and a dense
//! snapshot matrix. Each snapshot carries `samples_per_axis[i]` expected/actual
//! pairs for every axis listed in the header.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

pub mod layout;
pub mod reader;
pub mod writer;

pub use layout::TlogHeader;

pub const AXIS_COLLIMATOR: i32 = 0;
pub const AXIS_GANTRY: i32 = 1;
pub const AXIS_Y1: i32 = 2;
pub const AXIS_Y2: i32 = 3;
pub const AXIS_X1: i32 = 4;
pub const AXIS_X2: i32 = 5;
pub const AXIS_MU: i32 = 40;
pub const AXIS_BEAM_HOLD: i32 = 41;
pub const AXIS_CONTROL_POINT: i32 = 42;
pub const AXIS_MLC: i32 = 50;

/// Source of decoded trajectory logs.
pub trait LogReader {
    fn read(&self, path: &Path) -> Result<TrajectoryLog>;
}

/// Reads the binary `.bin` format (optionally gzip-compressed).
#[derive(Debug, Default, Clone, Copy)]
pub struct VarianLogReader;

impl LogReader for VarianLogReader {
    fn read(&self, path: &Path) -> Result<TrajectoryLog> {
        reader::read_tlog(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub actual: Vec<f64>,
    pub expected: Vec<f64>,
    pub difference: Vec<f64>,
}

impl Axis {
    pub fn new(actual: Vec<f64>, expected: Vec<f64>) -> Self {
        let difference = actual
            .iter()
            .zip(expected.iter())
            .map(|(a, e)| a - e)
            .collect();
        Self {
            actual,
            expected,
            difference,
        }
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            actual: Vec::with_capacity(n),
            expected: Vec::with_capacity(n),
            difference: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, expected: f64, actual: f64) {
        self.expected.push(expected);
        self.actual.push(actual);
        self.difference.push(actual - expected);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Jaws {
    pub x1: Option<Axis>,
    pub x2: Option<Axis>,
    pub y1: Option<Axis>,
    pub y2: Option<Axis>,
}

impl Jaws {
    pub fn named(&self) -> Vec<(&'static str, &Axis)> {
        [
            ("X1", self.x1.as_ref()),
            ("X2", self.x2.as_ref()),
            ("Y1", self.y1.as_ref()),
            ("Y2", self.y2.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, axis)| axis.map(|a| (name, a)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mlc {
    pub carriage_a: Axis,
    pub carriage_b: Axis,
    /// Index 0 holds leaf 1.
    pub leaves: Vec<Axis>,
}

impl Mlc {
    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf numbers are 1-based.
    pub fn leaf(&self, leaf: usize) -> Option<&Axis> {
        leaf.checked_sub(1).and_then(|i| self.leaves.get(i))
    }

    /// A leaf moved when the population standard deviation of its actual
    /// position exceeds `threshold`. Constant leaves never qualify.
    pub fn leaf_moved(&self, leaf: usize, threshold: f64) -> bool {
        match self.leaf(leaf) {
            Some(axis) => std_dev(&axis.actual) > threshold,
            None => false,
        }
    }

    pub fn moving_leaves(&self, threshold: f64) -> Vec<usize> {
        (1..=self.num_leaves())
            .filter(|&leaf| self.leaf_moved(leaf, threshold))
            .collect()
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisData {
    pub control_point: Axis,
    pub mu: Axis,
    pub gantry: Axis,
    pub collimator: Axis,
    pub beam_hold: Axis,
    pub jaws: Jaws,
    pub mlc: Mlc,
    /// Couch, tracking and other axes by header code.
    pub other: BTreeMap<i32, Vec<Axis>>,
}

impl AxisData {
    pub fn num_snapshots(&self) -> usize {
        self.control_point.len()
    }

    /// Sample columns of an axis in on-disk order.
    pub fn columns(&self, code: i32) -> Option<Vec<&Axis>> {
        fn single(axis: &Option<Axis>) -> Option<Vec<&Axis>> {
            axis.as_ref().map(|a| vec![a])
        }
        match code {
            AXIS_COLLIMATOR => Some(vec![&self.collimator]),
            AXIS_GANTRY => Some(vec![&self.gantry]),
            AXIS_Y1 => single(&self.jaws.y1),
            AXIS_Y2 => single(&self.jaws.y2),
            AXIS_X1 => single(&self.jaws.x1),
            AXIS_X2 => single(&self.jaws.x2),
            AXIS_MU => Some(vec![&self.mu]),
            AXIS_BEAM_HOLD => Some(vec![&self.beam_hold]),
            AXIS_CONTROL_POINT => Some(vec![&self.control_point]),
            AXIS_MLC => {
                let mut cols = vec![&self.mlc.carriage_a, &self.mlc.carriage_b];
                cols.extend(self.mlc.leaves.iter());
                Some(cols)
            }
            other => self.other.get(&other).map(|axes| axes.iter().collect()),
        }
    }

    /// Axis codes present, in the order the writer emits them.
    pub fn codes(&self) -> Vec<i32> {
        let mut codes = vec![AXIS_COLLIMATOR, AXIS_GANTRY];
        for (code, axis) in [
            (AXIS_Y1, &self.jaws.y1),
            (AXIS_Y2, &self.jaws.y2),
            (AXIS_X1, &self.jaws.x1),
            (AXIS_X2, &self.jaws.x2),
        ] {
            if axis.is_some() {
                codes.push(code);
            }
        }
        codes.extend(self.other.keys().copied().filter(|c| *c < AXIS_MU));
        codes.extend([AXIS_MU, AXIS_BEAM_HOLD, AXIS_CONTROL_POINT, AXIS_MLC]);
        codes.extend(self.other.keys().copied().filter(|c| *c >= AXIS_MU));
        codes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subbeam {
    pub control_point: i32,
    pub mu: f32,
    pub rad_time: f32,
    pub sequence: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryLog {
    pub header: TlogHeader,
    pub subbeams: Vec<Subbeam>,
    pub axes: AxisData,
}

impl TrajectoryLog {
    /// Builds a log whose header is consistent with `axes`.
    pub fn from_axes(sampling_interval_ms: i32, subbeams: Vec<Subbeam>, axes: AxisData) -> Self {
        let codes = axes.codes();
        let samples = codes
            .iter()
            .map(|&c| axes.columns(c).map(|cols| cols.len() as i32).unwrap_or(0))
            .collect();
        let header = TlogHeader {
            signature: layout::SIGNATURE.to_string(),
            version: "3.0".to_string(),
            header_size: layout::HEADER_SIZE as i32,
            sampling_interval_ms,
            axis_codes: codes,
            samples_per_axis: samples,
            axis_scale: 1,
            num_subbeams: subbeams.len() as i32,
            is_truncated: false,
            num_snapshots: axes.num_snapshots() as i32,
            mlc_model: 2,
        };
        Self {
            header,
            subbeams,
            axes,
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.axes.mlc.num_leaves()
    }

    pub fn num_moving_leaves(&self, threshold: f64) -> usize {
        self.axes.mlc.moving_leaves(threshold).len()
    }

    /// Number of times the beam-hold signal stepped up.
    pub fn num_beamholds(&self) -> usize {
        self.axes
            .beam_hold
            .actual
            .windows(2)
            .filter(|w| w[1] - w[0] > 0.0)
            .count()
    }
}
