use serde::{Deserialize, Serialize};

use crate::math::stats::ErrorSummary;

pub const SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub schema: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderMeta {
    pub signature: String,
    pub version: String,
    pub sampling_interval_ms: i32,
    pub num_axes: usize,
    pub axis_codes: Vec<i32>,
    pub num_subbeams: usize,
    pub num_snapshots: usize,
    pub mlc_model: String,
    pub is_truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubbeamMeta {
    pub control_point: i32,
    pub mu: f32,
    pub rad_time: f32,
    pub sequence: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlcMeta {
    pub num_leaves: usize,
    pub bank_split: usize,
    pub moved_leaves: Vec<usize>,
    pub bank_a_moved: usize,
    pub bank_b_moved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisError {
    pub axis: String,
    pub samples: usize,
    pub mean: f64,
    pub rms: f64,
    pub max_abs: f64,
    pub median_abs: f64,
}

impl AxisError {
    pub fn new(axis: impl Into<String>, s: &ErrorSummary) -> Self {
        Self {
            axis: axis.into(),
            samples: s.samples,
            mean: s.mean,
            rms: s.rms,
            max_abs: s.max_abs,
            median_abs: s.median_abs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlogSummaryV1 {
    pub tool: ToolMeta,
    pub file: String,
    pub header: HeaderMeta,
    pub subbeams: Vec<SubbeamMeta>,
    pub mlc: MlcMeta,
    pub num_beamholds: usize,
    pub axis_errors: Vec<AxisError>,
    pub warnings: Vec<String>,
}
