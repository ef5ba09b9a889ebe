//! Summary statistics over error samples.
//!
//! Note: `median` reorders the input slice.

use serde::Serialize;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        let a = values[n / 2 - 1];
        let b = values[n / 2];
        (a + b) / 2.0
    }
}

pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub samples: usize,
    pub mean: f64,
    pub rms: f64,
    pub max_abs: f64,
    pub median_abs: f64,
}

impl ErrorSummary {
    /// Non-finite samples are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mut abs: Vec<f64> = finite.iter().map(|v| v.abs()).collect();
        Self {
            samples: finite.len(),
            mean: mean(&finite),
            rms: rms(&finite),
            max_abs: max_abs(&finite),
            median_abs: median(&mut abs),
        }
    }
}
