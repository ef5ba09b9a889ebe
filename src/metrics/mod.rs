use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::math::stats::ErrorSummary;
use crate::tlog::TrajectoryLog;

pub mod derive;
pub mod mlc;

use mlc::{BankSplit, MlcMetrics};

/// Validated, strictly positive time between snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingInterval(f64);

impl SamplingInterval {
    pub fn from_millis(ms: f64) -> Result<Self, AnalysisError> {
        Self::from_seconds(ms / 1000.0).map_err(|_| {
            AnalysisError::configuration(format!(
                "sampling interval must be positive, got {} ms",
                ms
            ))
        })
    }

    pub fn from_seconds(seconds: f64) -> Result<Self, AnalysisError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(AnalysisError::configuration(format!(
                "sampling interval must be positive, got {} s",
                seconds
            )));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    pub fn millis(&self) -> f64 {
        self.0 * 1000.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedAxis {
    pub difference: Vec<f64>,
    pub speed_actual: Vec<f64>,
    pub speed_expected: Vec<f64>,
    pub speed_error: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSummary {
    pub name: String,
    pub difference: ErrorSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryMetrics {
    pub sampling: SamplingInterval,
    pub control_points: Vec<f64>,
    pub mu: DerivedAxis,
    pub dose_rate_actual: Vec<f64>,
    pub dose_rate_expected: Vec<f64>,
    pub gantry: DerivedAxis,
    pub collimator: DerivedAxis,
    pub mlc: MlcMetrics,
    pub num_beamholds: usize,
    pub summaries: Vec<AxisSummary>,
}

impl DeliveryMetrics {
    /// Control points aligned with derivative series (first one dropped).
    pub fn speed_control_points(&self) -> &[f64] {
        self.control_points.get(1..).unwrap_or(&[])
    }
}

pub fn compute_delivery_metrics(
    log: &TrajectoryLog,
    config: &AnalysisConfig,
) -> Result<DeliveryMetrics, AnalysisError> {
    config.validate()?;
    let sampling = SamplingInterval::from_millis(log.header.sampling_interval_ms as f64)?;
    let split = BankSplit::resolve(config.bank_split, log.num_leaves())?;

    let axes = &log.axes;
    let mu = derive::derive_axis(&axes.mu, sampling);
    let gantry = derive::derive_axis(&axes.gantry, sampling);
    let collimator = derive::derive_axis(&axes.collimator, sampling);
    let mlc = mlc::derive_mlc(&axes.mlc, split, config.moved_threshold, sampling);

    let mut summaries = vec![
        summary("MU", &mu.difference),
        summary("Gantry", &gantry.difference),
        summary("Collimator", &collimator.difference),
    ];
    for (name, axis) in axes.jaws.named() {
        summaries.push(summary(&format!("Jaw {}", name), &axis.difference));
    }
    summaries.push(summary("MLC bank A", &mlc.bank_a.error));
    summaries.push(summary("MLC bank B", &mlc.bank_b.error));

    Ok(DeliveryMetrics {
        sampling,
        control_points: axes.control_point.actual.clone(),
        dose_rate_actual: derive::dose_rate(&axes.mu.actual, sampling),
        dose_rate_expected: derive::dose_rate(&axes.mu.expected, sampling),
        mu,
        gantry,
        collimator,
        mlc,
        num_beamholds: log.num_beamholds(),
        summaries,
    })
}

fn summary(name: &str, values: &[f64]) -> AxisSummary {
    AxisSummary {
        name: name.to_string(),
        difference: ErrorSummary::from_values(values),
    }
}
