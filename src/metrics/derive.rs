use crate::metrics::{DerivedAxis, SamplingInterval};
use crate::tlog::Axis;

const SECONDS_PER_MINUTE: f64 = 60.0;

pub fn difference(actual: &[f64], expected: &[f64]) -> Vec<f64> {
    actual.iter().zip(expected).map(|(a, e)| a - e).collect()
}

/// Forward difference divided by the sampling interval; `N - 1` values.
pub fn speed(values: &[f64], dt: SamplingInterval) -> Vec<f64> {
    let dt = dt.seconds();
    values.windows(2).map(|w| (w[1] - w[0]) / dt).collect()
}

pub fn speed_error(actual: &[f64], expected: &[f64], dt: SamplingInterval) -> Vec<f64> {
    difference(&speed(actual, dt), &speed(expected, dt))
}

/// MU per minute from cumulative MU.
pub fn dose_rate(mu: &[f64], dt: SamplingInterval) -> Vec<f64> {
    speed(mu, dt)
        .into_iter()
        .map(|v| v * SECONDS_PER_MINUTE)
        .collect()
}

pub fn derive_axis(axis: &Axis, dt: SamplingInterval) -> DerivedAxis {
    let speed_actual = speed(&axis.actual, dt);
    let speed_expected = speed(&axis.expected, dt);
    let speed_error = difference(&speed_actual, &speed_expected);
    DerivedAxis {
        difference: axis.difference.clone(),
        speed_actual,
        speed_expected,
        speed_error,
    }
}
