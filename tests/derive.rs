use kira_tlogqc::metrics::SamplingInterval;
use kira_tlogqc::metrics::derive::{derive_axis, dose_rate, speed, speed_error};
use kira_tlogqc::tlog::Axis;

fn dt(ms: f64) -> SamplingInterval {
    SamplingInterval::from_millis(ms).unwrap()
}

#[test]
fn speed_has_one_fewer_sample() {
    let values: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
    let v = speed(&values, dt(100.0));
    assert_eq!(v.len(), 9);
    for (i, s) in v.iter().enumerate() {
        let expected = (values[i + 1] - values[i]) / 0.1;
        assert!((s - expected).abs() < 1e-9);
    }
}

#[test]
fn speed_error_is_actual_minus_expected() {
    let axis = Axis::new(
        vec![0.0, 1.0, 3.0, 6.0, 6.5],
        vec![0.0, 1.5, 2.5, 6.0, 7.0],
    );
    let derived = derive_axis(&axis, dt(20.0));
    assert_eq!(derived.speed_actual.len(), 4);
    assert_eq!(derived.speed_error.len(), 4);
    for i in 0..4 {
        let want = derived.speed_actual[i] - derived.speed_expected[i];
        assert_eq!(derived.speed_error[i], want);
    }
    assert_eq!(
        speed_error(&axis.actual, &axis.expected, dt(20.0)),
        derived.speed_error
    );
}

#[test]
fn short_series_yield_empty_derivatives() {
    for n in 0..=1 {
        let axis = Axis::new(vec![2.0; n], vec![1.0; n]);
        let derived = derive_axis(&axis, dt(100.0));
        assert!(derived.speed_actual.is_empty());
        assert!(derived.speed_expected.is_empty());
        assert!(derived.speed_error.is_empty());
        assert_eq!(derived.difference.len(), n);
    }
}

#[test]
fn dose_rate_matches_mu_per_minute() {
    let mu: Vec<f64> = (0..100).map(|i| i as f64 * 0.5 + (i % 3) as f64).collect();
    let rate = dose_rate(&mu, dt(100.0));
    assert_eq!(rate.len(), 99);
    for i in 0..99 {
        let expected = (mu[i + 1] - mu[i]) / 0.1 * 60.0;
        assert!((rate[i] - expected).abs() < 1e-9);
    }
}

#[test]
fn sampling_interval_must_be_positive() {
    assert!(SamplingInterval::from_millis(0.0).is_err());
    assert!(SamplingInterval::from_millis(-20.0).is_err());
    assert!(SamplingInterval::from_seconds(f64::NAN).is_err());
    let ok = SamplingInterval::from_millis(20.0).unwrap();
    assert!((ok.seconds() - 0.02).abs() < 1e-12);
    assert!((ok.millis() - 20.0).abs() < 1e-9);
}
