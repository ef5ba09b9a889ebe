use kira_tlogqc::math::histogram::Histogram;
use kira_tlogqc::math::stats::{ErrorSummary, max_abs, mean, median, rms};

#[test]
fn median_odd_even() {
    let mut v1 = vec![3.0, 1.0, 2.0];
    assert_eq!(median(&mut v1), 2.0);
    let mut v2 = vec![4.0, 1.0, 2.0, 3.0];
    assert_eq!(median(&mut v2), 2.5);
}

#[test]
fn rms_and_max_abs() {
    let v = vec![3.0, -4.0];
    assert!((rms(&v) - (12.5f64).sqrt()).abs() < 1e-12);
    assert_eq!(max_abs(&v), 4.0);
    assert_eq!(mean(&v), -0.5);
}

#[test]
fn summary_skips_non_finite() {
    let s = ErrorSummary::from_values(&[1.0, f64::NAN, -3.0, f64::INFINITY]);
    assert_eq!(s.samples, 2);
    assert_eq!(s.mean, -1.0);
    assert_eq!(s.max_abs, 3.0);
    assert_eq!(s.median_abs, 2.0);
}

#[test]
fn histogram_density_integrates_to_one() {
    let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
    let h = Histogram::density(&values, 50);
    assert_eq!(h.edges.len(), 51);
    assert_eq!(h.density.len(), 50);
    let area: f64 = h.bins().map(|(lo, hi, d)| (hi - lo) * d).sum();
    assert!((area - 1.0).abs() < 1e-9);
}

#[test]
fn histogram_last_bin_is_closed() {
    let h = Histogram::density(&[0.0, 1.0, 2.0, 3.0], 3);
    let total: f64 = h.density.iter().sum::<f64>() * 1.0;
    assert!((total - 1.0).abs() < 1e-9);
    assert!((h.density[2] - 0.5).abs() < 1e-9);
}

#[test]
fn degenerate_and_empty_histograms() {
    let h = Histogram::density(&[2.0, 2.0, 2.0], 4);
    assert_eq!(h.edges.first().copied(), Some(1.5));
    assert_eq!(h.edges.last().copied(), Some(2.5));
    assert!(h.positive_range().is_some());

    let empty = Histogram::density(&[], 50);
    assert!(empty.is_empty());
    assert_eq!(empty.bins().count(), 0);
    assert!(empty.positive_range().is_none());
}
