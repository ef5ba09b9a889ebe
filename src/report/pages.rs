use anyhow::Result;
use plotters::prelude::*;

use crate::math::histogram::Histogram;
use crate::metrics::mlc::{LeafMetrics, split_halves};
use crate::metrics::{DeliveryMetrics, DerivedAxis};
use crate::report::backend::CanvasBackend;
use crate::report::canvas::{HAlign, PageCanvas, PageKind};
use crate::report::charts::{
    Area, HistogramSeries, LinePanel, Trace, draw_histogram_panel, draw_line_panel,
};
use crate::tlog::{Axis, TrajectoryLog};

const CONTROL_POINT_DESC: &str = "Actual Control Point";
const NO_MOVING_LEAVES: &str = "no moving leaves";
const NO_SAMPLES: &str = "no samples";

/// Everything printed on the cover page.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverInfo {
    pub file_name: String,
    pub header: String,
    pub version: String,
    pub num_subbeams: usize,
    pub num_moving_leaves: usize,
    pub num_beamholds: usize,
    pub sampling_ms: f64,
    pub num_snapshots: usize,
    pub mlc_model: String,
    pub truncated: bool,
    /// (axis, rms, max |difference|)
    pub summary: Vec<(String, f64, f64)>,
}

impl CoverInfo {
    pub fn from_log(file_name: &str, log: &TrajectoryLog, metrics: &DeliveryMetrics) -> Self {
        let header = &log.header;
        Self {
            file_name: file_name.to_string(),
            header: header.signature.clone(),
            version: header.version.clone(),
            num_subbeams: log.subbeams.len(),
            num_moving_leaves: metrics.mlc.leaves.len(),
            num_beamholds: metrics.num_beamholds,
            sampling_ms: metrics.sampling.millis(),
            num_snapshots: log.axes.num_snapshots(),
            mlc_model: header.mlc_model_name(),
            truncated: header.is_truncated,
            summary: metrics
                .summaries
                .iter()
                .map(|s| (s.name.clone(), s.difference.rms, s.difference.max_abs))
                .collect(),
        }
    }
}

pub fn cover_page(info: &CoverInfo) -> PageCanvas {
    let mut page = PageCanvas::new(PageKind::Cover);
    let center = page.width as f64 / 2.0;
    let mut y = 150.0;

    let lines = [
        format!("Log File: {}", info.file_name),
        format!("Header: {}", info.header),
        format!("Version: {}", info.version),
        format!("Number of Subbeams: {}", info.num_subbeams),
        format!("Number of moving leaves: {}", info.num_moving_leaves),
        format!("Number of beam holds: {}", info.num_beamholds),
        format!("Sampling interval: {} ms", info.sampling_ms),
        format!("Snapshots: {}", info.num_snapshots),
        format!("MLC model: {}", info.mlc_model),
        format!("Truncated: {}", if info.truncated { "yes" } else { "no" }),
    ];
    for line in lines {
        page.text(line, (center, y), 22.0, HAlign::Center);
        y += 34.0;
    }

    y += 30.0;
    let (name_x, rms_x, max_x) = (300.0, 680.0, 900.0);
    page.text("Axis", (name_x, y), 18.0, HAlign::Left);
    page.text("RMS difference", (rms_x, y), 18.0, HAlign::Right);
    page.text("Max |difference|", (max_x, y), 18.0, HAlign::Right);
    y += 28.0;
    for (name, rms, max_abs) in &info.summary {
        page.text(name.clone(), (name_x, y), 16.0, HAlign::Left);
        page.text(format!("{:.4}", rms), (rms_x, y), 16.0, HAlign::Right);
        page.text(format!("{:.4}", max_abs), (max_x, y), 16.0, HAlign::Right);
        y += 24.0;
    }
    page
}

pub fn mu_page(metrics: &DeliveryMetrics, mu: &Axis) -> Result<PageCanvas> {
    let cp = metrics.control_points.as_slice();
    let cp_speed = metrics.speed_control_points();
    render_page(PageKind::Mu, (3, 1), |areas| {
        draw_line_panel(
            &areas[0],
            &LinePanel {
                x_desc: "",
                y_desc: "MU",
                traces: vec![
                    Trace::new("Actual", cp, &mu.actual, BLUE.to_rgba()),
                    Trace::new("Expected", cp, &mu.expected, RED.to_rgba()),
                ],
                zero_line: false,
                placeholder: NO_SAMPLES,
            },
        )?;
        draw_line_panel(
            &areas[1],
            &LinePanel {
                x_desc: "",
                y_desc: "MU",
                traces: vec![Trace::new(
                    "Difference",
                    cp,
                    &metrics.mu.difference,
                    BLACK.to_rgba(),
                )],
                zero_line: true,
                placeholder: NO_SAMPLES,
            },
        )?;
        draw_line_panel(
            &areas[2],
            &LinePanel {
                x_desc: CONTROL_POINT_DESC,
                y_desc: "Dose Rate (MU/min)",
                traces: vec![
                    Trace::new("Actual", cp_speed, &metrics.dose_rate_actual, BLUE.to_rgba()),
                    Trace::new(
                        "Expected",
                        cp_speed,
                        &metrics.dose_rate_expected,
                        RED.to_rgba(),
                    ),
                ],
                zero_line: false,
                placeholder: NO_SAMPLES,
            },
        )
    })
}

pub fn mlc_histogram_page(metrics: &DeliveryMetrics, bins: usize) -> Result<PageCanvas> {
    let a = &metrics.mlc.bank_a;
    let b = &metrics.mlc.bank_b;
    let rows = [
        ("MLC Leaves Error (cm)", "Error", &a.error, &b.error),
        ("MLC Leaves Speed (cm/s)", "Speed", &a.speed, &b.speed),
        (
            "MLC Leaves Speed Error (cm/s)",
            "Speed Error",
            &a.speed_error,
            &b.speed_error,
        ),
    ];
    render_page(PageKind::MlcHistogram, (3, 1), |areas| {
        for (area, (x_desc, what, a_values, b_values)) in areas.iter().zip(rows) {
            let hist_a = Histogram::density(a_values, bins);
            let hist_b = Histogram::density(b_values, bins);
            let label_a = format!("Bank A {}", what);
            let label_b = format!("Bank B {}", what);
            draw_histogram_panel(
                area,
                x_desc,
                &[
                    HistogramSeries {
                        label: &label_a,
                        hist: &hist_a,
                        color: BLUE.to_rgba(),
                    },
                    HistogramSeries {
                        label: &label_b,
                        hist: &hist_b,
                        color: RED.mix(0.5),
                    },
                ],
                NO_MOVING_LEAVES,
            )?;
        }
        Ok(())
    })
}

/// Per-leaf actual speed, first half of the moved leaves on top.
pub fn mlc_speed_page(metrics: &DeliveryMetrics) -> Result<PageCanvas> {
    let x = metrics.speed_control_points();
    leaf_halves_page(PageKind::MlcSpeed, &metrics.mlc.leaves, "Leaf Speed (cm/s)", |leaf| {
        (x, leaf.derived.speed_actual.as_slice())
    })
}

/// Per-leaf position error, first half of the moved leaves on top.
pub fn mlc_error_page(metrics: &DeliveryMetrics) -> Result<PageCanvas> {
    let x = metrics.control_points.as_slice();
    leaf_halves_page(PageKind::MlcError, &metrics.mlc.leaves, "MLC Leaf Error (cm)", |leaf| {
        (x, leaf.derived.difference.as_slice())
    })
}

pub fn gantry_page(metrics: &DeliveryMetrics, gantry: &Axis) -> Result<PageCanvas> {
    angle_page(PageKind::Gantry, "Gantry Angle", &metrics.control_points, gantry, &metrics.gantry)
}

pub fn collimator_page(metrics: &DeliveryMetrics, collimator: &Axis) -> Result<PageCanvas> {
    angle_page(
        PageKind::Collimator,
        "Collimator Angle",
        &metrics.control_points,
        collimator,
        &metrics.collimator,
    )
}

fn angle_page(
    kind: PageKind,
    y_desc: &str,
    cp: &[f64],
    axis: &Axis,
    derived: &DerivedAxis,
) -> Result<PageCanvas> {
    render_page(kind, (2, 1), |areas| {
        draw_line_panel(
            &areas[0],
            &LinePanel {
                x_desc: CONTROL_POINT_DESC,
                y_desc,
                traces: vec![
                    Trace::new("Actual", cp, &axis.actual, BLUE.to_rgba()),
                    Trace::new("Expected", cp, &axis.expected, RED.to_rgba()),
                ],
                zero_line: false,
                placeholder: NO_SAMPLES,
            },
        )?;
        draw_line_panel(
            &areas[1],
            &LinePanel {
                x_desc: CONTROL_POINT_DESC,
                y_desc: "Difference",
                traces: vec![Trace::new(
                    "Difference",
                    cp,
                    &derived.difference,
                    BLACK.to_rgba(),
                )],
                zero_line: true,
                placeholder: NO_SAMPLES,
            },
        )
    })
}

fn leaf_halves_page<'m, F>(
    kind: PageKind,
    leaves: &'m [LeafMetrics],
    y_desc: &str,
    series: F,
) -> Result<PageCanvas>
where
    F: Fn(&'m LeafMetrics) -> (&'m [f64], &'m [f64]),
{
    let (first, second) = split_halves(leaves);
    render_page(kind, (2, 1), |areas| {
        for (area, half) in areas.iter().zip([first, second]) {
            let traces = half
                .iter()
                .enumerate()
                .map(|(i, leaf)| {
                    let (x, y) = series(leaf);
                    Trace::new(leaf.leaf.to_string(), x, y, Palette99::pick(i).to_rgba()).width(2)
                })
                .collect();
            draw_line_panel(
                area,
                &LinePanel {
                    x_desc: CONTROL_POINT_DESC,
                    y_desc,
                    traces,
                    zero_line: false,
                    placeholder: NO_MOVING_LEAVES,
                },
            )?;
        }
        Ok(())
    })
}

/// Draws onto a fresh canvas split into `rows x cols` panels.
fn render_page<F>(kind: PageKind, grid: (usize, usize), draw: F) -> Result<PageCanvas>
where
    F: FnOnce(&[Area<'_>]) -> Result<()>,
{
    let mut page = PageCanvas::new(kind);
    {
        let root = CanvasBackend::new(&mut page).into_drawing_area();
        let areas = root.split_evenly(grid);
        draw(&areas)?;
        root.present()?;
    }
    Ok(page)
}
