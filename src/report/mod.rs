//! Report composition. Every page is built on its own `PageCanvas` from
//! explicit inputs; `pdf::render_pdf` turns the finished pages into a document.

pub mod backend;
pub mod canvas;
pub mod charts;
pub mod pages;
pub mod pdf;

use anyhow::{Context, Result};

use crate::metrics::DeliveryMetrics;
use crate::tlog::TrajectoryLog;

use canvas::PageCanvas;
use pages::CoverInfo;

/// Cover, MU, MLC histogram, MLC speed, MLC error, gantry, collimator.
pub fn compose_report(
    file_name: &str,
    log: &TrajectoryLog,
    metrics: &DeliveryMetrics,
    bins: usize,
) -> Result<Vec<PageCanvas>> {
    let axes = &log.axes;
    Ok(vec![
        pages::cover_page(&CoverInfo::from_log(file_name, log, metrics)),
        pages::mu_page(metrics, &axes.mu).context("mu page")?,
        pages::mlc_histogram_page(metrics, bins).context("mlc histogram page")?,
        pages::mlc_speed_page(metrics).context("mlc speed page")?,
        pages::mlc_error_page(metrics).context("mlc error page")?,
        pages::gantry_page(metrics, &axes.gantry).context("gantry page")?,
        pages::collimator_page(metrics, &axes.collimator).context("collimator page")?,
    ])
}
