use anyhow::{Context, Result};

use crate::batch::BatchReport;
use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let log = ctx.log.as_ref().context("trajectory log missing")?;
    let metrics = ctx.metrics.as_ref().context("delivery metrics missing")?;
    let header = &log.header;

    let mut out = String::new();
    out.push_str(&format!("kira-tlogqc v{}\n", env!("CARGO_PKG_VERSION")));
    out.push_str(&format!("File: {}\n", ctx.file_name));
    out.push_str(&format!(
        "Header: {} version {}\n",
        header.signature, header.version
    ));
    out.push_str(&format!(
        "Snapshots: {} at {} ms\n",
        log.axes.num_snapshots(),
        header.sampling_interval_ms
    ));
    out.push_str(&format!("Subbeams: {}\n", log.subbeams.len()));
    out.push_str(&format!(
        "Moving leaves: {} of {} (bank A {}, bank B {})\n",
        metrics.mlc.leaves.len(),
        metrics.mlc.num_leaves,
        metrics.mlc.bank_a.leaves.len(),
        metrics.mlc.bank_b.leaves.len()
    ));
    out.push_str(&format!("Beam holds: {}\n", metrics.num_beamholds));
    for s in &metrics.summaries {
        out.push_str(&format!(
            "{}: rms={:.4} max={:.4}\n",
            s.name, s.difference.rms, s.difference.max_abs
        ));
    }
    Ok(out)
}

pub fn format_batch(report: &BatchReport) -> String {
    let ok = report.succeeded().count();
    let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
    let mut out = format!(
        "{} of {} reports written to {}\n",
        ok,
        report.outcomes.len(),
        report.out_dir.display()
    );
    if !failed.is_empty() {
        out.push_str(&format!("Failed: {}\n", failed.join(", ")));
    }
    out
}
