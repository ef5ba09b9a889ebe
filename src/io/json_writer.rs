use std::io::Write;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::{
    AxisError, HeaderMeta, MlcMeta, SCHEMA_VERSION, SubbeamMeta, TlogSummaryV1, ToolMeta,
};

pub fn build_summary(ctx: &Ctx) -> Result<TlogSummaryV1> {
    let log = ctx.log.as_ref().context("trajectory log missing")?;
    let metrics = ctx.metrics.as_ref().context("delivery metrics missing")?;
    let header = &log.header;

    let subbeams = log
        .subbeams
        .iter()
        .map(|s| SubbeamMeta {
            control_point: s.control_point,
            mu: s.mu,
            rad_time: s.rad_time,
            sequence: s.sequence,
            name: s.name.clone(),
        })
        .collect();

    let mlc = &metrics.mlc;
    Ok(TlogSummaryV1 {
        tool: ToolMeta {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema: SCHEMA_VERSION.to_string(),
        },
        file: ctx.file_name.clone(),
        header: HeaderMeta {
            signature: header.signature.clone(),
            version: header.version.clone(),
            sampling_interval_ms: header.sampling_interval_ms,
            num_axes: header.axis_codes.len(),
            axis_codes: header.axis_codes.clone(),
            num_subbeams: log.subbeams.len(),
            num_snapshots: log.axes.num_snapshots(),
            mlc_model: header.mlc_model_name(),
            is_truncated: header.is_truncated,
        },
        subbeams,
        mlc: MlcMeta {
            num_leaves: mlc.num_leaves,
            bank_split: mlc.split.last_a(),
            moved_leaves: mlc.moved_leaves(),
            bank_a_moved: mlc.bank_a.leaves.len(),
            bank_b_moved: mlc.bank_b.leaves.len(),
        },
        num_beamholds: metrics.num_beamholds,
        axis_errors: metrics
            .summaries
            .iter()
            .map(|s| AxisError::new(&s.name, &s.difference))
            .collect(),
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json<W: Write>(mut w: W, summary: &TlogSummaryV1) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, summary).context("failed to serialise summary")?;
    writeln!(w)?;
    Ok(())
}
