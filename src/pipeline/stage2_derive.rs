use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::metrics::compute_delivery_metrics;
use crate::pipeline::Stage;

pub struct Stage2Derive;

impl Stage2Derive {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Derive {
    fn name(&self) -> &'static str {
        "stage2_derive"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let log = ctx.log.as_ref().context("trajectory log missing")?;
        let metrics = compute_delivery_metrics(log, &ctx.config)?;

        if metrics.mlc.is_empty() {
            warn!(file = %ctx.file_name, "no_moving_leaves");
            ctx.warnings
                .push(format!("{}: no MLC leaf moved during delivery", ctx.file_name));
        }
        info!(
            moved_leaves = metrics.mlc.leaves.len(),
            bank_a = metrics.mlc.bank_a.leaves.len(),
            bank_b = metrics.mlc.bank_b.leaves.len(),
            beam_holds = metrics.num_beamholds,
            "metrics_derived"
        );
        ctx.metrics = Some(metrics);
        Ok(())
    }
}
