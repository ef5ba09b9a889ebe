use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::error::AnalysisError;
use crate::pipeline::Stage;
use crate::report::compose_report;

pub struct Stage3Compose;

impl Stage3Compose {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Compose {
    fn name(&self) -> &'static str {
        "stage3_compose"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let log = ctx.log.as_ref().context("trajectory log missing")?;
        let metrics = ctx.metrics.as_ref().context("delivery metrics missing")?;
        let pages = compose_report(&ctx.file_name, log, metrics, ctx.config.histogram_bins)
            .map_err(|err| AnalysisError::report(&ctx.file_name, &err))?;
        info!(pages = pages.len(), "pages_composed");
        ctx.pages = pages;
        Ok(())
    }
}
