use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::error::AnalysisError;
use crate::pipeline::Stage;
use crate::tlog::{LogReader, VarianLogReader};

pub struct Stage1Decode {
    reader: Box<dyn LogReader>,
}

impl Stage1Decode {
    pub fn new() -> Self {
        Self::with_reader(Box::new(VarianLogReader))
    }

    pub fn with_reader(reader: Box<dyn LogReader>) -> Self {
        Self { reader }
    }
}

impl Stage for Stage1Decode {
    fn name(&self) -> &'static str {
        "stage1_decode"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let log = self
            .reader
            .read(&ctx.input)
            .map_err(|err| AnalysisError::decode(&ctx.file_name, &err))?;

        if log.header.is_truncated {
            let msg = format!("{} is marked truncated by the delivery system", ctx.file_name);
            warn!(file = %ctx.file_name, "log_truncated");
            ctx.warnings.push(msg);
        }
        info!(
            version = %log.header.version,
            snapshots = log.axes.num_snapshots(),
            subbeams = log.subbeams.len(),
            leaves = log.num_leaves(),
            "log_decoded"
        );
        ctx.log = Some(log);
        Ok(())
    }
}
