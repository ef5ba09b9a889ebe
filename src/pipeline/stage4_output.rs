use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::error::AnalysisError;
use crate::pipeline::Stage;
use crate::report::pdf::render_pdf;

pub struct Stage4Output;

impl Stage4Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Output {
    fn name(&self) -> &'static str {
        "stage4_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let bytes = render_pdf(&ctx.file_name, &ctx.pages)
            .map_err(|err| AnalysisError::report(&ctx.file_name, &err))?;
        write_atomic(&ctx.output.pdf_path, &bytes)
            .map_err(|err| AnalysisError::report(&ctx.file_name, &err))?;
        info!(
            path = %ctx.output.pdf_path.display(),
            bytes = bytes.len(),
            "report_written"
        );
        Ok(())
    }
}

/// Writes to a hidden sibling and renames it into place, so a failed write
/// never leaves a partial report behind.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let written = fs::write(&tmp, bytes)
        .with_context(|| format!("failed to write {}", tmp.display()))
        .and_then(|_| {
            fs::rename(&tmp, path)
                .with_context(|| format!("failed to move report into {}", path.display()))
        });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
