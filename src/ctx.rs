use std::path::PathBuf;

use crate::config::AnalysisConfig;
use crate::input;
use crate::metrics::DeliveryMetrics;
use crate::report::canvas::PageCanvas;
use crate::tlog::TrajectoryLog;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub pdf_path: PathBuf,
}

/// Per-file state threaded through the pipeline stages.
#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub file_name: String,
    pub config: AnalysisConfig,
    pub output: OutputPaths,
    pub log: Option<TrajectoryLog>,
    pub metrics: Option<DeliveryMetrics>,
    pub pages: Vec<PageCanvas>,
    pub warnings: Vec<String>,
}

impl Ctx {
    pub fn new(input: PathBuf, config: AnalysisConfig) -> Self {
        let file_name = input::display_name(&input);
        let out_dir = config.out_dir.clone();
        let pdf_path = out_dir.join(input::report_file_name(&input));
        Self {
            input,
            file_name,
            config,
            output: OutputPaths { out_dir, pdf_path },
            log: None,
            metrics: None,
            pages: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
