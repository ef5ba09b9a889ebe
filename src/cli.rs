use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    AnalysisConfig, DEFAULT_HISTOGRAM_BINS, DEFAULT_MOVED_THRESHOLD_CM, DEFAULT_OUT_DIR,
};

#[derive(Debug, Parser)]
#[command(
    name = "kira-tlogqc",
    version,
    about = "Trajectory log QA reports for linear accelerator deliveries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(
        long,
        help = "Trajectory log file or folder of logs (prompted for when omitted)"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_OUT_DIR, help = "Directory receiving the PDF reports")]
    pub out: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Analysis knobs shared by `run` and `validate`.
#[derive(Debug, Args)]
pub struct AnalysisArgs {
    #[arg(long, help = "Last leaf number of bank A (default: half of the leaves)")]
    pub bank_split: Option<usize>,

    #[arg(
        long,
        default_value_t = DEFAULT_MOVED_THRESHOLD_CM,
        help = "Leaves with a position standard deviation above this (cm) count as moved"
    )]
    pub moved_threshold: f64,

    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS, help = "Histogram bins on the MLC page")]
    pub bins: usize,
}

impl AnalysisArgs {
    pub fn config(&self, out_dir: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            out_dir,
            bank_split: self.bank_split,
            moved_threshold: self.moved_threshold,
            histogram_bins: self.bins,
        }
    }
}

impl RunArgs {
    pub fn config(&self) -> AnalysisConfig {
        self.analysis.config(self.out.clone())
    }
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Trajectory log file")]
    pub input: PathBuf,

    #[arg(long, default_value_t = false, help = "Print the summary as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl ValidateArgs {
    /// Nothing is written by `validate`, so the output directory is left at its default.
    pub fn config(&self) -> AnalysisConfig {
        self.analysis.config(PathBuf::from(DEFAULT_OUT_DIR))
    }
}
