use std::path::PathBuf;

use crate::error::AnalysisError;

pub const DEFAULT_OUT_DIR: &str = "Log File Analysis";
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;
pub const MAX_HISTOGRAM_BINS: usize = 10_000;
/// Leaves whose actual-position standard deviation stays at or below this
/// value (cm) are treated as stationary.
pub const DEFAULT_MOVED_THRESHOLD_CM: f64 = 0.003;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub out_dir: PathBuf,
    /// Last leaf number of bank A. `None` splits the head in half.
    pub bank_split: Option<usize>,
    pub moved_threshold: f64,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            bank_split: None,
            moved_threshold: DEFAULT_MOVED_THRESHOLD_CM,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AnalysisConfig {
    pub fn with_out_dir(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    /// Checks the parameters that do not depend on a particular log.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(1..=MAX_HISTOGRAM_BINS).contains(&self.histogram_bins) {
            return Err(AnalysisError::configuration(format!(
                "histogram bins must be between 1 and {}, got {}",
                MAX_HISTOGRAM_BINS, self.histogram_bins
            )));
        }
        if !self.moved_threshold.is_finite() || self.moved_threshold < 0.0 {
            return Err(AnalysisError::configuration(format!(
                "moved-leaf threshold must be a non-negative number, got {}",
                self.moved_threshold
            )));
        }
        if self.bank_split == Some(0) {
            return Err(AnalysisError::configuration("bank split must be at least 1"));
        }
        Ok(())
    }
}
