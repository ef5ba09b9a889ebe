use std::path::PathBuf;

/// Outcome taxonomy at the per-file boundary.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// The input path is neither a file nor a directory.
    #[error("no such file or folder: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The trajectory log could not be decoded.
    #[error("failed to decode {file}: {reason}")]
    Decode { file: String, reason: String },

    /// Invalid analysis parameters (sampling interval, bank split, bins).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Page composition, PDF rendering or writing failed.
    #[error("failed to write report for {file}: {reason}")]
    Report { file: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn decode(file: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Decode {
            file: file.into(),
            reason: format!("{:#}", err),
        }
    }

    pub fn report(file: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Report {
            file: file.into(),
            reason: format!("{:#}", err),
        }
    }

    /// Recover the typed error a stage attached, or fall back to `Other`.
    pub fn from_stage(err: anyhow::Error) -> Self {
        match err.downcast::<AnalysisError>() {
            Ok(typed) => typed,
            Err(other) => Self::Other(other),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "input_not_found",
            Self::Decode { .. } => "decode",
            Self::Configuration(_) => "configuration",
            Self::Report { .. } => "report",
            Self::Other(_) => "other",
        }
    }
}
