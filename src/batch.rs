use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::ctx::Ctx;
use crate::error::AnalysisError;
use crate::input::{self, InputKind};
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    File,
    Directory,
}

impl BatchMode {
    pub fn banner(&self) -> &'static str {
        match self {
            Self::File => "File Mode",
            Self::Directory => "Batch Mode",
        }
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub result: Result<PathBuf, AnalysisError>,
}

#[derive(Debug)]
pub struct BatchReport {
    pub mode: BatchMode,
    pub out_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Runs the per-file pipeline; any stage failure comes back typed.
///
/// `config.out_dir` must already exist.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<PathBuf, AnalysisError> {
    let mut ctx = Ctx::new(path.to_path_buf(), config.clone());
    Pipeline::per_file()
        .run(&mut ctx)
        .map_err(AnalysisError::from_stage)?;
    for warning in &ctx.warnings {
        warn!(file = %ctx.file_name, "{}", warning);
    }
    Ok(ctx.output.pdf_path)
}

/// Analyses a single log or every regular file of a directory.
///
/// Nothing is created when `input` does not exist. In directory mode a
/// failing file is recorded and the rest still run; the caller decides
/// what a single-file failure means for the exit status. When several
/// files map to one report name only the first (by name) is analysed.
pub fn run(input: &Path, config: &AnalysisConfig) -> Result<BatchReport, AnalysisError> {
    config.validate()?;
    let kind = input::resolve_input(input)?;

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed to create {}", config.out_dir.display()))?;

    let (mode, files) = match kind {
        InputKind::Directory(dir) => (BatchMode::Directory, input::candidate_files(&dir)?),
        InputKind::File(file) => (BatchMode::File, vec![file]),
    };
    println!("{}", mode.banner());
    info!(mode = mode.banner(), files = files.len(), "batch_started");

    let mut claimed: HashMap<String, String> = HashMap::new();
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let name = input::display_name(&file);
        let report_name = input::report_file_name(&file);
        let result = match claimed.get(&report_name) {
            Some(owner) => {
                warn!(
                    file = %name,
                    report = %report_name,
                    owner = %owner,
                    "report_name_taken"
                );
                Err(AnalysisError::report(
                    &name,
                    &anyhow!("report {} is already produced from {}", report_name, owner),
                ))
            }
            None => {
                claimed.insert(report_name, name.clone());
                analyze_file(&file, config)
            }
        };
        match &result {
            Ok(_) => println!("Finished analyzing {}", name),
            Err(err) => println!("Analysis failed for {}: {}", name, err),
        }
        outcomes.push(FileOutcome { name, result });
    }

    let report = BatchReport {
        mode,
        out_dir: config.out_dir.clone(),
        outcomes,
    };
    info!(
        succeeded = report.succeeded().count(),
        failed = report.failed().count(),
        "batch_finished"
    );
    Ok(report)
}
