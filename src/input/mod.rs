use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::AnalysisError;

pub const REPORT_EXTENSION: &str = "pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    File(PathBuf),
    Directory(PathBuf),
}

/// Directories win over files, anything else is `InputNotFound`.
pub fn resolve_input(path: &Path) -> Result<InputKind, AnalysisError> {
    if path.is_dir() {
        Ok(InputKind::Directory(path.to_path_buf()))
    } else if path.is_file() {
        Ok(InputKind::File(path.to_path_buf()))
    } else {
        Err(AnalysisError::InputNotFound(path.to_path_buf()))
    }
}

/// Immediate regular files of `dir`, sorted by name. Every file is a
/// candidate; no extension filtering.
pub fn candidate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `A.bin` and `A.bin.gz` both map to `A.pdf`.
pub fn report_file_name(input: &Path) -> String {
    let name = display_name(input);
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "report".to_string());
    format!("{}.{}", stem, REPORT_EXTENSION)
}
