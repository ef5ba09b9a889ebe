use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use memmap2::Mmap;

pub mod json_writer;
pub mod summary;

/// Raw log contents, mapped when possible.
pub enum LogBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for LogBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(m) => m,
            Self::Owned(v) => v,
        }
    }
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

pub fn read_log_bytes(path: &Path) -> Result<LogBytes> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if is_gzip(path) {
        let mut out = Vec::new();
        GzDecoder::new(file)
            .read_to_end(&mut out)
            .with_context(|| format!("failed to gunzip {}", path.display()))?;
        return Ok(LogBytes::Owned(out));
    }
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(LogBytes::Owned(Vec::new()));
    }
    match unsafe { Mmap::map(&file) } {
        Ok(mmap) => Ok(LogBytes::Mapped(mmap)),
        Err(_) => {
            let mut out = Vec::with_capacity(len as usize);
            file.read_to_end(&mut out)?;
            Ok(LogBytes::Owned(out))
        }
    }
}
