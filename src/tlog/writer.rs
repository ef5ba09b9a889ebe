use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::tlog::TrajectoryLog;
use crate::tlog::layout::{SUBBEAM_NAME_LEN, SUBBEAM_RESERVED_LEN, write_header, write_text};

/// Encodes `log` in the binary layout `reader::decode_tlog` accepts.
pub fn write_tlog<W: Write>(mut w: W, log: &TrajectoryLog) -> Result<()> {
    let header = &log.header;
    if header.axis_codes.len() != header.samples_per_axis.len() {
        bail!("axis codes and samples per axis differ in length");
    }
    if header.num_subbeams as usize != log.subbeams.len() {
        bail!(
            "header declares {} subbeams, log has {}",
            header.num_subbeams,
            log.subbeams.len()
        );
    }
    let n_snapshots = header.num_snapshots as usize;

    let mut columns = Vec::with_capacity(header.axis_codes.len());
    for (&code, &samples) in header.axis_codes.iter().zip(&header.samples_per_axis) {
        let cols = log
            .axes
            .columns(code)
            .with_context(|| format!("no data for axis code {}", code))?;
        if cols.len() != samples as usize {
            bail!(
                "axis {} has {} columns, header declares {}",
                code,
                cols.len(),
                samples
            );
        }
        if cols.iter().any(|c| c.len() != n_snapshots) {
            bail!("axis {} length differs from snapshot count", code);
        }
        columns.push(cols);
    }

    write_header(&mut w, header)?;
    for sb in &log.subbeams {
        w.write_all(&sb.control_point.to_le_bytes())?;
        w.write_all(&sb.mu.to_le_bytes())?;
        w.write_all(&sb.rad_time.to_le_bytes())?;
        w.write_all(&sb.sequence.to_le_bytes())?;
        write_text(&mut w, &sb.name, SUBBEAM_NAME_LEN)?;
        w.write_all(&[0u8; SUBBEAM_RESERVED_LEN])?;
    }
    for i in 0..n_snapshots {
        for cols in &columns {
            for axis in cols {
                w.write_all(&(axis.expected[i] as f32).to_le_bytes())?;
                w.write_all(&(axis.actual[i] as f32).to_le_bytes())?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

pub fn write_tlog_file(path: &Path, log: &TrajectoryLog) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_tlog(BufWriter::new(file), log)
}
