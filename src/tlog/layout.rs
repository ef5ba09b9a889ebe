use std::io::{Read, Write};

use anyhow::{Context, Result, bail};

pub const SIGNATURE: &str = "VOSTL";
pub const HEADER_SIZE: usize = 1024;
pub const SUBBEAM_SIZE: usize = 560;
pub const SUBBEAM_NAME_LEN: usize = 512;
pub(crate) const SUBBEAM_RESERVED_LEN: usize = 32;
const TEXT_FIELD_LEN: usize = 16;
const MAX_AXES: i32 = 64;
/// Widest head in service carries 120 leaves; leaves room for larger ones.
pub const MAX_LEAVES: i32 = 160;
/// Two carriages plus the leaves on the MLC axis; every other axis is far smaller.
pub const MAX_SAMPLES_PER_AXIS: i32 = 2 + MAX_LEAVES;

#[derive(Debug, Clone, PartialEq)]
pub struct TlogHeader {
    pub signature: String,
    pub version: String,
    pub header_size: i32,
    pub sampling_interval_ms: i32,
    pub axis_codes: Vec<i32>,
    pub samples_per_axis: Vec<i32>,
    pub axis_scale: i32,
    pub num_subbeams: i32,
    pub is_truncated: bool,
    pub num_snapshots: i32,
    pub mlc_model: i32,
}

impl TlogHeader {
    /// Bytes occupied by the fixed fields before the reserved area.
    pub fn fixed_len(num_axes: usize) -> usize {
        TEXT_FIELD_LEN * 2 + 4 * 3 + num_axes * 8 + 4 * 5
    }

    pub fn version_number(&self) -> f64 {
        self.version.trim().parse().unwrap_or(0.0)
    }

    /// Samples (not values) per snapshot across every axis.
    pub fn samples_per_snapshot(&self) -> usize {
        self.samples_per_axis.iter().map(|&s| s as usize).sum()
    }

    pub fn snapshot_bytes(&self) -> usize {
        self.samples_per_snapshot() * 2 * 4
    }

    pub fn mlc_model_name(&self) -> String {
        match self.mlc_model {
            2 => "NDS 120".to_string(),
            3 => "NDS 120 HD".to_string(),
            other => format!("unknown ({})", other),
        }
    }
}

pub fn read_header<R: Read>(mut r: R) -> Result<TlogHeader> {
    let signature = read_text(&mut r, TEXT_FIELD_LEN).context("failed to read signature")?;
    if !signature.starts_with(SIGNATURE) {
        bail!("not a trajectory log: signature {:?}", signature);
    }
    let version = read_text(&mut r, TEXT_FIELD_LEN).context("failed to read version")?;
    if version.trim().parse::<f64>().is_err() {
        bail!("unsupported trajectory log version {:?}", version);
    }
    let header_size = read_i32(&mut r)?;
    let sampling_interval_ms = read_i32(&mut r)?;
    let num_axes = read_i32(&mut r)?;
    if !(1..=MAX_AXES).contains(&num_axes) {
        bail!("invalid axis count {}", num_axes);
    }
    let num_axes = num_axes as usize;
    let mut axis_codes = Vec::with_capacity(num_axes);
    for _ in 0..num_axes {
        axis_codes.push(read_i32(&mut r)?);
    }
    let mut samples_per_axis = Vec::with_capacity(num_axes);
    for _ in 0..num_axes {
        let samples = read_i32(&mut r)?;
        if !(1..=MAX_SAMPLES_PER_AXIS).contains(&samples) {
            bail!(
                "invalid samples per axis {} (expected 1..={})",
                samples,
                MAX_SAMPLES_PER_AXIS
            );
        }
        samples_per_axis.push(samples);
    }
    let axis_scale = read_i32(&mut r)?;
    let num_subbeams = read_i32(&mut r)?;
    let is_truncated = read_i32(&mut r)? != 0;
    let num_snapshots = read_i32(&mut r)?;
    let mlc_model = read_i32(&mut r)?;

    if header_size < 0 || (header_size as usize) < TlogHeader::fixed_len(num_axes) {
        bail!("header size {} too small for {} axes", header_size, num_axes);
    }
    if num_subbeams < 0 {
        bail!("negative subbeam count {}", num_subbeams);
    }
    if num_snapshots < 0 {
        bail!("negative snapshot count {}", num_snapshots);
    }

    Ok(TlogHeader {
        signature,
        version,
        header_size,
        sampling_interval_ms,
        axis_codes,
        samples_per_axis,
        axis_scale,
        num_subbeams,
        is_truncated,
        num_snapshots,
        mlc_model,
    })
}

pub fn write_header<W: Write>(mut w: W, header: &TlogHeader) -> Result<()> {
    let fixed = TlogHeader::fixed_len(header.axis_codes.len());
    if (header.header_size as usize) < fixed {
        bail!("header size {} below fixed length {}", header.header_size, fixed);
    }
    write_text(&mut w, &header.signature, TEXT_FIELD_LEN)?;
    write_text(&mut w, &header.version, TEXT_FIELD_LEN)?;
    w.write_all(&header.header_size.to_le_bytes())?;
    w.write_all(&header.sampling_interval_ms.to_le_bytes())?;
    w.write_all(&(header.axis_codes.len() as i32).to_le_bytes())?;
    for code in &header.axis_codes {
        w.write_all(&code.to_le_bytes())?;
    }
    for samples in &header.samples_per_axis {
        w.write_all(&samples.to_le_bytes())?;
    }
    w.write_all(&header.axis_scale.to_le_bytes())?;
    w.write_all(&header.num_subbeams.to_le_bytes())?;
    w.write_all(&(header.is_truncated as i32).to_le_bytes())?;
    w.write_all(&header.num_snapshots.to_le_bytes())?;
    w.write_all(&header.mlc_model.to_le_bytes())?;
    w.write_all(&vec![0u8; header.header_size as usize - fixed])?;
    Ok(())
}

pub(crate) fn read_i32<R: Read>(mut r: R) -> Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).context("failed to read i32")?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn read_f32<R: Read>(mut r: R) -> Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).context("failed to read f32")?;
    Ok(f32::from_le_bytes(buf))
}

/// Fixed-width text field, NUL padded.
pub(crate) fn read_text<R: Read>(mut r: R, len: usize) -> Result<String> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&buf[..end]).trim().to_string())
}

pub(crate) fn write_text<W: Write>(mut w: W, text: &str, len: usize) -> Result<()> {
    let bytes = text.as_bytes();
    if bytes.len() > len {
        bail!("text field {:?} longer than {} bytes", text, len);
    }
    w.write_all(bytes)?;
    w.write_all(&vec![0u8; len - bytes.len()])?;
    Ok(())
}

pub(crate) fn skip<R: Read>(mut r: R, len: usize) -> Result<()> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(())
}
