//! Sample input generation: a file filled with one repeated line.

use anyhow::Context;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Result;
use crate::utils::config::{DEFAULT_CHUNK_SIZE, SampleInputConsts};

/// Write `size_bytes / LINE.len()` copies of the sample line to `path`. Returns the line count.
/// The file ends on a full line, so it may be slightly smaller than `size_bytes`.
pub fn write_sample_input(path: &Path, size_bytes: u64) -> Result<u64> {
    let line = SampleInputConsts::LINE.as_bytes();
    let num_lines = size_bytes / line.len() as u64;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::with_capacity(DEFAULT_CHUNK_SIZE, file);
    for _ in 0..num_lines {
        writer
            .write_all(line)
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(
        "Sample input written to {} ({} lines)",
        path.display(),
        num_lines
    );
    Ok(num_lines)
}

/// [`write_sample_input`] with the size given in MiB.
pub fn write_sample_input_mib(path: &Path, size_mib: u64) -> Result<u64> {
    write_sample_input(path, size_mib.saturating_mul(SampleInputConsts::MIB))
}
