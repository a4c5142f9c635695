//! Temp-path handling for `--atomic` output: write next to the destination, rename on success.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Temp path for `output`: same directory, name suffixed with `.capsflow.tmp`.
pub fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PackagePaths::DEFAULT_OUTPUT.to_string());
    output
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.{}", PackagePaths::get().temp_suffix()))
}

/// Remove a stale temp from an earlier interrupted run. Missing is fine.
pub fn remove_stale_temp(temp_path: &Path) -> Result<()> {
    match fs::remove_file(temp_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("remove stale temp output at {}", temp_path.display()))
        }
    }
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp output to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}

/// Drop a partial temp after a failed run.
pub fn discard_temp(temp_path: &Path) {
    let _ = fs::remove_file(temp_path);
}
