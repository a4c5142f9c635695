//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    temp_suffix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Input read when none is given on the command line or in the config file.
    pub const DEFAULT_INPUT: &'static str = "large-input.txt";
    /// Output written when none is given.
    pub const DEFAULT_OUTPUT: &'static str = "large-output.txt";

    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                temp_suffix: format!("{pkg}.tmp"),
            }
        })
    }

    pub fn default_input(&self) -> &str {
        Self::DEFAULT_INPUT
    }

    pub fn default_output(&self) -> &str {
        Self::DEFAULT_OUTPUT
    }

    /// Per-directory config file (e.g. `.capsflow.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Extension appended to the output name for `--atomic` writes.
    pub fn temp_suffix(&self) -> &str {
        &self.temp_suffix
    }
}

// ---- Streaming ----

/// Bytes requested from the input per read; also the output buffer capacity. 64 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Percentage points between progress reports.
    pub const STEP_PERCENT: u8 = 10;
    /// Progress bar total: the bar counts percent, not bytes.
    pub const BAR_TOTAL: usize = 100;
}

// ---- Sample input ----

pub struct SampleInputConsts;

impl SampleInputConsts {
    /// Line repeated to fill a generated input file.
    pub const LINE: &'static str = "This is a line of text to be transformed. Adding more text to increase the size of each line.\n";
    /// Default generated size in MiB (about 10 GB).
    pub const DEFAULT_SIZE_MIB: u64 = 10_000;
    pub const MIB: u64 = 1024 * 1024;
}
