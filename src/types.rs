//! Public and internal types for the capsflow API and pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One unit of data handed between pipeline stages. Size is decided by the source.
pub type Chunk = Vec<u8>;

/// Pipeline stage a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Source,
    Transform,
    Sink,
    Coordinator,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Source => "source",
            Stage::Transform => "transform",
            Stage::Sink => "sink",
            Stage::Coordinator => "coordinator",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted each time progress crosses a 10-point threshold. Not retained by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressReport {
    /// Threshold crossed: 10, 20, ..., 100.
    pub percent: u8,
    /// Lines processed when the threshold was crossed.
    pub lines: u64,
}

/// Final report of a successful run. Produced exactly once, never on failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_lines: u64,
    pub total_bytes: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

fn serialize_secs<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Full options (CLI). Built from defaults, then `.capsflow.toml`, then command-line flags.
#[derive(Clone, Debug)]
pub struct Opts {
    /// File to read.
    pub input: PathBuf,
    /// File to write. Created (or truncated) only once the input probe succeeds.
    pub output: PathBuf,
    /// Debug logging and a progress bar instead of progress log lines.
    pub verbose: bool,
    /// Write to a temp file next to `output` and rename on success.
    pub atomic: bool,
    /// Print the run summary as JSON on stdout.
    pub json: bool,
    /// When set, write a sample input of this many MiB to `input` and exit.
    pub generate_mib: Option<u64>,
}

impl Default for Opts {
    fn default() -> Self {
        let paths = crate::utils::config::PackagePaths::get();
        Self {
            input: PathBuf::from(paths.default_input()),
            output: PathBuf::from(paths.default_output()),
            verbose: false,
            atomic: false,
            json: false,
            generate_mib: None,
        }
    }
}
