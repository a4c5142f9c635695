//! capsflow: streams a large text file through an uppercase transform, chunk by chunk.
//!
//! Source → counting stage → sink, with exactly one chunk in flight. Progress is reported
//! to an injected [`RunObserver`](pipeline::RunObserver) at every 10% threshold and the run
//! ends in a single [`RunSummary`] or [`PipelineError`](pipeline::PipelineError).

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use pipeline::{
    ChunkSink, ChunkSource, Coordinator, PipelineError, PipelineState, RunObserver, TextTransform,
    Uppercase,
};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by the fallible helpers outside the pipeline core
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: uppercase `input` into `output`, reporting through `observer`.
///
/// `cancel`, when given, is polled between chunks; setting it fails the run with
/// [`PipelineError::Cancelled`]. The output file is not created if the input cannot be probed.
///
/// ```ignore
/// let summary = capsflow::uppercase_file(
///     Path::new("large-input.txt"),
///     Path::new("large-output.txt"),
///     &mut capsflow::pipeline::LogObserver,
///     None,
/// )?;
/// println!("{} lines in {:.2}s", summary.total_lines, summary.elapsed_secs());
/// ```
pub fn uppercase_file<O>(
    input: &Path,
    output: &Path,
    observer: &mut O,
    cancel: Option<Arc<AtomicBool>>,
) -> std::result::Result<RunSummary, PipelineError>
where
    O: RunObserver + ?Sized,
{
    log::debug!(
        "{}: {} -> {}",
        env!("CARGO_PKG_NAME"),
        input.display(),
        output.display()
    );
    pipeline::transform_file(input, output, observer, cancel)
}
