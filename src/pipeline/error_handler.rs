//! Pipeline error kinds and the failure path shared by every stage.

use log::debug;
use std::io;
use thiserror::Error;

use crate::Stage;
use crate::pipeline::observer::RunObserver;

/// Boxed error returned by a [`TextTransform`](crate::pipeline::TextTransform).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failure of a pipeline run. The first error aborts the run; nothing is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Size probe, open, or read of the input failed.
    #[error("source unavailable: {source}")]
    SourceUnavailable {
        #[source]
        source: io::Error,
    },

    /// Open, write, or close of the output failed.
    #[error("sink unavailable: {source}")]
    SinkUnavailable {
        #[source]
        source: io::Error,
    },

    /// The chunk transform rejected its input.
    #[error("transform failed: {source}")]
    TransformFailure {
        #[source]
        source: BoxError,
    },

    /// Cancellation flag was raised between chunks.
    #[error("run cancelled")]
    Cancelled,

    /// `run` was called on a coordinator that already reached a terminal state.
    #[error("pipeline already ran")]
    AlreadyRun,
}

impl PipelineError {
    pub fn source_unavailable(source: io::Error) -> Self {
        PipelineError::SourceUnavailable { source }
    }

    pub fn sink_unavailable(source: io::Error) -> Self {
        PipelineError::SinkUnavailable { source }
    }

    /// Stage the error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::SourceUnavailable { .. } => Stage::Source,
            PipelineError::SinkUnavailable { .. } => Stage::Sink,
            PipelineError::TransformFailure { .. } => Stage::Transform,
            PipelineError::Cancelled | PipelineError::AlreadyRun => Stage::Coordinator,
        }
    }
}

/// Log the failure and hand it to the observer. Call once, when the run enters `Failed`.
pub fn report_failure<O>(observer: &mut O, err: &PipelineError)
where
    O: RunObserver + ?Sized,
{
    let stage = err.stage();
    debug!("pipeline failed in {} stage: {}", stage, err);
    observer.on_error(stage, err);
}
