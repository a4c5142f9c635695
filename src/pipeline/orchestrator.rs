use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::RunSummary;
use crate::pipeline::context::{PipelineState, RunState};
use crate::pipeline::error_handler::{PipelineError, report_failure};
use crate::pipeline::observer::RunObserver;
use crate::pipeline::sink::{ChunkSink, FileSink};
use crate::pipeline::source::{ChunkSource, FileSource};
use crate::pipeline::transform::{CountingStage, TextTransform, Uppercase};

/// Wires Source → Transform → Sink and drives one run to a terminal state.
///
/// One chunk is in flight at a time: the next chunk is requested only after the sink has
/// accepted the previous transformed chunk.
pub struct Coordinator<S, K, T> {
    source: S,
    sink: K,
    stage: CountingStage<T>,
    state: PipelineState,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S, K, T> Coordinator<S, K, T>
where
    S: ChunkSource,
    K: ChunkSink,
    T: TextTransform,
{
    pub fn new(source: S, sink: K, transform: T) -> Self {
        Self {
            source,
            sink,
            stage: CountingStage::new(transform),
            state: PipelineState::Idle,
            cancel: None,
        }
    }

    /// Abort between chunks once `flag` is set. The run then fails with `Cancelled`.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Split back into source and sink (e.g. to inspect an in-memory sink after the run).
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Run to completion. On success the observer gets `on_finished`; on failure it gets
    /// `on_error` and no summary is produced. A coordinator runs once.
    pub fn run<O>(&mut self, observer: &mut O) -> Result<RunSummary, PipelineError>
    where
        O: RunObserver + ?Sized,
    {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::AlreadyRun);
        }
        let started_at = Instant::now();

        self.transition(PipelineState::Probing);
        let total = match self.source.probe_size() {
            Ok(n) => n,
            Err(e) => return Err(self.fail(PipelineError::source_unavailable(e), observer)),
        };
        debug!("input size: {} bytes", total);

        self.transition(PipelineState::Streaming);
        let mut run_state = RunState::new(total, started_at);
        if let Err(e) = self.stream(&mut run_state, observer) {
            return Err(self.fail(e, observer));
        }

        self.transition(PipelineState::Finished);
        let summary = run_state.into_summary();
        observer.on_finished(&summary);
        Ok(summary)
    }

    fn stream<O>(
        &mut self,
        run_state: &mut RunState,
        observer: &mut O,
    ) -> Result<(), PipelineError>
    where
        O: RunObserver + ?Sized,
    {
        loop {
            if self.cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let Some(chunk) = self
                .source
                .next_chunk()
                .map_err(PipelineError::source_unavailable)?
            else {
                break;
            };
            let out = self.stage.process(run_state, &chunk)?;
            for report in &out.reports {
                observer.on_progress(report);
            }
            if !out.chunk.is_empty() {
                self.sink
                    .write_chunk(&out.chunk)
                    .map_err(PipelineError::sink_unavailable)?;
            }
        }

        let tail = self.stage.finish();
        if !tail.is_empty() {
            self.sink
                .write_chunk(&tail)
                .map_err(PipelineError::sink_unavailable)?;
        }
        self.source.close();
        self.sink.close().map_err(PipelineError::sink_unavailable)?;
        debug!(
            "streamed {} bytes, {} lines",
            run_state.processed_bytes(),
            run_state.processed_lines()
        );
        Ok(())
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn fail<O>(&mut self, err: PipelineError, observer: &mut O) -> PipelineError
    where
        O: RunObserver + ?Sized,
    {
        // Probe failures never reached the sink; leave the destination untouched.
        if self.state == PipelineState::Streaming {
            self.sink.abort();
        }
        self.source.close();
        self.transition(PipelineState::Failed);
        report_failure(observer, &err);
        err
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("pipeline: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Uppercase `input` into `output`. The output file is created only after the input probe
/// succeeds; on a later failure whatever was already written is left in place.
pub fn transform_file<O>(
    input: &Path,
    output: &Path,
    observer: &mut O,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunSummary, PipelineError>
where
    O: RunObserver + ?Sized,
{
    let mut coordinator =
        Coordinator::new(FileSource::new(input), FileSink::new(output), Uppercase);
    if let Some(flag) = cancel {
        coordinator = coordinator.with_cancel(flag);
    }
    coordinator.run(observer)
}
