//! Observers: receive progress, completion, and failure events synchronously from the coordinator.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, info};

use crate::pipeline::error_handler::PipelineError;
use crate::{ProgressReport, RunSummary, Stage};

/// Injected collaborator for run events. All methods default to no-ops.
pub trait RunObserver {
    fn on_progress(&mut self, _report: &ProgressReport) {}
    fn on_finished(&mut self, _summary: &RunSummary) {}
    fn on_error(&mut self, _stage: Stage, _err: &PipelineError) {}
}

impl<O: RunObserver + ?Sized> RunObserver for &mut O {
    fn on_progress(&mut self, report: &ProgressReport) {
        (**self).on_progress(report)
    }
    fn on_finished(&mut self, summary: &RunSummary) {
        (**self).on_finished(summary)
    }
    fn on_error(&mut self, stage: Stage, err: &PipelineError) {
        (**self).on_error(stage, err)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Writes events through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_progress(&mut self, report: &ProgressReport) {
        info!(
            "Progress: {}% ({} lines processed)",
            report.percent, report.lines
        );
    }

    fn on_finished(&mut self, summary: &RunSummary) {
        info!(
            "Processed {} lines in {:.2}s",
            summary.total_lines,
            summary.elapsed_secs()
        );
    }

    fn on_error(&mut self, stage: Stage, err: &PipelineError) {
        error!("{} stage: {}", stage, err);
    }
}

/// Owned copy of an observer callback, for consumers on another thread.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    Progress(ProgressReport),
    Finished(RunSummary),
    /// Stage and rendered error message.
    Failed(Stage, String),
}

/// Forwards events over a channel. Sends are dropped once the receiver is gone.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    tx: Sender<RunEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<RunEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl RunObserver for ChannelObserver {
    fn on_progress(&mut self, report: &ProgressReport) {
        let _ = self.tx.send(RunEvent::Progress(*report));
    }

    fn on_finished(&mut self, summary: &RunSummary) {
        let _ = self.tx.send(RunEvent::Finished(summary.clone()));
    }

    fn on_error(&mut self, stage: Stage, err: &PipelineError) {
        let _ = self.tx.send(RunEvent::Failed(stage, err.to_string()));
    }
}
