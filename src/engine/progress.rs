//! Progress display for the CLI: a kdam bar in verbose mode, log lines otherwise.

use kdam::{Animation, Bar, BarExt};

use crate::pipeline::{LogObserver, PipelineError, RunObserver};
use crate::utils::config::ProgressConsts;
use crate::{ProgressReport, RunSummary, Stage};

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a percentage bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> Bar {
    kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = "%"
    )
}

/// Observer used by the CLI. With a bar, progress moves the bar; without one, progress is
/// logged. Completion goes through the log; errors are left to the caller.
pub struct CliObserver {
    bar: Option<Bar>,
    shown_percent: usize,
    log: LogObserver,
}

impl CliObserver {
    pub fn new(show_bar: bool) -> Self {
        let bar = show_bar.then(|| {
            create_progress_bar(ProgressBarConfig::new(
                ProgressConsts::BAR_TOTAL,
                "Uppercasing",
                Animation::Classic,
            ))
        });
        Self {
            bar,
            shown_percent: 0,
            log: LogObserver,
        }
    }

    /// Leave the bar's line so later log output starts on a fresh line.
    pub fn close_bar(&mut self) {
        if let Some(mut bar) = self.bar.take() {
            let _ = bar.refresh();
            eprintln!();
        }
    }
}

impl RunObserver for CliObserver {
    fn on_progress(&mut self, report: &ProgressReport) {
        match self.bar.as_mut() {
            Some(bar) => {
                let percent = usize::from(report.percent);
                let _ = bar.update(percent.saturating_sub(self.shown_percent));
                self.shown_percent = percent;
            }
            None => self.log.on_progress(report),
        }
    }

    fn on_finished(&mut self, summary: &RunSummary) {
        self.close_bar();
        self.log.on_finished(summary);
    }

    /// The error itself is returned to `main`, which prints it.
    fn on_error(&mut self, _stage: Stage, _err: &PipelineError) {
        self.close_bar();
    }
}
