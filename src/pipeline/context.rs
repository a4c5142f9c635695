//! Per-run state: counters owned by the coordinator and the coordinator's lifecycle state.

use std::fmt;
use std::time::Instant;

use crate::utils::config::ProgressConsts;
use crate::{ProgressReport, RunSummary};

/// Coordinator lifecycle. `Finished` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Probing,
    Streaming,
    Finished,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineState::Idle => "idle",
            PipelineState::Probing => "probing",
            PipelineState::Streaming => "streaming",
            PipelineState::Finished => "finished",
            PipelineState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Running counters for one pipeline execution.
///
/// Created once the size probe succeeds; mutated only by the counting stage.
/// Counters only ever grow, and `last_reported_percent` never exceeds the current
/// floor percentage.
#[derive(Clone, Debug)]
pub struct RunState {
    total_size_bytes: u64,
    processed_bytes: u64,
    processed_lines: u64,
    last_reported_percent: u8,
    started_at: Instant,
}

impl RunState {
    pub fn new(total_size_bytes: u64, started_at: Instant) -> Self {
        Self {
            total_size_bytes,
            processed_bytes: 0,
            processed_lines: 0,
            last_reported_percent: 0,
            started_at,
        }
    }

    pub fn processed_bytes(&self) -> u64 {
        self.processed_bytes
    }

    pub fn processed_lines(&self) -> u64 {
        self.processed_lines
    }

    pub fn last_reported_percent(&self) -> u8 {
        self.last_reported_percent
    }

    /// Account for one input chunk of `bytes` length containing `lines` terminators.
    pub(crate) fn record_chunk(&mut self, bytes: usize, lines: u64) {
        self.processed_bytes = self.processed_bytes.saturating_add(bytes as u64);
        self.processed_lines = self.processed_lines.saturating_add(lines);
    }

    /// `floor(100 * processed / total)`, clamped to 100. `None` for an empty input.
    pub fn current_percent(&self) -> Option<u8> {
        if self.total_size_bytes == 0 {
            return None;
        }
        let pct = u128::from(self.processed_bytes) * 100 / u128::from(self.total_size_bytes);
        Some(pct.min(100) as u8)
    }

    /// Advance `last_reported_percent` over every threshold the current percentage has crossed,
    /// pushing one report per threshold.
    pub(crate) fn advance_progress(&mut self, reports: &mut Vec<ProgressReport>) {
        let Some(percent) = self.current_percent() else {
            return;
        };
        let step = ProgressConsts::STEP_PERCENT;
        while percent >= self.last_reported_percent.saturating_add(step)
            && self.last_reported_percent < 100
        {
            self.last_reported_percent += step;
            reports.push(ProgressReport {
                percent: self.last_reported_percent,
                lines: self.processed_lines,
            });
        }
    }

    /// Consume the state into the final summary.
    pub fn into_summary(self) -> RunSummary {
        RunSummary {
            total_lines: self.processed_lines,
            total_bytes: self.processed_bytes,
            elapsed: self.started_at.elapsed(),
        }
    }
}
