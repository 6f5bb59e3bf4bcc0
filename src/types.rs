//! Public types for the batchpipe API: work items, per-item outcomes, run summaries.

use serde::Serialize;
use std::fmt;

/// One unit of work: `input` feeds the worker chain, `output` goes to the handler with the chain result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> WorkItem<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I, O> From<(I, O)> for WorkItem<I, O> {
    fn from((input, output): (I, O)) -> Self {
        Self { input, output }
    }
}

/// Which step of an item's processing failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedStage {
    Chain,
    Handler,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedStage::Chain => write!(f, "chain"),
            FailedStage::Handler => write!(f, "handler"),
        }
    }
}

/// A failed item: its enqueue index, the failing step and the error (with context chain).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub stage: FailedStage,
    pub error: String,
}

impl ItemFailure {
    pub fn new(index: usize, stage: FailedStage, err: &anyhow::Error) -> Self {
        Self {
            index,
            stage,
            error: format!("{:#}", err),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} failed in {}: {}", self.index, self.stage, self.error)
    }
}

/// Result of processing one dequeued item, sent from a worker back to the orchestrator.
#[derive(Debug)]
pub enum ItemOutcome {
    Done { index: usize },
    Failed(ItemFailure),
}

/// Completion report of one pipeline call.
///
/// Items taken by a worker that then panicked are neither `processed` nor `failed`;
/// they show up in [`RunSummary::unprocessed`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub enqueued: usize,
    pub processed: usize,
    pub failed: Vec<ItemFailure>,
    pub workers_spawned: usize,
    pub crashed_workers: usize,
}

impl RunSummary {
    pub fn unprocessed(&self) -> usize {
        self.enqueued
            .saturating_sub(self.processed)
            .saturating_sub(self.failed.len())
    }

    /// True when every enqueued item was processed and no worker crashed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.crashed_workers == 0 && self.unprocessed() == 0
    }

    /// Fold one worker outcome into the summary.
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done { .. } => self.processed += 1,
            ItemOutcome::Failed(failure) => self.failed.push(failure),
        }
    }
}

/// Full options for the CLI digest job. Library callers use [`PipelineParams`](crate::PipelineParams) directly.
#[derive(Clone, Debug)]
pub struct Opts {
    pub params: crate::PipelineParams,
    /// Debug logging and progress bar.
    pub verbose: bool,
    /// Extension appended to each output file (without the dot).
    pub ext: String,
    /// Where to write the JSON run summary, if anywhere.
    pub summary_path: Option<std::path::PathBuf>,
    /// Skip the confirmation prompt before overwriting existing outputs.
    pub assume_yes: bool,
    /// Follow symlinks while walking the input tree.
    pub follow_links: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            params: crate::PipelineParams::default(),
            verbose: false,
            ext: crate::utils::config::DEFAULT_DIGEST_EXT.to_string(),
            summary_path: None,
            assume_yes: false,
            follow_links: false,
        }
    }
}
