//! Pipeline context and tuning: the queue, results channel and shared worker state of one call.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;
use std::sync::Arc;

use super::chain::{Chain, Handler};
use super::kwargs::Kwargs;
use super::queue::WorkQueue;
use crate::{ItemOutcome, PipelineParams, WorkItem};

/// Tuning derived from params for one call: worker count and whether to spawn at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_workers: usize,
    /// False selects the serial path: drain inline, spawn nothing.
    pub parallel: bool,
}

impl PipelineTuning {
    /// Resolve once per run. Warns here (not in the getters) when `n_cores == 0` gets clamped.
    pub fn from_params(params: &PipelineParams) -> Self {
        if params.n_cores == 0 {
            warn!("n_cores is 0; running serially");
        }
        Self {
            num_workers: params.worker_count(),
            parallel: params.parallelize(),
        }
    }
}

/// What every worker gets its own handle to: the chain, the handler and a snapshot of the keyword bag.
/// Workers never observe later changes to the pipeline's bag.
pub struct WorkerContext<I, O, R> {
    pub chain: Chain<I, R>,
    pub handler: Handler<R, O>,
    pub kwargs: Arc<Kwargs>,
}

impl<I, O, R> Clone for WorkerContext<I, O, R> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            handler: self.handler.clone(),
            kwargs: Arc::clone(&self.kwargs),
        }
    }
}

/// Queue and results channel for one call. Workers get `queue` clones and `results_tx` clones;
/// the orchestrator drains `results_rx` after the join.
pub struct PipelineChannels<I, O> {
    pub queue: WorkQueue<I, O>,
    pub results_tx: Sender<ItemOutcome>,
    pub results_rx: Receiver<ItemOutcome>,
}

/// Build a fresh, fully populated and closed queue plus an unbounded results channel.
pub fn create_pipeline_channels<I, O>(items: Vec<WorkItem<I, O>>) -> PipelineChannels<I, O> {
    let queue = WorkQueue::populate(items);
    let (results_tx, results_rx) = unbounded::<ItemOutcome>();
    PipelineChannels {
        queue,
        results_tx,
        results_rx,
    }
}
