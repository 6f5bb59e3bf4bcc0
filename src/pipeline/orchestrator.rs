use anyhow::Result;
use log::debug;
use std::sync::Arc;

use super::chain::{Chain, Handler};
use super::context::{PipelineChannels, PipelineTuning, WorkerContext, create_pipeline_channels};
use super::error_handler::check_run_summary;
use super::generator::ItemGenerator;
use super::kwargs::Kwargs;
use super::worker::{drain_queue, join_workers, spawn_workers};
use crate::{PipelineParams, RunSummary, WorkItem};

/// Generator → queue → worker pool (or serial drain) → join, as one reusable callable.
///
/// - `A`: call arguments handed to the generator
/// - `I`: chain input of each item
/// - `O`: handler-side output args of each item
/// - `R`: chain result
///
/// The handler runs per item inside whichever worker processed it.
pub struct Pipeline<A, I, O, R> {
    generator: ItemGenerator<A, WorkItem<I, O>>,
    chain: Chain<I, R>,
    handler: Handler<R, O>,
    kwargs: Kwargs,
    params: Option<PipelineParams>,
}

impl<A, I, O, R> Pipeline<A, I, O, R>
where
    A: 'static,
    I: Send + 'static,
    O: Send + 'static,
    R: 'static,
{
    pub fn new(
        generator: ItemGenerator<A, WorkItem<I, O>>,
        chain: Chain<I, R>,
        handler: Handler<R, O>,
    ) -> Self {
        Self {
            generator,
            chain,
            handler,
            kwargs: Kwargs::new(),
            params: None,
        }
    }

    /// Initial keyword bag.
    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    /// Pin params for this pipeline instead of reading the global ones on each call.
    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Params the next call will use.
    pub fn params(&self) -> PipelineParams {
        self.params.unwrap_or_else(PipelineParams::global)
    }

    /// Keyword bag accumulated over all calls so far.
    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// [`Pipeline::run`] with no extra keywords.
    pub fn call(&mut self, args: A) -> Result<RunSummary> {
        self.run(args, Kwargs::new())
    }

    /// Run one batch.
    ///
    /// `call_kwargs` are merged into the stored bag and stay there for later calls.
    /// An empty generation returns an empty summary without building a queue or starting workers.
    pub fn run(&mut self, args: A, call_kwargs: Kwargs) -> Result<RunSummary> {
        self.kwargs.merge(call_kwargs);
        let params = self.params();

        let items = self.generator.materialize(args, &self.kwargs, &params)?;
        if items.is_empty() {
            debug!("no work items; skipping queue and workers");
            return Ok(RunSummary::default());
        }

        let tuning = PipelineTuning::from_params(&params);
        let ctx = WorkerContext {
            chain: self.chain.clone(),
            handler: self.handler.clone(),
            kwargs: Arc::new(self.kwargs.clone()),
        };
        let channels = create_pipeline_channels(items);

        let summary = if tuning.parallel {
            run_pool(channels, &ctx, tuning.num_workers)?
        } else {
            run_serial(channels, &ctx)
        };
        check_run_summary(&params, &summary)?;
        Ok(summary)
    }
}

/// Serial path: drain inline on the calling thread. Handler order equals generation order.
fn run_serial<I, O, R>(
    channels: PipelineChannels<I, O>,
    ctx: &WorkerContext<I, O, R>,
) -> RunSummary
where
    I: 'static,
    O: 'static,
    R: 'static,
{
    debug!("running serially");
    let mut summary = RunSummary {
        enqueued: channels.queue.enqueued(),
        ..RunSummary::default()
    };
    drain_queue(&channels.queue, ctx, |outcome| summary.record(outcome));
    summary
}

/// Pool path: spawn workers, join all of them, then fold every outcome they reported.
fn run_pool<I, O, R>(
    channels: PipelineChannels<I, O>,
    ctx: &WorkerContext<I, O, R>,
    num_workers: usize,
) -> Result<RunSummary>
where
    I: Send + 'static,
    O: Send + 'static,
    R: 'static,
{
    let PipelineChannels {
        queue,
        results_tx,
        results_rx,
    } = channels;
    debug!(
        "dispatching {} items to {} workers",
        queue.enqueued(),
        num_workers
    );

    let worker_handles = spawn_workers(num_workers, &queue, ctx, &results_tx)?;
    // Dropping the last sender lets the results channel close once workers exit.
    drop(results_tx);

    let workers_spawned = worker_handles.len();
    let (_taken, crashed_workers) = join_workers(worker_handles);

    let mut summary = RunSummary {
        enqueued: queue.enqueued(),
        workers_spawned,
        crashed_workers,
        ..RunSummary::default()
    };
    while let Ok(outcome) = results_rx.recv() {
        summary.record(outcome);
    }
    debug!(
        "workers joined: {} processed, {} failed, {} crashed",
        summary.processed,
        summary.failed.len(),
        summary.crashed_workers
    );
    Ok(summary)
}
