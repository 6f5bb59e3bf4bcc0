//! Scatter/gather pipeline: map every item through the chain on a managed thread pool, wait for
//! the whole batch, then hand the aggregated results to one callback on the calling thread.

use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};

use super::chain::Chain;
use super::context::PipelineTuning;
use super::error_handler::check_run_summary;
use super::generator::ItemGenerator;
use super::kwargs::Kwargs;
use crate::utils::config::PackagePaths;
use crate::{FailedStage, ItemFailure, PipelineParams, RunSummary};

type Callback<R> = Box<dyn FnMut(Vec<R>) + Send>;

pub struct ScatterPipeline<A, I, R> {
    generator: ItemGenerator<A, I>,
    chain: Chain<I, R>,
    callback: Option<Callback<R>>,
    kwargs: Kwargs,
    params: Option<PipelineParams>,
}

impl<A, I, R> ScatterPipeline<A, I, R>
where
    A: IntoIterator<Item = I> + 'static,
    I: Send + 'static,
    R: Send + 'static,
{
    /// Call arguments are the item sequence.
    pub fn new(chain: Chain<I, R>) -> Self {
        Self::from_generator(ItemGenerator::passthrough(), chain)
    }
}

impl<A, I, R> ScatterPipeline<A, I, R>
where
    A: 'static,
    I: Send + 'static,
    R: Send + 'static,
{
    /// Items come from `generator` applied to the call arguments.
    pub fn from_generator(generator: ItemGenerator<A, I>, chain: Chain<I, R>) -> Self {
        Self {
            generator,
            chain,
            callback: None,
            kwargs: Kwargs::new(),
            params: None,
        }
    }

    /// Called once per run, on the calling thread, with every successful result in submission order.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Vec<R>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn params(&self) -> PipelineParams {
        self.params.unwrap_or_else(PipelineParams::global)
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn call(&mut self, args: A) -> Result<RunSummary> {
        self.run(args, Kwargs::new())
    }

    /// Run one batch. Failures and panics are caught per item and reported in the summary;
    /// the callback only sees successful results.
    pub fn run(&mut self, args: A, call_kwargs: Kwargs) -> Result<RunSummary> {
        let params = self.params();
        let (results, summary) = self.gather(args, call_kwargs)?;
        if let Some(callback) = self.callback.as_mut() {
            callback(results);
        }
        check_run_summary(&params, &summary)?;
        Ok(summary)
    }

    /// Scatter the batch and gather `(successful results in submission order, summary)`
    /// without invoking the callback or applying strict mode.
    pub fn gather(&mut self, args: A, call_kwargs: Kwargs) -> Result<(Vec<R>, RunSummary)> {
        self.kwargs.merge(call_kwargs);
        let params = self.params();
        let items = self.generator.materialize(args, &self.kwargs, &params)?;
        let enqueued = items.len();

        let tuning = PipelineTuning::from_params(&params);
        let (outcomes, workers_spawned) = if !tuning.parallel || items.is_empty() {
            debug!("running {} items serially", enqueued);
            let outcomes: Vec<_> = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| run_item(&self.chain, i, item, &self.kwargs))
                .collect();
            (outcomes, 0)
        } else {
            let n = tuning.num_workers;
            debug!("scattering {} items over a pool of {}", enqueued, n);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| PackagePaths::get().worker_name(i))
                .build()
                .context("build worker pool")?;
            let chain = &self.chain;
            let kwargs = &self.kwargs;
            let outcomes: Vec<_> = pool.install(|| {
                items
                    .into_par_iter()
                    .enumerate()
                    .map(|(i, item)| run_item(chain, i, item, kwargs))
                    .collect()
            });
            (outcomes, n)
        };

        let mut summary = RunSummary {
            enqueued,
            workers_spawned,
            ..RunSummary::default()
        };
        let mut results = Vec::with_capacity(enqueued);
        for outcome in outcomes {
            match outcome {
                Ok(r) => {
                    summary.processed += 1;
                    results.push(r);
                }
                Err(failure) => summary.failed.push(failure),
            }
        }
        Ok((results, summary))
    }
}

fn run_item<I, R>(
    chain: &Chain<I, R>,
    index: usize,
    item: I,
    kwargs: &Kwargs,
) -> Result<R, ItemFailure>
where
    I: 'static,
    R: 'static,
{
    match catch_unwind(AssertUnwindSafe(|| chain.run(item, kwargs))) {
        Ok(Ok(r)) => Ok(r),
        Ok(Err(e)) => Err(ItemFailure::new(index, FailedStage::Chain, &e)),
        Err(payload) => Err(ItemFailure {
            index,
            stage: FailedStage::Chain,
            error: format!("worker panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
