//! batchpipe: generate work items, fan them out across a fixed worker pool through a chain of
//! transforms, and hand each result to a handler (or all results to one callback).

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use pipeline::{
    Accepts, Chain, Handler, ItemGenerator, Kwargs, Pipeline, ScatterPipeline,
    create_analysis_pipeline, eat_kwargs,
};
pub use utils::config::PipelineParams;

/// Result alias used by public batchpipe API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Map every element of `items` through `chain` on `n_cores` workers and pass the ordered
/// successful results to `callback` once the whole batch is done.
///
/// `n_cores == 1` runs serially on the calling thread.
///
/// ```
/// use batchpipe::{Chain, Kwargs, run_batch};
///
/// let mut out = Vec::new();
/// let chain = Chain::new(|x: i64, _: &Kwargs| Ok(x + 1));
/// run_batch(2, vec![1, 2, 3], chain, Kwargs::new(), |r| out = r).unwrap();
/// assert_eq!(out, vec![2, 3, 4]);
/// ```
pub fn run_batch<I, R, F>(
    n_cores: usize,
    items: Vec<I>,
    chain: Chain<I, R>,
    kwargs: Kwargs,
    callback: F,
) -> Result<RunSummary>
where
    I: Send + 'static,
    R: Send + 'static,
    F: FnOnce(Vec<R>),
{
    let params = PipelineParams::DEFAULT.with_n_cores(n_cores);
    let mut scatter = ScatterPipeline::new(chain).with_params(params);
    let (results, summary) = scatter.gather(items, kwargs)?;
    callback(results);
    pipeline::check_run_summary(&params, &summary)?;
    Ok(summary)
}
