//! Reader → worker → writer pipelines over `(input_path, output_path)` pairs.

use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use super::chain::{Chain, Handler};
use super::generator::ItemGenerator;
use super::kwargs::Kwargs;
use super::orchestrator::Pipeline;
use crate::{PipelineParams, WorkItem};

pub type PathItem = WorkItem<PathBuf, PathBuf>;

/// Stage `(input, output)` pairs: drop pairs whose output already exists unless `overwrite`.
/// Returns the kept items and how many were skipped.
pub fn stage_outputs<It>(pairs: It, overwrite: bool) -> (Vec<PathItem>, usize)
where
    It: IntoIterator<Item = (PathBuf, PathBuf)>,
{
    let mut skipped = 0_usize;
    let items = pairs
        .into_iter()
        .filter(|(_, output)| {
            let keep = overwrite || !output.exists();
            if !keep {
                skipped += 1;
            }
            keep
        })
        .map(WorkItem::from)
        .collect();
    (items, skipped)
}

/// Wraps a path-pair generator so its output goes through [`stage_outputs`] with the call's `overwrite`.
pub struct IoMapper;

impl IoMapper {
    pub fn generator<A, G, It>(generator: G) -> ItemGenerator<A, PathItem>
    where
        A: 'static,
        G: Fn(A, &Kwargs) -> Result<It> + Send + Sync + 'static,
        It: IntoIterator<Item = (PathBuf, PathBuf)>,
    {
        ItemGenerator::new(move |args: A, kw: &Kwargs, params: &PipelineParams| {
            let (items, skipped) = stage_outputs(generator(args, kw)?, params.overwrite);
            if skipped > 0 {
                info!(
                    "Skipping {} items with existing outputs (overwrite is off)",
                    skipped
                );
            }
            Ok(items)
        })
    }
}

/// Pipeline reading each input path, transforming the read value, and writing the result to the output path.
///
/// `generator` yields `(input_path, output_path)` pairs. The chain is `reader → worker`; the
/// handler is `writer(output_path, result)`.
pub fn create_analysis_pipeline<A, T, U, G, It, Rd, W, Wr>(
    generator: G,
    reader: Rd,
    worker: W,
    writer: Wr,
) -> Pipeline<A, PathBuf, PathBuf, U>
where
    A: 'static,
    T: 'static,
    U: 'static,
    G: Fn(A, &Kwargs) -> Result<It> + Send + Sync + 'static,
    It: IntoIterator<Item = (PathBuf, PathBuf)>,
    Rd: Fn(PathBuf, &Kwargs) -> Result<T> + Send + Sync + 'static,
    W: Fn(T, &Kwargs) -> Result<U> + Send + Sync + 'static,
    Wr: Fn(&Path, U, &Kwargs) -> Result<()> + Send + Sync + 'static,
{
    let chain = Chain::new(reader).then(worker);
    let handler = Handler::new(move |result: U, output: PathBuf, kw: &Kwargs| {
        debug!("writing {}", output.display());
        writer(&output, result, kw)
    });
    Pipeline::new(IoMapper::generator(generator), chain, handler)
}
