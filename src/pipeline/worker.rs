use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use log::{debug, warn};
use std::thread::{self, JoinHandle};

use super::context::WorkerContext;
use super::queue::WorkQueue;
use crate::utils::config::PackagePaths;
use crate::{FailedStage, ItemFailure, ItemOutcome, WorkItem};

/// Run one item: chain on `input`, then handler on `(result, output)`. Errors are captured, not propagated.
pub fn process_item<I, O, R>(
    index: usize,
    item: WorkItem<I, O>,
    ctx: &WorkerContext<I, O, R>,
) -> ItemOutcome
where
    I: 'static,
    O: 'static,
    R: 'static,
{
    let WorkItem { input, output } = item;
    let result = match ctx.chain.run(input, &ctx.kwargs) {
        Ok(r) => r,
        Err(e) => {
            debug!("item {}: chain failed: {:#}", index, e);
            return ItemOutcome::Failed(ItemFailure::new(index, FailedStage::Chain, &e));
        }
    };
    match ctx.handler.call(result, output, &ctx.kwargs) {
        Ok(()) => ItemOutcome::Done { index },
        Err(e) => {
            debug!("item {}: handler failed: {:#}", index, e);
            ItemOutcome::Failed(ItemFailure::new(index, FailedStage::Handler, &e))
        }
    }
}

/// Drain loop shared by pool workers and the serial path: take, process, report, until the queue is empty.
/// Returns the number of items this caller took.
pub fn drain_queue<I, O, R, F>(
    queue: &WorkQueue<I, O>,
    ctx: &WorkerContext<I, O, R>,
    mut on_outcome: F,
) -> usize
where
    I: 'static,
    O: 'static,
    R: 'static,
    F: FnMut(ItemOutcome),
{
    let mut taken = 0_usize;
    while let Some((index, item)) = queue.try_dequeue() {
        taken += 1;
        on_outcome(process_item(index, item, ctx));
    }
    taken
}

/// Keep every successfully spawned handle, stopping at the first spawn error.
/// Errors only when nothing started; otherwise the already-running workers are returned so
/// the caller can still join them.
pub fn keep_spawned<T>(
    spawned: impl IntoIterator<Item = Result<JoinHandle<T>>>,
) -> Result<Vec<JoinHandle<T>>> {
    let mut handles = Vec::new();
    for attempt in spawned {
        match attempt {
            Ok(h) => handles.push(h),
            Err(e) if handles.is_empty() => return Err(e),
            Err(e) => {
                warn!("{:#}; continuing with {} workers", e, handles.len());
                break;
            }
        }
    }
    Ok(handles)
}

/// Spawn up to `num_workers` named worker threads draining `queue`. Each sends one outcome per item on `results_tx`.
/// Fewer handles than requested means a spawn failed part way (see [`keep_spawned`]).
/// Caller must drop its own `results_tx` after this so the results channel closes when workers exit.
pub fn spawn_workers<I, O, R>(
    num_workers: usize,
    queue: &WorkQueue<I, O>,
    ctx: &WorkerContext<I, O, R>,
    results_tx: &Sender<ItemOutcome>,
) -> Result<Vec<JoinHandle<usize>>>
where
    I: Send + 'static,
    O: Send + 'static,
    R: 'static,
{
    keep_spawned((0..num_workers).map(|i| {
        let queue = queue.clone();
        let ctx = ctx.clone();
        let results_tx = results_tx.clone();
        let name = PackagePaths::get().worker_name(i);
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let taken = drain_queue(&queue, &ctx, |outcome| {
                    let _ = results_tx.send(outcome);
                });
                debug!("queue empty after {} items; exiting", taken);
                taken
            })
            .with_context(|| format!("spawn {name}"))
    }))
}

/// Join every worker, crashed or not. Returns `(items_taken_by_clean_workers, crashed_workers)`.
pub fn join_workers(worker_handles: Vec<JoinHandle<usize>>) -> (usize, usize) {
    let mut taken = 0_usize;
    let mut crashed = 0_usize;
    for h in worker_handles {
        let name = h.thread().name().unwrap_or("<unnamed>").to_string();
        match h.join() {
            Ok(n) => taken += n,
            Err(_) => {
                warn!("{} panicked; its in-flight item was not processed", name);
                crashed += 1;
            }
        }
    }
    (taken, crashed)
}
