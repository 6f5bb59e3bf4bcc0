//! Worker chain and handler: the callables each worker runs per item.

use anyhow::{Context, Result};
use std::sync::Arc;

use super::kwargs::{Accepts, KwAdapter, Kwargs};

type StageFn<I, O> = dyn Fn(I, &Kwargs) -> Result<O> + Send + Sync;
type HandlerFn<R, O> = dyn Fn(R, O, &Kwargs) -> Result<()> + Send + Sync;

/// Ordered composition of stages: the output of stage *i* is the input of stage *i+1*.
///
/// Cheap to clone (shared `Arc`); never mutated once built, so every worker can hold its own handle.
pub struct Chain<I, O> {
    run: Arc<StageFn<I, O>>,
    len: usize,
}

impl<I, O> Clone for Chain<I, O> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            len: self.len,
        }
    }
}

impl<I: 'static, O: 'static> Chain<I, O> {
    /// Single-stage chain receiving the full keyword bag.
    pub fn new<F>(stage: F) -> Self
    where
        F: Fn(I, &Kwargs) -> Result<O> + Send + Sync + 'static,
    {
        Self::with_accepts(Accepts::Any, stage)
    }

    /// Single-stage chain receiving only the keywords in `accepts`.
    pub fn with_accepts<F>(accepts: Accepts, stage: F) -> Self
    where
        F: Fn(I, &Kwargs) -> Result<O> + Send + Sync + 'static,
    {
        let adapter = KwAdapter::new(accepts);
        Self {
            run: Arc::new(move |input: I, kw: &Kwargs| {
                adapter
                    .call(&stage, input, kw)
                    .context("chain stage 0 failed")
            }),
            len: 1,
        }
    }

    /// Append a stage fed with this chain's output.
    pub fn then<P, F>(self, stage: F) -> Chain<I, P>
    where
        P: 'static,
        F: Fn(O, &Kwargs) -> Result<P> + Send + Sync + 'static,
    {
        self.then_with(Accepts::Any, stage)
    }

    /// Append a stage that only receives the keywords in `accepts`.
    pub fn then_with<P, F>(self, accepts: Accepts, stage: F) -> Chain<I, P>
    where
        P: 'static,
        F: Fn(O, &Kwargs) -> Result<P> + Send + Sync + 'static,
    {
        let adapter = KwAdapter::new(accepts);
        let prev = self.run;
        let idx = self.len;
        Chain {
            run: Arc::new(move |input: I, kw: &Kwargs| -> Result<P> {
                let mid = prev(input, kw)?;
                adapter
                    .call(&stage, mid, kw)
                    .with_context(|| format!("chain stage {idx} failed"))
            }),
            len: self.len + 1,
        }
    }

    /// Run `input` through every stage in order.
    pub fn run(&self, input: I, kwargs: &Kwargs) -> Result<O> {
        (self.run)(input, kwargs)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<I: 'static> Chain<I, I> {
    /// Zero-stage chain that passes its input through.
    pub fn identity() -> Self {
        Self {
            run: Arc::new(|input: I, _: &Kwargs| -> Result<I> { Ok(input) }),
            len: 0,
        }
    }
}

/// Final consumer of an item: chain result plus the item's output args. Effects only.
pub struct Handler<R, O> {
    run: Arc<HandlerFn<R, O>>,
}

impl<R, O> Clone for Handler<R, O> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<R: 'static, O: 'static> Handler<R, O> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(R, O, &Kwargs) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_accepts(Accepts::Any, f)
    }

    pub fn with_accepts<F>(accepts: Accepts, f: F) -> Self
    where
        F: Fn(R, O, &Kwargs) -> Result<()> + Send + Sync + 'static,
    {
        let adapter = KwAdapter::new(accepts);
        Self {
            run: Arc::new(move |result: R, output: O, kw: &Kwargs| {
                adapter.call(|(r, o), fkw| f(r, o, fkw), (result, output), kw)
            }),
        }
    }

    /// Handler that drops every result.
    pub fn noop() -> Self {
        Self {
            run: Arc::new(|_: R, _: O, _: &Kwargs| -> Result<()> { Ok(()) }),
        }
    }

    pub fn call(&self, result: R, output: O, kwargs: &Kwargs) -> Result<()> {
        (self.run)(result, output, kwargs)
    }
}
