//! Item generator: turns a pipeline call's arguments into the full list of work items.

use anyhow::{Context, Result};
use log::debug;

use super::kwargs::{Accepts, KwAdapter, Kwargs};
use crate::PipelineParams;

type GenerateFn<A, T> = dyn Fn(A, &Kwargs, &PipelineParams) -> Result<Vec<T>> + Send + Sync;

/// Produces the items of one call. The source may be lazy; [`ItemGenerator::materialize`]
/// drains it completely before anything is queued.
pub struct ItemGenerator<A, T> {
    generate: Box<GenerateFn<A, T>>,
    adapter: KwAdapter,
}

impl<A: 'static, T: 'static> ItemGenerator<A, T> {
    /// Wrap `f`. Each yielded value is converted with `Into<T>`, so a generator of
    /// `(input, output)` tuples feeds a `WorkItem` pipeline directly.
    pub fn new<F, It, U>(f: F) -> Self
    where
        F: Fn(A, &Kwargs, &PipelineParams) -> Result<It> + Send + Sync + 'static,
        It: IntoIterator<Item = U>,
        U: Into<T>,
    {
        Self {
            generate: Box::new(
                move |args: A, kw: &Kwargs, params: &PipelineParams| -> Result<Vec<T>> {
                    Ok(f(args, kw, params)?
                        .into_iter()
                        .map(Into::into)
                        .collect::<Vec<T>>())
                },
            ),
            adapter: KwAdapter::default(),
        }
    }

    /// Generator that ignores params; the common case.
    pub fn from_fn<F, It, U>(f: F) -> Self
    where
        F: Fn(A, &Kwargs) -> Result<It> + Send + Sync + 'static,
        It: IntoIterator<Item = U>,
        U: Into<T>,
    {
        Self::new(move |args: A, kw: &Kwargs, _: &PipelineParams| f(args, kw))
    }

    /// Restrict the keywords this generator sees.
    pub fn with_accepts(mut self, accepts: Accepts) -> Self {
        self.adapter = KwAdapter::new(accepts);
        self
    }

    /// Run the generator to completion. Errors abort the call before any queue is built.
    pub fn materialize(&self, args: A, kwargs: &Kwargs, params: &PipelineParams) -> Result<Vec<T>> {
        let forwarded = self.adapter.forward(kwargs);
        let items = (self.generate)(args, &forwarded, params).context("item generator failed")?;
        debug!("generator produced {} items", items.len());
        Ok(items)
    }
}

impl<A, T> ItemGenerator<A, T>
where
    A: IntoIterator + 'static,
    A::Item: Into<T>,
    T: 'static,
{
    /// The call arguments are themselves the item sequence.
    pub fn passthrough() -> Self {
        Self::new(|args: A, _: &Kwargs, _: &PipelineParams| Ok(args))
    }
}
