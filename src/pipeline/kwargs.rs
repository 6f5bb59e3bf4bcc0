//! Keyword bag shared by generator, chain stages and handler, and the adapter that narrows it
//! to what each callable declares.
//!
//! Two ways for a callable to declare its keywords:
//! - at runtime with [`Accepts::Named`] through [`KwAdapter`] / [`eat_kwargs`];
//! - at compile time with a `#[derive(Deserialize)]` struct read through [`Kwargs::extract`]
//!   (serde ignores keys the struct does not name).

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Ordered map of keyword name to JSON value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Kwargs(Map<String, Value>);

impl Kwargs {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`Kwargs::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: Kwargs) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    /// Typed view of the bag. Fields the target does not declare are ignored.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .with_context(|| format!("extract {} from kwargs", std::any::type_name::<T>()))
    }

    /// Deserialize a single keyword.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.0
            .get(key)
            .map(|v| {
                serde_json::from_value(v.clone()).with_context(|| format!("kwarg {key:?}"))
            })
            .transpose()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Keywords a callable declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Accepts {
    /// Exactly these names; everything else is dropped.
    Named(Vec<String>),
    /// Catch-all: the full bag is forwarded unmodified.
    #[default]
    Any,
}

impl Accepts {
    pub fn named<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Accepts::Named(names.into_iter().map(Into::into).collect())
    }

    /// Declares no keywords: the callable always receives an empty bag.
    pub fn none() -> Self {
        Accepts::Named(Vec::new())
    }
}

/// Narrows a keyword bag to what a callable accepts. Positional arguments are untouched.
#[derive(Clone, Debug, Default)]
pub struct KwAdapter {
    accepts: Accepts,
}

impl KwAdapter {
    pub fn new(accepts: Accepts) -> Self {
        Self { accepts }
    }

    pub fn accepts(&self) -> &Accepts {
        &self.accepts
    }

    /// Borrowed bag for catch-all callables, filtered copy otherwise.
    pub fn forward<'a>(&self, bag: &'a Kwargs) -> Cow<'a, Kwargs> {
        match &self.accepts {
            Accepts::Any => Cow::Borrowed(bag),
            Accepts::Named(names) => Cow::Owned(Kwargs(
                names
                    .iter()
                    .filter_map(|n| bag.0.get(n).map(|v| (n.clone(), v.clone())))
                    .collect(),
            )),
        }
    }

    /// Call `f` with `args` and the forwarded subset of `bag`.
    pub fn call<A, R>(&self, f: impl FnOnce(A, &Kwargs) -> R, args: A, bag: &Kwargs) -> R {
        let forwarded = self.forward(bag);
        f(args, &*forwarded)
    }
}

/// Wrap `f` so it only ever sees the keywords it accepts.
///
/// ```
/// use batchpipe::pipeline::kwargs::{Accepts, Kwargs, eat_kwargs};
///
/// let f = eat_kwargs(Accepts::named(["scale"]), |x: i64, kw: &Kwargs| kw.len() as i64 + x);
/// let bag = Kwargs::new().with("scale", 2).with("other", 3);
/// assert_eq!(f(10, &bag), 11);
/// ```
pub fn eat_kwargs<A, R, F>(accepts: Accepts, f: F) -> impl Fn(A, &Kwargs) -> R + Send + Sync
where
    F: Fn(A, &Kwargs) -> R + Send + Sync,
{
    let adapter = KwAdapter::new(accepts);
    move |args: A, bag: &Kwargs| adapter.call(&f, args, bag)
}
