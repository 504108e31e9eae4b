//! The data store: a keyed store of plain values and lazily produced values.
//!
//! Each id holds exactly one entry, of one of three kinds:
//!
//! - **eager**: a plain value, returned as is;
//! - **lazy**: a `Call`, `Service` or `Datum` marker realised on the first `get`
//!   and replaced by its result;
//! - **factory**: a `Factory` marker invoked on every `get`, never memoized.

use ahash::AHashMap;
use tracing::debug;

use crate::error::{DiError, DiResult};
use crate::internal::ResolutionContext;
use crate::locator::ServiceLocator;
use crate::marker::{DatumRef, Injectable, Target};
use crate::options::Options;
use crate::traits::Resolver;
use crate::value::Value;

// Frames for data entries share the in-flight stack, and the depth budget, with services.
const FRAME_PREFIX: &str = "datum:";

#[derive(Clone)]
enum Entry {
    Eager(Value),
    Lazy(Injectable),
    Factory(Target),
}

impl Entry {
    fn from_injectable(thing: Injectable) -> Self {
        match thing {
            Injectable::Value(value) => Entry::Eager(value),
            Injectable::Factory(target) => Entry::Factory(target),
            marker => Entry::Lazy(marker),
        }
    }
}

#[derive(Default)]
pub(crate) struct DataStore {
    entries: AHashMap<String, Entry>,
}

impl DataStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

/// Handle to a locator's data store.
///
/// # Examples
///
/// ```rust
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
/// use ferrous_locator::{Callable, Injectable, ServiceLocator, TypeCatalog, Value};
///
/// let locator = ServiceLocator::new(TypeCatalog::new());
/// let data = locator.data();
///
/// let calls = Arc::new(AtomicI64::new(0));
/// let counter = calls.clone();
/// let next = Callable::thunk(move || Ok(Value::Int(counter.fetch_add(1, Ordering::SeqCst))));
///
/// data.set("lazy", Injectable::call(next.clone()));
/// data.set("fresh", Injectable::factory(next));
///
/// assert_eq!(data.get("lazy").unwrap(), Value::Int(0));
/// assert_eq!(data.get("lazy").unwrap(), Value::Int(0));
/// assert_eq!(data.get("fresh").unwrap(), Value::Int(1));
/// assert_eq!(data.get("fresh").unwrap(), Value::Int(2));
/// ```
#[derive(Clone, Copy)]
pub struct DataLocator<'a> {
    locator: &'a ServiceLocator,
}

impl<'a> DataLocator<'a> {
    pub(crate) fn new(locator: &'a ServiceLocator) -> Self {
        Self { locator }
    }

    /// Stores `thing` under `id`, replacing whatever was there before, whatever its kind.
    pub fn set(&self, id: &str, thing: impl Into<Injectable>) -> &Self {
        let entry = Entry::from_injectable(thing.into());
        self.locator.data_store().write().entries.insert(id.to_string(), entry);
        self
    }

    /// Removes `id`; returns whether something was stored.
    pub fn unset(&self, id: &str) -> bool {
        self.locator.data_store().write().entries.remove(id).is_some()
    }

    pub fn has(&self, id: &str) -> bool {
        self.locator.data_store().read().entries.contains_key(id)
    }

    /// Fetches `id`, realising lazy entries and invoking factories.
    pub fn get(&self, id: &str) -> DiResult<Value> {
        let mut ctx = self.locator.context();
        self.get_in(&mut ctx, id)
    }

    /// Fetches the datum a [`DatumRef`] names, navigating its path.
    pub fn get_datum(&self, datum: &DatumRef) -> DiResult<Value> {
        let mut ctx = self.locator.context();
        self.get_datum_in(&mut ctx, datum)
    }

    /// Stored ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.locator.data_store().read().entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn get_datum_in(&self, ctx: &mut ResolutionContext, datum: &DatumRef) -> DiResult<Value> {
        Ok(self.get_in(ctx, &datum.id)?.at_path(&datum.path))
    }

    pub(crate) fn get_in(&self, ctx: &mut ResolutionContext, id: &str) -> DiResult<Value> {
        let entry = self.locator.data_store().read().entries.get(id).cloned();
        match entry {
            None => Err(DiError::DatumNotFound(id.to_string())),
            Some(Entry::Eager(value)) => Ok(value),
            Some(Entry::Factory(target)) => {
                let frame = format!("{}{}", FRAME_PREFIX, id);
                ctx.within(&frame, |ctx| {
                    self.locator.injector().call_in(ctx, &target, &Options::default())
                })
            }
            Some(Entry::Lazy(producer)) => {
                let frame = format!("{}{}", FRAME_PREFIX, id);
                let value = ctx.within(&frame, |ctx| self.locator.injector().interpret(ctx, &producer))?;
                Ok(self.memoize(id, value))
            }
        }
    }

    // A racing `get` may have realised the entry first; the stored value wins.
    // A racing `set` or `unset` wins over the realised value.
    fn memoize(&self, id: &str, value: Value) -> Value {
        let mut store = self.locator.data_store().write();
        match store.entries.get(id) {
            Some(Entry::Lazy(_)) => {
                debug!(id, "realised lazy datum");
                store.entries.insert(id.to_string(), Entry::Eager(value.clone()));
                value
            }
            Some(Entry::Eager(existing)) => existing.clone(),
            _ => value,
        }
    }
}

impl Resolver for DataLocator<'_> {
    fn get(&self, id: &str) -> DiResult<Value> {
        DataLocator::get(self, id)
    }

    fn has(&self, id: &str) -> bool {
        DataLocator::has(self, id)
    }
}

impl std::fmt::Debug for DataLocator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLocator").field("ids", &self.ids()).finish()
    }
}
