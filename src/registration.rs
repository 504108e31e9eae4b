//! Binding records and the ordered binding table.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use once_cell::sync::OnceCell;

use crate::catalog::TypeCatalog;
use crate::descriptors::{BindingDescriptor, BindingKind};
use crate::marker::Injectable;
use crate::options::Options;
use crate::value::Value;

/// What an id is bound to, with the options stored alongside it.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) target: Injectable,
    pub(crate) options: Options,
    /// Singleton cache; a fresh cell on every bind, so re-binding drops the cached value
    cell: Arc<OnceCell<Value>>,
}

impl Binding {
    pub(crate) fn new(target: Injectable, options: Options) -> Self {
        Self {
            target,
            options,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub(crate) fn cached(&self) -> Option<Value> {
        self.cell.get().cloned()
    }

    /// Stores `value` unless a racing resolution got there first; returns the stored value.
    pub(crate) fn cache(&self, value: Value) -> Value {
        self.cell.get_or_init(|| value).clone()
    }

    /// The class this binding would produce, if that can be told without resolving it.
    ///
    /// A string target naming a catalog type wins, then an instance's class, then
    /// the binding id itself when it names a catalog type.
    pub(crate) fn declared_type<'a>(&'a self, id: &'a str, catalog: &TypeCatalog) -> Option<&'a str> {
        match &self.target {
            Injectable::Value(Value::Str(name)) if catalog.contains(name) => Some(name),
            Injectable::Value(Value::Object(obj)) => Some(obj.class()),
            _ if catalog.contains(id) => Some(id),
            _ => None,
        }
    }
}

/// Snapshot of a binding taken under the read lock.
pub(crate) struct BoundEntry {
    pub(crate) binding: Binding,
    pub(crate) singleton: bool,
}

/// Bindings in bind order plus the set of ids flagged as singletons.
///
/// The singleton flag belongs to the id, not the binding: re-binding a singleton id
/// keeps it a singleton but starts from an empty cache.
#[derive(Default)]
pub(crate) struct BindingTable {
    order: Vec<String>,
    bindings: AHashMap<String, Binding>,
    singletons: AHashSet<String>,
}

impl BindingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: &str, binding: Binding) {
        if self.bindings.insert(id.to_string(), binding).is_none() {
            self.order.push(id.to_string());
        }
    }

    pub(crate) fn mark_singleton(&mut self, id: &str) {
        self.singletons.insert(id.to_string());
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.bindings.contains_key(id)
    }

    pub(crate) fn is_singleton(&self, id: &str) -> bool {
        self.singletons.contains(id)
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<BoundEntry> {
        self.bindings.get(id).map(|binding| BoundEntry {
            binding: binding.clone(),
            singleton: self.is_singleton(id),
        })
    }

    /// First binding, in bind order, whose declared type satisfies `requested`.
    ///
    /// Bindings declaring a type name must declare a constructible one; instance
    /// bindings match on their class.
    pub(crate) fn find_implementation(&self, requested: &str, catalog: &TypeCatalog) -> Option<String> {
        self.iter()
            .filter(|(id, _)| *id != requested)
            .find(|(id, binding)| {
                let Some(declared) = binding.declared_type(id, catalog) else {
                    return false;
                };
                let is_instance = matches!(binding.target, Injectable::Value(Value::Object(_)));
                (is_instance || catalog.is_constructible(declared)) && catalog.is_subtype(declared, requested)
            })
            .map(|(id, _)| id.to_string())
    }

    pub(crate) fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.iter()
            .map(|(id, binding)| BindingDescriptor {
                id: id.to_string(),
                kind: BindingKind::of(&binding.target),
                singleton: self.is_singleton(id),
                cached: binding.cell.get().is_some(),
            })
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.order
            .iter()
            .filter_map(|id| self.bindings.get(id).map(|b| (id.as_str(), b)))
    }
}
