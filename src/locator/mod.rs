//! The service locator.
//!
//! Maps string identifiers to bindings and produces values on demand. A binding
//! target may be another id (an alias), a type name to construct, a callable to
//! invoke, an instance, plain data, or a special marker. Unbound type names go
//! through auto-discovery (see [`discovery`]).

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::catalog::TypeCatalog;
use crate::config::LocatorConfig;
use crate::data::{DataLocator, DataStore};
use crate::descriptors::BindingDescriptor;
use crate::error::{ContainerError, DiError, DiResult};
use crate::injector::Injector;
use crate::internal::ResolutionContext;
use crate::marker::{Injectable, Target};
use crate::observer::{Observers, ResolutionObserver};
use crate::options::Options;
use crate::registration::{Binding, BindingTable, BoundEntry};
use crate::traits::Resolver;
use crate::value::Value;

mod discovery;

/// Service locator with singletons, auto-discovery and a companion data store.
///
/// The locator is cheap to clone: clones share the same bindings, caches and data.
///
/// # Thread Safety
///
/// Binding tables are guarded by `parking_lot` locks that are never held while a
/// constructor, factory or nested resolution runs. Singleton caching goes through
/// a per-binding `OnceCell`, so two threads racing on the first resolution of a
/// singleton both return the value that won the race.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{ClassDef, Param, ServiceLocator, TypeCatalog, Value};
///
/// let mut catalog = TypeCatalog::new();
/// catalog
///     .add_class(ClassDef::interface("Logger"))
///     .add_class(ClassDef::concrete("FileLogger").implements("Logger"))
///     .add_class(ClassDef::concrete("Mailer").constructor(
///         vec![Param::class("logger", "Logger")],
///         |this, args| {
///             this.set("logger", args.get(0));
///             Ok(())
///         },
///     ));
///
/// let locator = ServiceLocator::new(catalog);
/// locator.singleton("Logger", "FileLogger");
///
/// let mailer = locator.get("Mailer").unwrap();
/// let logger = mailer.as_object().unwrap().get("logger").unwrap();
/// assert_eq!(logger.as_object().unwrap().class(), "FileLogger");
/// assert!(logger.same(&locator.get("Logger").unwrap()));
/// ```
#[derive(Clone)]
pub struct ServiceLocator {
    inner: Arc<LocatorInner>,
}

struct LocatorInner {
    catalog: Arc<TypeCatalog>,
    config: LocatorConfig,
    bindings: RwLock<BindingTable>,
    data: RwLock<DataStore>,
    observers: Observers,
}

impl ServiceLocator {
    /// Creates a locator over `catalog` with the default configuration.
    pub fn new(catalog: TypeCatalog) -> Self {
        Self::with_config(catalog, LocatorConfig::default())
    }

    pub fn with_config(catalog: TypeCatalog, config: LocatorConfig) -> Self {
        Self::from_shared(Arc::new(catalog), config)
    }

    /// Creates a locator sharing an existing catalog.
    pub fn from_shared(catalog: Arc<TypeCatalog>, config: LocatorConfig) -> Self {
        Self {
            inner: Arc::new(LocatorInner {
                catalog,
                config,
                bindings: RwLock::new(BindingTable::new()),
                data: RwLock::new(DataStore::new()),
                observers: Observers::new(),
            }),
        }
    }

    #[inline]
    pub fn catalog(&self) -> &TypeCatalog {
        &self.inner.catalog
    }

    #[inline]
    pub fn config(&self) -> &LocatorConfig {
        &self.inner.config
    }

    /// Binds `id` to `target`, replacing any previous binding of `id`.
    pub fn bind(&self, id: &str, target: impl Into<Injectable>) -> &Self {
        self.bind_with(id, target, Options::default())
    }

    /// Binds `id` to `target` with options merged into every resolution of `id`.
    pub fn bind_with(&self, id: &str, target: impl Into<Injectable>, options: Options) -> &Self {
        let binding = Binding::new(target.into(), options);
        self.inner.bindings.write().insert(id, binding);
        self
    }

    /// Binds a type name to itself.
    pub fn bind_self(&self, id: &str) -> &Self {
        self.bind(id, id)
    }

    /// Flags `id` as a singleton, then binds it.
    ///
    /// The flag belongs to the id: re-binding it later with [`bind`](Self::bind)
    /// keeps it a singleton but discards the cached value.
    pub fn singleton(&self, id: &str, target: impl Into<Injectable>) -> &Self {
        self.singleton_with(id, target, Options::default())
    }

    pub fn singleton_with(&self, id: &str, target: impl Into<Injectable>, options: Options) -> &Self {
        let binding = Binding::new(target.into(), options);
        let mut bindings = self.inner.bindings.write();
        bindings.mark_singleton(id);
        bindings.insert(id, binding);
        self
    }

    /// A singleton bound to its own type name.
    pub fn singleton_self(&self, id: &str) -> &Self {
        self.singleton(id, id)
    }

    /// True when `id` has a binding. Auto-discovery is not attempted.
    pub fn has(&self, id: &str) -> bool {
        self.inner.bindings.read().contains(id)
    }

    pub fn is_singleton(&self, id: &str) -> bool {
        self.inner.bindings.read().is_singleton(id)
    }

    /// Every binding, in bind order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.inner.bindings.read().descriptors()
    }

    /// Resolves `id`.
    pub fn get(&self, id: &str) -> DiResult<Value> {
        self.get_with(id, Options::default())
    }

    /// Resolves `id` with call-site options merged over the binding's stored options.
    pub fn get_with(&self, id: &str, options: Options) -> DiResult<Value> {
        let mut ctx = self.context();
        self.get_in(&mut ctx, id, &options)
    }

    /// The parameter resolver backed by this locator.
    pub fn injector(&self) -> Injector<'_> {
        Injector::new(self)
    }

    /// The data store backed by this locator.
    pub fn data(&self) -> DataLocator<'_> {
        DataLocator::new(self)
    }

    pub fn add_observer(&self, observer: Arc<dyn ResolutionObserver>) {
        self.inner.observers.add(observer);
    }

    pub(crate) fn context(&self) -> ResolutionContext {
        ResolutionContext::new(self.inner.config.max_resolution_depth)
    }

    pub(crate) fn data_store(&self) -> &RwLock<DataStore> {
        &self.inner.data
    }

    /// Resolves `id` inside an existing resolution, entering a new frame for it.
    pub(crate) fn get_in(&self, ctx: &mut ResolutionContext, id: &str, options: &Options) -> DiResult<Value> {
        ctx.within(id, |ctx| {
            if !self.inner.observers.has_observers() {
                return self.resolve_in(ctx, id, options);
            }

            let start = Instant::now();
            self.inner.observers.resolving(id, ctx.depth());
            let result = self.resolve_in(ctx, id, options);
            match &result {
                Ok(_) => self.inner.observers.resolved(id, start.elapsed()),
                Err(err) => self.inner.observers.failed(id, err),
            }
            result
        })
    }

    /// Resolves `id` in the current frame: the binding if there is one, else auto-discovery.
    fn resolve_in(&self, ctx: &mut ResolutionContext, id: &str, options: &Options) -> DiResult<Value> {
        // Snapshot so the lock is released before any user code runs
        let entry = self.inner.bindings.read().lookup(id);
        match entry {
            Some(entry) => self.resolve_binding(ctx, id, entry, options),
            None => self.discover(ctx, id, options),
        }
    }

    fn resolve_binding(
        &self,
        ctx: &mut ResolutionContext,
        id: &str,
        entry: BoundEntry,
        options: &Options,
    ) -> DiResult<Value> {
        let BoundEntry { binding, singleton } = entry;

        if singleton {
            if let Some(cached) = binding.cached() {
                trace!(id, "singleton cache hit");
                return Ok(cached);
            }
        }

        let merged = binding.options.merged_with(options);
        let produced = match &binding.target {
            Injectable::Service(service) => {
                let nested = merged.merged_with(&service.options);
                self.get_in(ctx, &service.id, &nested)?
            }
            Injectable::Datum(datum) => self.data().get_datum_in(ctx, datum).map_err(|err| match err {
                DiError::DatumNotFound(missing) if missing == datum.id => ContainerError::MissingDatum {
                    service: id.to_string(),
                    datum: missing,
                }
                .into(),
                other => other,
            })?,
            Injectable::Call(target) | Injectable::Factory(target) => {
                self.injector().call_in(ctx, target, &merged)?
            }
            Injectable::Value(value) => self.produce(ctx, id, value, singleton, &merged)?,
        };

        if singleton {
            debug!(id, "caching singleton");
            return Ok(binding.cache(produced));
        }
        Ok(produced)
    }

    /// Interprets a plain binding target.
    fn produce(
        &self,
        ctx: &mut ResolutionContext,
        id: &str,
        value: &Value,
        singleton: bool,
        options: &Options,
    ) -> DiResult<Value> {
        match value {
            Value::Str(name) => {
                if name != id && self.has(name) {
                    trace!(id, alias = %name, "following alias");
                    self.get_in(ctx, name, options)
                } else if self.catalog().is_constructible(name) {
                    self.injector().call_in(ctx, &Target::Named(name.clone()), options)
                } else {
                    Err(ContainerError::Unresolvable {
                        id: id.to_string(),
                        target: name.clone(),
                    }
                    .into())
                }
            }
            Value::Callable(factory) => {
                self.injector()
                    .call_in(ctx, &Target::Function(factory.clone()), options)
            }
            // Non-singletons hand out a fresh copy each time
            Value::Object(obj) if !singleton => Ok(Value::Object(obj.shallow_copy())),
            other => Ok(other.clone()),
        }
    }
}

impl Resolver for ServiceLocator {
    fn get(&self, id: &str) -> DiResult<Value> {
        ServiceLocator::get(self, id)
    }

    fn has(&self, id: &str) -> bool {
        ServiceLocator::has(self, id)
    }
}

impl std::fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.descriptors().into_iter().map(|d| d.id).collect();
        f.debug_struct("ServiceLocator")
            .field("bindings", &ids)
            .field("config", &self.inner.config)
            .finish()
    }
}
