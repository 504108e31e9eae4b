//! Diagnostic observers for resolution events.
//!
//! Observers see every id the locator enters, with its depth in the in-flight
//! stack, how long it took and whether it failed. They are called synchronously
//! during resolution, so implementations should stay cheap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::DiError;

/// Observer of resolution events.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use ferrous_locator::{CountingObserver, ServiceLocator, TypeCatalog, Value};
///
/// let locator = ServiceLocator::new(TypeCatalog::new());
/// let counter = Arc::new(CountingObserver::new());
/// locator.add_observer(counter.clone());
///
/// locator.bind("answer", Value::Int(42));
/// locator.get("answer").unwrap();
/// assert!(locator.get("question").is_err());
///
/// assert_eq!(counter.resolving_count(), 2);
/// assert_eq!(counter.resolved_count(), 1);
/// assert_eq!(counter.failed_count(), 1);
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called when `id` enters the in-flight stack at `depth` (1 for a top-level get).
    fn resolving(&self, id: &str, depth: usize);

    /// Called when `id` produced a value.
    fn resolved(&self, id: &str, duration: Duration);

    /// Called when resolving `id` failed. The error still propagates afterwards.
    fn failed(&self, id: &str, error: &DiError) {
        let _ = (id, error);
    }
}

/// The observers attached to a locator.
#[derive(Default)]
pub(crate) struct Observers {
    observers: RwLock<Vec<Arc<dyn ResolutionObserver>>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.write().push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.read().is_empty()
    }

    // Snapshot so no lock is held while observer code runs.
    fn snapshot(&self) -> Vec<Arc<dyn ResolutionObserver>> {
        self.observers.read().clone()
    }

    pub(crate) fn resolving(&self, id: &str, depth: usize) {
        for observer in self.snapshot() {
            observer.resolving(id, depth);
        }
    }

    pub(crate) fn resolved(&self, id: &str, duration: Duration) {
        for observer in self.snapshot() {
            observer.resolved(id, duration);
        }
    }

    pub(crate) fn failed(&self, id: &str, error: &DiError) {
        for observer in self.snapshot() {
            observer.failed(id, error);
        }
    }
}

/// Emits resolution events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, id: &str, depth: usize) {
        debug!(id, depth, "resolving");
    }

    fn resolved(&self, id: &str, duration: Duration) {
        debug!(id, elapsed_us = duration.as_micros() as u64, "resolved");
    }

    fn failed(&self, id: &str, error: &DiError) {
        warn!(id, %error, "resolution failed");
    }
}

/// Counts resolution events.
#[derive(Debug, Default)]
pub struct CountingObserver {
    resolving: AtomicUsize,
    resolved: AtomicUsize,
    failed: AtomicUsize,
    max_depth: AtomicUsize,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolving_count(&self) -> usize {
        self.resolving.load(Ordering::Relaxed)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.load(Ordering::Relaxed)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Deepest in-flight stack observed so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth.load(Ordering::Relaxed)
    }
}

impl ResolutionObserver for CountingObserver {
    fn resolving(&self, _id: &str, depth: usize) {
        self.resolving.fetch_add(1, Ordering::Relaxed);
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    fn resolved(&self, _id: &str, _duration: Duration) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    fn failed(&self, _id: &str, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}
