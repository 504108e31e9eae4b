use ferrous_locator::{
    ClassDef, CountingObserver, DiError, Injectable, Param, ResolutionObserver, ServiceLocator, TracingObserver,
    TypeCatalog, Value,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ferrous_locator=trace")
        .with_test_writer()
        .try_init();
}

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog
        .add_class(ClassDef::concrete("Clock"))
        .add_class(ClassDef::concrete("Scheduler").constructor(
            vec![Param::class("clock", "Clock")],
            |this, args| {
                this.set("clock", args.get(0));
                Ok(())
            },
        ));
    catalog
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl ResolutionObserver for RecordingObserver {
    fn resolving(&self, id: &str, depth: usize) {
        self.events.lock().push(format!("resolving {} at {}", id, depth));
    }

    fn resolved(&self, id: &str, _duration: Duration) {
        self.events.lock().push(format!("resolved {}", id));
    }

    fn failed(&self, id: &str, error: &DiError) {
        self.events.lock().push(format!("failed {}: {}", id, error));
    }
}

#[test]
fn test_events_follow_nesting() {
    let locator = ServiceLocator::new(catalog());
    let recorder = Arc::new(RecordingObserver::default());
    locator.add_observer(recorder.clone());

    locator.get("Scheduler").unwrap();

    let events = recorder.events.lock().clone();
    assert_eq!(
        events,
        vec![
            "resolving Scheduler at 1",
            "resolving Clock at 2",
            "resolved Clock",
            "resolved Scheduler",
        ]
    );
}

#[test]
fn test_failures_are_reported_then_propagated() {
    let locator = ServiceLocator::new(catalog());
    let recorder = Arc::new(RecordingObserver::default());
    locator.add_observer(recorder.clone());

    let err = locator.get("Nowhere").unwrap_err();
    assert!(err.is_not_found_for("Nowhere"));
    assert_eq!(
        recorder.events.lock().clone(),
        vec!["resolving Nowhere at 1", "failed Nowhere: Service not found: Nowhere"]
    );
}

#[test]
fn test_counting_observer() {
    let locator = ServiceLocator::new(catalog());
    let counter = Arc::new(CountingObserver::new());
    locator.add_observer(counter.clone());

    locator.singleton_self("Clock");
    locator.get("Scheduler").unwrap();
    locator.get("Scheduler").unwrap();

    // Scheduler and Clock, twice each; the cached Clock still passes through the stack
    assert_eq!(counter.resolving_count(), 4);
    assert_eq!(counter.resolved_count(), 4);
    assert_eq!(counter.failed_count(), 0);
    assert_eq!(counter.max_depth(), 2);
}

#[test]
fn test_data_lookups_outside_the_locator_are_not_observed() {
    let locator = ServiceLocator::new(catalog());
    let counter = Arc::new(CountingObserver::new());
    locator.add_observer(counter.clone());

    locator.data().set("clock", Injectable::service("Clock"));
    locator.data().get("clock").unwrap();

    // only the service frame is reported
    assert_eq!(counter.resolving_count(), 1);
    assert_eq!(counter.max_depth(), 2);
}

#[test]
fn test_tracing_observer() {
    init_tracing();
    let locator = ServiceLocator::new(catalog());
    locator.add_observer(Arc::new(TracingObserver::new()));
    locator.bind("tick", Value::Int(1));

    assert_eq!(locator.get("tick").unwrap(), Value::Int(1));
    assert!(locator.get("tock").is_err());
}

#[test]
fn test_multiple_observers_all_notified() {
    let locator = ServiceLocator::new(catalog());
    let first = Arc::new(CountingObserver::new());
    let second = Arc::new(CountingObserver::new());
    locator.add_observer(first.clone());
    locator.add_observer(second.clone());

    locator.get("Clock").unwrap();
    assert_eq!(first.resolved_count(), 1);
    assert_eq!(second.resolved_count(), 1);
}
