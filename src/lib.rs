//! # ferrous-locator
//!
//! A string-keyed service locator with type-directed parameter injection.
//!
//! ## Features
//!
//! - **Bindings by id**: aliases, type names, factories, instances, plain data and markers
//! - **Singletons**: resolved once per binding and shared, thread-safe
//! - **Auto-discovery**: unbound interfaces resolve to the first compatible binding
//! - **Parameter injection**: overrides, type lookup, name lookup, defaults
//! - **Data store**: eager, lazy (memoized) and factory entries next to the services
//! - **Cycle and depth detection**: per resolution, with the full path in the error
//!
//! Rust has no runtime reflection, so the classes, functions and parameter lists the
//! injector works from are declared up front in a [`TypeCatalog`].
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_locator::{ClassDef, Param, ServiceLocator, TypeCatalog, Value};
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .add_class(ClassDef::interface("Database"))
//!     .add_class(ClassDef::concrete("Postgres").implements("Database").constructor(
//!         vec![Param::new("url").default_value("postgres://localhost")],
//!         |this, args| {
//!             this.set("url", args.get(0));
//!             Ok(())
//!         },
//!     ))
//!     .add_class(ClassDef::concrete("UserService").constructor(
//!         vec![Param::class("db", "Database")],
//!         |this, args| {
//!             this.set("db", args.get(0));
//!             Ok(())
//!         },
//!     ));
//!
//! let locator = ServiceLocator::new(catalog);
//! locator.singleton("Database", "Postgres");
//!
//! let users = locator.get("UserService").unwrap();
//! let url = users.at_path("db.url");
//! assert_eq!(url, Value::from("postgres://localhost"));
//! ```
//!
//! ## Markers
//!
//! ```rust
//! use ferrous_locator::{Injectable, ServiceLocator, TypeCatalog, Value};
//!
//! let locator = ServiceLocator::new(TypeCatalog::new());
//! locator.data().set("settings", Value::map([("port", Value::Int(8080))]));
//! locator.bind("port", Injectable::datum_at("settings", "port"));
//! locator.bind("listen_port", Injectable::service("port"));
//!
//! assert_eq!(locator.get("listen_port").unwrap(), Value::Int(8080));
//! ```

// Module declarations
pub mod catalog;
pub mod config;
pub mod data;
pub mod descriptors;
pub mod error;
pub mod injector;
pub mod locator;
pub mod marker;
pub mod observer;
pub mod options;
pub mod param;
pub mod traits;
pub mod value;

// Internal modules
mod internal;
mod registration;

// Re-exports
pub use catalog::{Args, Callable, ClassDef, ClassKind, MethodDef, TypeCatalog, Visibility, INVOKE};
pub use config::{LocatorConfig, NameConvention, DEFAULT_MAX_RESOLUTION_DEPTH};
pub use data::DataLocator;
pub use descriptors::{BindingDescriptor, BindingKind};
pub use error::{ContainerError, DiError, DiResult};
pub use injector::Injector;
pub use locator::ServiceLocator;
pub use marker::{DatumRef, Injectable, Receiver, ServiceRef, Target};
pub use observer::{CountingObserver, ResolutionObserver, TracingObserver};
pub use options::{Options, Overrides, ParamKey};
pub use param::{Builtin, Param, TypeHint, TypeRef};
pub use traits::{Resolver, Signature};
pub use value::{ObjectRef, Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_catalog(counter: Arc<AtomicUsize>) -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.add_class(ClassDef::concrete("Counter").constructor(vec![], move |this, _| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            this.set("n", n as i64);
            Ok(())
        }));
        catalog
    }

    #[test]
    fn test_singleton_resolution() {
        let counter = Arc::new(AtomicUsize::new(0));
        let locator = ServiceLocator::new(counting_catalog(counter.clone()));
        locator.singleton_self("Counter");

        let a = locator.get("Counter").unwrap();
        let b = locator.get("Counter").unwrap();

        assert!(a.same(&b)); // Same instance
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_resolution() {
        let counter = Arc::new(AtomicUsize::new(0));
        let locator = ServiceLocator::new(counting_catalog(counter.clone()));
        locator.bind_self("Counter");

        let a = locator.get("Counter").unwrap();
        let b = locator.get("Counter").unwrap();

        assert!(!a.same(&b)); // Different instances
        assert_eq!(a.at_path("n"), Value::Int(1));
        assert_eq!(b.at_path("n"), Value::Int(2));
    }

    #[test]
    fn test_clones_share_state() {
        let locator = ServiceLocator::new(TypeCatalog::new());
        let clone = locator.clone();
        clone.bind("answer", Value::Int(42));
        assert_eq!(locator.get("answer").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_resolver_trait_objects() {
        let locator = ServiceLocator::new(TypeCatalog::new());
        locator.bind("svc", "value");
        locator.data().set("datum", Value::Int(1));

        let data = locator.data();
        let sources: [&dyn Resolver; 2] = [&locator, &data];
        assert!(sources[0].has("svc") && !sources[0].has("datum"));
        assert!(sources[1].has("datum") && !sources[1].has("svc"));
    }
}
