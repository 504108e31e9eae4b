//! Object-safe lookup contract shared by the locator and the data store.

use crate::error::DiResult;
use crate::value::Value;

/// Lookup by string identifier.
///
/// Both [`ServiceLocator`](crate::ServiceLocator) and
/// [`DataLocator`](crate::DataLocator) implement it, so code that only needs to
/// fetch things by name can accept either.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Resolver, ServiceLocator, TypeCatalog, Value};
///
/// fn port(source: &dyn Resolver) -> i64 {
///     source.get("port").ok().and_then(|v| v.as_int()).unwrap_or(80)
/// }
///
/// let locator = ServiceLocator::new(TypeCatalog::new());
/// locator.data().set("port", Value::Int(8080));
/// assert_eq!(port(&locator.data()), 8080);
/// assert_eq!(port(&locator), 80);
/// ```
pub trait Resolver {
    /// Fetches `id`, failing with a not-found error when nothing is registered.
    fn get(&self, id: &str) -> DiResult<Value>;

    /// True when `id` is registered.
    fn has(&self, id: &str) -> bool;
}
