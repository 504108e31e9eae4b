//! Binding descriptors for introspection and diagnostics.

use crate::marker::Injectable;
use crate::value::Value;

/// What a binding produces, as far as can be told without resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// A string target: another binding id, a type name, or unresolvable
    Name(String),
    /// A callable invoked through the injector
    Factory,
    /// An instance of the named class
    Instance(String),
    /// Any other literal value
    Data,
    /// A service marker pointing at another id
    Service(String),
    /// A datum marker pointing at a data store id
    Datum(String),
    /// A call or factory marker
    Call,
}

impl BindingKind {
    pub(crate) fn of(target: &Injectable) -> Self {
        match target {
            Injectable::Value(Value::Str(name)) => BindingKind::Name(name.clone()),
            Injectable::Value(Value::Callable(_)) => BindingKind::Factory,
            Injectable::Value(Value::Object(obj)) => BindingKind::Instance(obj.class().to_string()),
            Injectable::Value(_) => BindingKind::Data,
            Injectable::Service(r) => BindingKind::Service(r.id.clone()),
            Injectable::Datum(r) => BindingKind::Datum(r.id.clone()),
            Injectable::Call(_) | Injectable::Factory(_) => BindingKind::Call,
        }
    }
}

/// Binding descriptor for introspection and diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{BindingKind, ServiceLocator, TypeCatalog, Value};
///
/// let locator = ServiceLocator::new(TypeCatalog::new());
/// locator.bind("Logger", "FileLogger");
/// locator.singleton("port", Value::Int(8080));
/// locator.get("port").unwrap();
///
/// let descriptors = locator.descriptors();
/// assert_eq!(descriptors[0].id, "Logger");
/// assert_eq!(descriptors[0].kind, BindingKind::Name("FileLogger".to_string()));
/// assert!(descriptors[1].singleton && descriptors[1].cached);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    pub id: String,
    pub kind: BindingKind,
    /// Whether the id is flagged as a singleton
    pub singleton: bool,
    /// Whether a singleton value has already been cached
    pub cached: bool,
}
