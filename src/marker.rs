//! Special markers and call targets.
//!
//! Anywhere a plain value is accepted (a binding target, an override, a data store
//! entry) an [`Injectable`] may instead carry a marker saying "resolve this
//! indirectly". Markers carry no behaviour; the locator and the injector match on
//! them at each interpretation point.

use crate::catalog::Callable;
use crate::error::{DiError, DiResult};
use crate::options::Options;
use crate::value::{ObjectRef, Value};

/// "Resolve `id` through the locator, merging `options`."
#[derive(Debug, Clone)]
pub struct ServiceRef {
    pub id: String,
    pub options: Options,
}

/// "Fetch `id` from the data store, then navigate `path` into it."
#[derive(Debug, Clone)]
pub struct DatumRef {
    pub id: String,
    /// Dotted path, empty for the whole value
    pub path: String,
}

impl DatumRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: String::new(),
        }
    }

    pub fn at(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// A value or a special marker.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Injectable, Target, Value};
///
/// let plain = Injectable::from("postgres://localhost");
/// let service = Injectable::service("Database");
/// let datum = Injectable::datum_at("settings", "db.port");
/// let lazy = Injectable::call(Target::from("load_settings"));
///
/// assert!(!plain.is_marker());
/// assert!(service.is_marker() && datum.is_marker() && lazy.is_marker());
/// ```
#[derive(Debug, Clone)]
pub enum Injectable {
    /// Used literally (a bare string binding target is an alias or a type name)
    Value(Value),
    Service(ServiceRef),
    Datum(DatumRef),
    /// Invoke the target through the injector and use its return value
    Call(Target),
    /// Like `Call`, but never memoized by the data store
    Factory(Target),
}

impl Injectable {
    pub fn service(id: impl Into<String>) -> Self {
        Self::service_with(id, Options::default())
    }

    pub fn service_with(id: impl Into<String>, options: Options) -> Self {
        Injectable::Service(ServiceRef {
            id: id.into(),
            options,
        })
    }

    pub fn datum(id: impl Into<String>) -> Self {
        Injectable::Datum(DatumRef::new(id))
    }

    pub fn datum_at(id: impl Into<String>, path: impl Into<String>) -> Self {
        Injectable::Datum(DatumRef::at(id, path))
    }

    pub fn call(target: impl Into<Target>) -> Self {
        Injectable::Call(target.into())
    }

    pub fn factory(target: impl Into<Target>) -> Self {
        Injectable::Factory(target.into())
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self, Injectable::Value(_))
    }
}

impl From<Value> for Injectable {
    fn from(value: Value) -> Self {
        Injectable::Value(value)
    }
}

impl From<&str> for Injectable {
    fn from(s: &str) -> Self {
        Injectable::Value(Value::from(s))
    }
}

impl From<String> for Injectable {
    fn from(s: String) -> Self {
        Injectable::Value(Value::Str(s))
    }
}

impl From<i64> for Injectable {
    fn from(i: i64) -> Self {
        Injectable::Value(Value::Int(i))
    }
}

impl From<i32> for Injectable {
    fn from(i: i32) -> Self {
        Injectable::Value(Value::Int(i64::from(i)))
    }
}

impl From<bool> for Injectable {
    fn from(b: bool) -> Self {
        Injectable::Value(Value::Bool(b))
    }
}

impl From<ObjectRef> for Injectable {
    fn from(obj: ObjectRef) -> Self {
        Injectable::Value(Value::Object(obj))
    }
}

impl From<Callable> for Injectable {
    fn from(c: Callable) -> Self {
        Injectable::Value(Value::Callable(c))
    }
}

impl From<ServiceRef> for Injectable {
    fn from(r: ServiceRef) -> Self {
        Injectable::Service(r)
    }
}

impl From<DatumRef> for Injectable {
    fn from(r: DatumRef) -> Self {
        Injectable::Datum(r)
    }
}

/// The receiver half of a `(receiver, member)` call target.
#[derive(Debug, Clone)]
pub enum Receiver {
    Instance(ObjectRef),
    /// A type name; instance members obtain an instance from the locator
    Type(String),
}

/// Something the injector can call.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Target, ObjectRef, Value};
///
/// let by_name = Target::from("Mailer::send");
/// let method = Target::member(ObjectRef::new("Mailer"), "send");
///
/// // arbitrary values are checked once at the boundary
/// assert!(Target::from_value(Value::Int(3)).is_err());
/// assert!(Target::from_value(Value::from("Mailer")).is_ok());
/// ```
#[derive(Debug, Clone)]
pub enum Target {
    /// A class to construct, a catalog function, or `"Type::member"`
    Named(String),
    Function(Callable),
    /// An instance with an `invoke` entrypoint
    Instance(ObjectRef),
    Member(Receiver, String),
}

impl Target {
    pub fn member(receiver: impl Into<Receiver>, member: impl Into<String>) -> Self {
        Target::Member(receiver.into(), member.into())
    }

    /// Decides the target shape of an arbitrary value.
    ///
    /// Strings, callables and objects map to their variants; a two element list
    /// `[receiver, "member"]` maps to [`Target::Member`]. Anything else is uncallable.
    pub fn from_value(value: Value) -> DiResult<Self> {
        match value {
            Value::Str(name) => Ok(Target::Named(name)),
            Value::Callable(c) => Ok(Target::Function(c)),
            Value::Object(obj) => Ok(Target::Instance(obj)),
            Value::List(items) if items.len() == 2 => {
                let member = items[1]
                    .as_str()
                    .ok_or_else(|| DiError::Uncallable(format!("{:?}", items)))?
                    .to_string();
                let receiver = match &items[0] {
                    Value::Object(obj) => Receiver::Instance(obj.clone()),
                    Value::Str(name) => Receiver::Type(name.clone()),
                    _ => return Err(DiError::Uncallable(format!("{:?}", items))),
                };
                Ok(Target::Member(receiver, member))
            }
            other => Err(DiError::Uncallable(format!("{:?}", other))),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Named(name)
    }
}

impl From<Callable> for Target {
    fn from(c: Callable) -> Self {
        Target::Function(c)
    }
}

impl From<ObjectRef> for Target {
    fn from(obj: ObjectRef) -> Self {
        Target::Instance(obj)
    }
}

impl From<ObjectRef> for Receiver {
    fn from(obj: ObjectRef) -> Self {
        Receiver::Instance(obj)
    }
}

impl From<&str> for Receiver {
    fn from(name: &str) -> Self {
        Receiver::Type(name.to_string())
    }
}

impl From<String> for Receiver {
    fn from(name: String) -> Self {
        Receiver::Type(name)
    }
}
