//! Dynamic runtime values flowing through the locator and the injector.
//!
//! Values are cheap to clone. Objects, lists and maps are reference counted, so a
//! clone shares the same allocation and [`Value::same`] can tell "the identical
//! instance" apart from "an equal copy". That distinction carries singleton
//! identity and the shallow-copy rule for non-singleton instance bindings.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::Callable;

/// A runtime value.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Value, ObjectRef};
///
/// let circle = ObjectRef::new("Circle").with_field("radius", 2);
/// let a = Value::from(circle.clone());
/// let b = Value::from(circle);
/// assert!(a.same(&b));
///
/// let copy = Value::from(a.as_object().unwrap().shallow_copy());
/// assert!(!a.same(&copy));
/// assert_eq!(copy.as_object().unwrap().get("radius"), Some(Value::Int(2)));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Arc<Vec<Value>>),
    Map(Arc<BTreeMap<String, Value>>),
    Object(ObjectRef),
    Callable(Callable),
}

/// Runtime tag of a [`Value`], used by builtin type matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Object,
    Callable,
}

impl Value {
    /// Builds a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    /// Builds a map value.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
            Value::Callable(_) => ValueKind::Callable,
        }
    }

    /// Reference identity for objects, lists, maps and callables; equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => self == other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Navigates a dotted path (`"db.hosts.0"`) through maps, lists and object fields.
    ///
    /// An empty path returns the value itself; a segment that does not exist yields
    /// [`Value::Null`].
    pub fn at_path(&self, path: &str) -> Value {
        if path.is_empty() {
            return self.clone();
        }
        let mut current = self.clone();
        for segment in path.split('.') {
            current = match &current {
                Value::Map(entries) => entries.get(segment).cloned().unwrap_or_default(),
                Value::List(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or_default(),
                Value::Object(obj) => obj.get(segment).unwrap_or_default(),
                _ => Value::Null,
            };
        }
        current
    }
}

// Objects and callables compare by identity, everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
            Value::Object(obj) => obj.fmt(f),
            Value::Callable(c) => c.fmt(f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

#[cfg(feature = "config")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(entries) => {
                Value::map(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// An instance of a catalog class.
///
/// Fields are interior-mutable so a shared instance (a cached singleton or a
/// memoized datum) observes in-place changes made through any handle.
pub struct Object {
    class: String,
    fields: RwLock<BTreeMap<String, Value>>,
}

/// Shared handle to an [`Object`].
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Creates an empty instance of `class`.
    pub fn new(class: impl Into<String>) -> Self {
        ObjectRef(Arc::new(Object {
            class: class.into(),
            fields: RwLock::new(BTreeMap::new()),
        }))
    }

    /// Builder-style field assignment.
    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.fields.write().insert(name.into(), value.into());
    }

    /// Snapshot of all fields.
    pub fn fields(&self) -> BTreeMap<String, Value> {
        self.0.fields.read().clone()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A new instance of the same class holding the same field values.
    ///
    /// Nested objects are shared, not copied.
    pub fn shallow_copy(&self) -> ObjectRef {
        ObjectRef(Arc::new(Object {
            class: self.0.class.clone(),
            fields: RwLock::new(self.fields()),
        }))
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.0.class);
        match self.0.fields.try_read() {
            Some(fields) => {
                for (name, value) in fields.iter() {
                    s.field(name, value);
                }
            }
            None => {
                s.field("fields", &"<locked>");
            }
        }
        s.finish()
    }
}
