//! Declared parameters and type hints.

use std::fmt;

use crate::catalog::TypeCatalog;
use crate::value::{Value, ValueKind};

/// Builtin (primitive) types. These never drive type-directed injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Callable,
    /// Any object, whatever its class
    Object,
}

impl Builtin {
    fn accepts(self, value: &Value) -> bool {
        let kind = value.kind();
        match self {
            Builtin::Null => kind == ValueKind::Null,
            Builtin::Bool => kind == ValueKind::Bool,
            Builtin::Int => kind == ValueKind::Int,
            Builtin::Float => kind == ValueKind::Float,
            Builtin::Str => kind == ValueKind::Str,
            Builtin::List => kind == ValueKind::List,
            Builtin::Map => kind == ValueKind::Map,
            Builtin::Callable => kind == ValueKind::Callable,
            Builtin::Object => kind == ValueKind::Object,
        }
    }
}

/// One member of a type hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Builtin(Builtin),
    /// A catalog class or interface name
    Class(String),
}

impl TypeRef {
    /// Type-match check for a single member.
    pub fn accepts(&self, value: &Value, catalog: &TypeCatalog) -> bool {
        match self {
            TypeRef::Builtin(b) => b.accepts(value),
            TypeRef::Class(name) => value
                .as_object()
                .map(|obj| catalog.is_subtype(obj.class(), name))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(b) => write!(f, "{:?}", b),
            TypeRef::Class(name) => f.write_str(name),
        }
    }
}

/// The declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeHint {
    /// No declared type: anything matches
    #[default]
    Any,
    One(TypeRef),
    Union(Vec<TypeRef>),
}

impl TypeHint {
    pub fn class(name: impl Into<String>) -> Self {
        TypeHint::One(TypeRef::Class(name.into()))
    }

    pub fn builtin(builtin: Builtin) -> Self {
        TypeHint::One(TypeRef::Builtin(builtin))
    }

    pub fn union(members: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeHint::Union(members.into_iter().collect())
    }

    /// The class name type-directed injection asks the locator for.
    ///
    /// Only the first member of a union is considered, and builtins are never looked up.
    pub fn injectable_type(&self) -> Option<&str> {
        let first = match self {
            TypeHint::Any => None,
            TypeHint::One(member) => Some(member),
            TypeHint::Union(members) => members.first(),
        };
        match first {
            Some(TypeRef::Class(name)) => Some(name),
            _ => None,
        }
    }

    /// Type-match check: empty hints match anything, unions match if any member does.
    pub fn accepts(&self, value: &Value, catalog: &TypeCatalog) -> bool {
        match self {
            TypeHint::Any => true,
            TypeHint::One(member) => member.accepts(value, catalog),
            TypeHint::Union(members) => members.iter().any(|m| m.accepts(value, catalog)),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Any => f.write_str("mixed"),
            TypeHint::One(member) => member.fmt(f),
            TypeHint::Union(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                f.write_str(&parts.join("|"))
            }
        }
    }
}

/// A declared parameter of a function, method or constructor.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Param, TypeHint, Builtin, Value};
///
/// let shape = Param::class("shape", "Shape");
/// let label = Param::new("label")
///     .typed(TypeHint::builtin(Builtin::Str))
///     .default_value("unnamed");
///
/// assert!(!shape.is_optional());
/// assert_eq!(label.default(), Some(&Value::from("unnamed")));
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    hint: TypeHint,
    default: Option<Value>,
}

impl Param {
    /// An untyped, required parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: TypeHint::Any,
            default: None,
        }
    }

    /// A required parameter typed to a class or interface.
    pub fn class(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self::new(name).typed(TypeHint::class(class))
    }

    pub fn typed(mut self, hint: TypeHint) -> Self {
        self.hint = hint;
        self
    }

    /// Makes the parameter optional with the given default.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hint(&self) -> &TypeHint {
        &self.hint
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}
