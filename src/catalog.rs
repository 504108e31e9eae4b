//! Registration-time type catalog.
//!
//! Rust has no runtime reflection over constructors and method signatures, so the
//! catalog is the table the injector consults instead: which classes exist, what
//! they extend and implement, which parameters their constructors and methods
//! declare, and the bodies to run once those parameters are resolved.
//!
//! The catalog is built up front and handed to
//! [`ServiceLocator::new`](crate::ServiceLocator::new); it is immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::DiResult;
use crate::param::Param;
use crate::traits::Signature;
use crate::value::{ObjectRef, Value};

/// Name of the method that makes an instance invocable as a call target.
pub const INVOKE: &str = "invoke";

/// Arguments handed to a body once every parameter has been resolved.
#[derive(Debug, Clone, Default)]
pub struct Args {
    receiver: Option<ObjectRef>,
    values: Vec<Value>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self { receiver: None, values }
    }

    pub(crate) fn with_receiver(mut self, receiver: ObjectRef) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// The instance an instance method was invoked on.
    pub fn receiver(&self) -> Option<&ObjectRef> {
        self.receiver.as_ref()
    }

    /// Positional argument, or `Value::Null` past the end.
    pub fn get(&self, index: usize) -> Value {
        self.values.get(index).cloned().unwrap_or_default()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Body of a function, method or factory.
pub type Body = Arc<dyn Fn(Args) -> DiResult<Value> + Send + Sync>;

/// Body of a constructor: initialises a freshly allocated instance.
pub type InitBody = Arc<dyn Fn(&ObjectRef, Args) -> DiResult<()> + Send + Sync>;

/// A function with declared parameters.
pub struct FunctionDef {
    name: Option<String>,
    params: Vec<Param>,
    body: Body,
}

impl FunctionDef {
    pub(crate) fn invoke(&self, args: Args) -> DiResult<Value> {
        (self.body)(args)
    }
}

impl Signature for FunctionDef {
    fn parameters(&self) -> &[Param] {
        &self.params
    }

    fn describe(&self) -> String {
        self.name.clone().unwrap_or_else(|| "{closure}".to_string())
    }
}

/// A function value: a named catalog function or an anonymous closure.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Callable, Param, Value};
///
/// let greet = Callable::new(vec![Param::new("name").default_value("world")], |args| {
///     Ok(Value::from(format!("hello {}", args.get(0).as_str().unwrap_or(""))))
/// });
/// assert_eq!(greet.params().len(), 1);
/// ```
#[derive(Clone)]
pub struct Callable(Arc<FunctionDef>);

impl Callable {
    /// An anonymous closure.
    pub fn new<F>(params: Vec<Param>, body: F) -> Self
    where
        F: Fn(Args) -> DiResult<Value> + Send + Sync + 'static,
    {
        Callable(Arc::new(FunctionDef {
            name: None,
            params,
            body: Arc::new(body),
        }))
    }

    /// A closure without parameters.
    pub fn thunk<F>(body: F) -> Self
    where
        F: Fn() -> DiResult<Value> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| body())
    }

    pub(crate) fn named(name: String, params: Vec<Param>, body: Body) -> Self {
        Callable(Arc::new(FunctionDef {
            name: Some(name),
            params,
            body,
        }))
    }

    pub fn params(&self) -> &[Param] {
        &self.0.params
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn def(&self) -> &FunctionDef {
        &self.0
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}/{}", self.0.describe(), self.0.params.len())
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A method declared on a class.
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    params: Vec<Param>,
    visibility: Visibility,
    is_static: bool,
    body: Body,
}

impl MethodDef {
    /// A public instance method.
    pub fn new<F>(name: impl Into<String>, params: Vec<Param>, body: F) -> Self
    where
        F: Fn(Args) -> DiResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            visibility: Visibility::Public,
            is_static: false,
            body: Arc::new(body),
        }
    }

    /// Marks the method as callable without an instance.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub(crate) fn invoke(&self, args: Args) -> DiResult<Value> {
        (self.body)(args)
    }
}

impl Signature for MethodDef {
    fn parameters(&self) -> &[Param] {
        &self.params
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// A class constructor.
#[derive(Clone)]
pub struct Constructor {
    params: Vec<Param>,
    init: InitBody,
}

impl Constructor {
    pub(crate) fn init(&self, this: &ObjectRef, args: Args) -> DiResult<()> {
        (self.init)(this, args)
    }
}

impl Signature for Constructor {
    fn parameters(&self) -> &[Param] {
        &self.params
    }

    fn describe(&self) -> String {
        "constructor".to_string()
    }
}

/// What kind of type a [`ClassDef`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

/// A class or interface known to the catalog.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{ClassDef, Param};
///
/// let logger = ClassDef::concrete("FileLogger")
///     .implements("Logger")
///     .constructor(vec![Param::new("path").default_value("/tmp/app.log")], |this, args| {
///         this.set("path", args.get(0));
///         Ok(())
///     });
/// assert!(logger.is_constructible());
/// ```
#[derive(Clone)]
pub struct ClassDef {
    name: String,
    kind: ClassKind,
    parent: Option<String>,
    interfaces: Vec<String>,
    constructor: Option<Constructor>,
    methods: BTreeMap<String, MethodDef>,
}

impl ClassDef {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            methods: BTreeMap::new(),
        }
    }

    pub fn concrete(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Concrete)
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Abstract)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    /// Parent class.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Implemented interface, or extended interface when `self` is an interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn constructor<F>(mut self, params: Vec<Param>, init: F) -> Self
    where
        F: Fn(&ObjectRef, Args) -> DiResult<()> + Send + Sync + 'static,
    {
        self.constructor = Some(Constructor {
            params,
            init: Arc::new(init),
        });
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn is_constructible(&self) -> bool {
        self.kind == ClassKind::Concrete
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// The table of known classes, interfaces and free functions.
///
/// Types are kept in declaration order; auto-discovery in scan-all mode walks them
/// in that order and picks the first match.
#[derive(Clone, Default)]
pub struct TypeCatalog {
    types: Vec<ClassDef>,
    index: AHashMap<String, usize>,
    functions: AHashMap<String, Callable>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a class or interface. Re-declaring a name replaces it in place.
    pub fn add_class(&mut self, def: ClassDef) -> &mut Self {
        match self.index.get(&def.name) {
            Some(&pos) => self.types[pos] = def,
            None => {
                self.index.insert(def.name.clone(), self.types.len());
                self.types.push(def);
            }
        }
        self
    }

    /// Declares a named free function.
    pub fn add_function<F>(&mut self, name: impl Into<String>, params: Vec<Param>, body: F) -> &mut Self
    where
        F: Fn(Args) -> DiResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::named(name.clone(), params, Arc::new(body));
        self.functions.insert(name, callable);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.index.get(name).map(|&pos| &self.types[pos])
    }

    pub fn function(&self, name: &str) -> Option<&Callable> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_constructible(&self, name: &str) -> bool {
        self.class(name).map(ClassDef::is_constructible).unwrap_or(false)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.class(name).map(ClassDef::is_interface).unwrap_or(false)
    }

    /// Every declared type, in declaration order.
    pub fn known_types(&self) -> impl Iterator<Item = &ClassDef> {
        self.types.iter()
    }

    /// True when `sub` is `sup`, extends it, or implements it, transitively.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut pending = vec![sub];
        let mut seen: Vec<&str> = Vec::new();
        while let Some(name) = pending.pop() {
            if name == sup {
                return true;
            }
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Some(def) = self.class(name) {
                pending.extend(def.parent.as_deref());
                pending.extend(def.interfaces.iter().map(String::as_str));
            }
        }
        false
    }

    /// The constructor of `class`, inherited from the nearest ancestor declaring one.
    pub fn constructor(&self, class: &str) -> Option<&Constructor> {
        self.ancestry(class).find_map(|def| def.constructor.as_ref())
    }

    /// A method of `class`, inherited from the nearest ancestor declaring it.
    pub fn method(&self, class: &str, name: &str) -> Option<&MethodDef> {
        self.ancestry(class).find_map(|def| def.methods.get(name))
    }

    fn ancestry<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a ClassDef> + 'a {
        let mut next = self.class(class);
        let mut steps = 0;
        std::iter::from_fn(move || {
            let current = next?;
            steps += 1;
            // a malformed parent chain must not loop forever
            next = if steps > self.types.len() {
                None
            } else {
                current.parent.as_deref().and_then(|p| self.class(p))
            };
            Some(current)
        })
    }
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("types", &self.types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog
            .add_class(ClassDef::interface("Drawable"))
            .add_class(ClassDef::interface("Shape").implements("Drawable"))
            .add_class(ClassDef::abstract_class("Polygon").implements("Shape"))
            .add_class(ClassDef::concrete("Square").extends("Polygon").method(MethodDef::new(
                "sides",
                vec![],
                |_| Ok(Value::Int(4)),
            )))
            .add_class(ClassDef::concrete("Tile").extends("Square"));
        catalog
    }

    #[test]
    fn test_subtype_is_transitive() {
        let catalog = shapes();
        assert!(catalog.is_subtype("Tile", "Square"));
        assert!(catalog.is_subtype("Tile", "Polygon"));
        assert!(catalog.is_subtype("Tile", "Shape"));
        assert!(catalog.is_subtype("Tile", "Drawable"));
        assert!(catalog.is_subtype("Shape", "Shape"));
        assert!(!catalog.is_subtype("Shape", "Tile"));
        assert!(!catalog.is_subtype("Unknown", "Shape"));
    }

    #[test]
    fn test_methods_are_inherited() {
        let catalog = shapes();
        let method = catalog.method("Tile", "sides").expect("inherited method");
        assert_eq!(method.invoke(Args::default()).unwrap(), Value::Int(4));
        assert!(catalog.method("Tile", "area").is_none());
    }

    #[test]
    fn test_constructibility() {
        let catalog = shapes();
        assert!(catalog.is_constructible("Square"));
        assert!(!catalog.is_constructible("Polygon"));
        assert!(!catalog.is_constructible("Shape"));
        assert!(catalog.is_interface("Shape"));
    }

    #[test]
    fn test_redeclaring_replaces_in_place() {
        let mut catalog = shapes();
        catalog.add_class(ClassDef::abstract_class("Square"));
        assert!(!catalog.is_constructible("Square"));
        let names: Vec<&str> = catalog.known_types().map(ClassDef::name).collect();
        assert_eq!(names, vec!["Drawable", "Shape", "Polygon", "Square", "Tile"]);
    }

    #[test]
    fn test_cyclic_parents_terminate() {
        let mut catalog = TypeCatalog::new();
        catalog
            .add_class(ClassDef::concrete("A").extends("B"))
            .add_class(ClassDef::concrete("B").extends("A"));
        assert!(!catalog.is_subtype("A", "C"));
        assert!(catalog.method("A", "missing").is_none());
    }
}
