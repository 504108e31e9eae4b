//! The parameter resolver.
//!
//! Given a call target, the injector works out which parameters it declares,
//! resolves each one (see [`params`]) and invokes it. Constructing a class is the
//! same operation with the class's constructor as the target.

use tracing::trace;

use crate::catalog::{Args, Callable, MethodDef, INVOKE};
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionContext;
use crate::locator::ServiceLocator;
use crate::marker::{Injectable, Receiver, Target};
use crate::options::{Options, Overrides};
use crate::traits::Signature;
use crate::value::{ObjectRef, Value};

mod params;

/// What a [`Target`] turned out to be, decided once before any parameter is resolved.
enum Plan {
    Construct(String),
    Function(Callable),
    Method {
        receiver: Option<ObjectRef>,
        method: MethodDef,
    },
}

/// Handle to a locator's parameter resolver.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Callable, Options, Overrides, Param, ServiceLocator, TypeCatalog, Value};
///
/// let locator = ServiceLocator::new(TypeCatalog::new());
/// let add = Callable::new(
///     vec![Param::new("a"), Param::new("b").default_value(10)],
///     |args| Ok(Value::Int(args.get(0).as_int().unwrap_or(0) + args.get(1).as_int().unwrap_or(0))),
/// );
///
/// let injector = locator.injector();
/// let with = Overrides::new().named("a", Value::Int(1));
/// assert_eq!(injector.call_with(add.clone(), with, Options::default()).unwrap(), Value::Int(11));
///
/// // nothing supplies `a`
/// assert!(injector.call(add, Options::default()).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct Injector<'a> {
    locator: &'a ServiceLocator,
}

impl<'a> Injector<'a> {
    pub(crate) fn new(locator: &'a ServiceLocator) -> Self {
        Self { locator }
    }

    /// Invokes `target`, resolving every declared parameter.
    pub fn call(&self, target: impl Into<Target>, options: Options) -> DiResult<Value> {
        let mut ctx = self.locator.context();
        self.call_in(&mut ctx, &target.into(), &options)
    }

    /// Like [`call`](Self::call), with `overrides` replacing `options.with`.
    pub fn call_with(&self, target: impl Into<Target>, overrides: Overrides, options: Options) -> DiResult<Value> {
        self.call(target, options.with(overrides))
    }

    /// Invokes an arbitrary value, rejecting shapes that are not call targets.
    pub fn call_value(&self, target: Value, options: Options) -> DiResult<Value> {
        self.call(Target::from_value(target)?, options)
    }

    pub(crate) fn call_in(&self, ctx: &mut ResolutionContext, target: &Target, options: &Options) -> DiResult<Value> {
        let plan = self.plan(ctx, target)?;
        self.execute(ctx, plan, options)
    }

    /// Produces the value a marker stands for.
    pub(crate) fn interpret(&self, ctx: &mut ResolutionContext, injectable: &Injectable) -> DiResult<Value> {
        match injectable {
            Injectable::Value(value) => Ok(value.clone()),
            Injectable::Service(service) => self.locator.get_in(ctx, &service.id, &service.options),
            Injectable::Datum(datum) => self.locator.data().get_datum_in(ctx, datum),
            Injectable::Call(target) | Injectable::Factory(target) => {
                self.call_in(ctx, target, &Options::default())
            }
        }
    }

    fn plan(&self, ctx: &mut ResolutionContext, target: &Target) -> DiResult<Plan> {
        let catalog = self.locator.catalog();
        match target {
            Target::Named(name) => {
                if catalog.is_constructible(name) {
                    return Ok(Plan::Construct(name.clone()));
                }
                if let Some(function) = catalog.function(name) {
                    return Ok(Plan::Function(function.clone()));
                }
                match split_member(name) {
                    Some((ty, member)) => self.plan_member(ctx, &Receiver::Type(ty.to_string()), member),
                    None => Err(DiError::Uncallable(name.clone())),
                }
            }
            Target::Function(callable) => Ok(Plan::Function(callable.clone())),
            Target::Instance(obj) => {
                let method = self.public_method(obj.class(), INVOKE)?;
                Ok(Plan::Method {
                    receiver: Some(obj.clone()),
                    method,
                })
            }
            Target::Member(receiver, member) => self.plan_member(ctx, receiver, member),
        }
    }

    fn plan_member(&self, ctx: &mut ResolutionContext, receiver: &Receiver, member: &str) -> DiResult<Plan> {
        match receiver {
            Receiver::Instance(obj) => {
                let method = self.public_method(obj.class(), member)?;
                let receiver = (!method.is_static()).then(|| obj.clone());
                Ok(Plan::Method { receiver, method })
            }
            Receiver::Type(ty) => {
                let declared_static = self
                    .locator
                    .catalog()
                    .method(ty, member)
                    .is_some_and(|m| m.is_static());
                if declared_static {
                    return Ok(Plan::Method {
                        receiver: None,
                        method: self.public_method(ty, member)?,
                    });
                }

                // Instance member named through its type: the member is looked up on
                // whatever instance the locator hands out for it
                let instance = match self.locator.get_in(ctx, ty, &Options::default()) {
                    Ok(instance) => instance,
                    Err(DiError::NotFound(missing)) if missing == *ty => {
                        return Err(DiError::Uncallable(format!("{}::{}", ty, member)));
                    }
                    Err(err) => return Err(err),
                };
                match instance {
                    Value::Object(obj) => self.plan_member(ctx, &Receiver::Instance(obj), member),
                    other => Err(DiError::Uncallable(format!(
                        "{}::{} (resolved to {:?}, not an instance)",
                        ty, member, other
                    ))),
                }
            }
        }
    }

    fn public_method(&self, class: &str, member: &str) -> DiResult<MethodDef> {
        let method = self
            .locator
            .catalog()
            .method(class, member)
            .ok_or_else(|| DiError::Uncallable(format!("{}::{}", class, member)))?;
        if !method.is_public() {
            return Err(DiError::Visibility {
                target: class.to_string(),
                member: member.to_string(),
            });
        }
        Ok(method.clone())
    }

    fn execute(&self, ctx: &mut ResolutionContext, plan: Plan, options: &Options) -> DiResult<Value> {
        match plan {
            Plan::Construct(class) => self.construct(ctx, &class, options),
            Plan::Function(callable) => {
                trace!(function = %callable.def().describe(), "invoking function");
                let args = self.resolve_parameters(ctx, callable.def(), options)?;
                callable.def().invoke(Args::new(args))
            }
            Plan::Method { receiver, method } => {
                trace!(method = %method.describe(), "invoking method");
                let args = Args::new(self.resolve_parameters(ctx, &method, options)?);
                match receiver {
                    Some(obj) => method.invoke(args.with_receiver(obj)),
                    None => method.invoke(args),
                }
            }
        }
    }

    fn construct(&self, ctx: &mut ResolutionContext, class: &str, options: &Options) -> DiResult<Value> {
        trace!(class, "constructing");
        let instance = ObjectRef::new(class);
        if let Some(constructor) = self.locator.catalog().constructor(class) {
            let args = self.resolve_parameters(ctx, constructor, options)?;
            constructor.init(&instance, Args::new(args))?;
        }
        Ok(Value::Object(instance))
    }
}

/// Splits `"Type::member"`; anything with more or fewer parts is not a member reference.
fn split_member(name: &str) -> Option<(&str, &str)> {
    let (ty, member) = name.split_once("::")?;
    if ty.is_empty() || member.is_empty() || member.contains("::") {
        return None;
    }
    Some((ty, member))
}

impl std::fmt::Debug for Injector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::split_member;

    #[test]
    fn test_split_member() {
        assert_eq!(split_member("Mailer::send"), Some(("Mailer", "send")));
        assert_eq!(split_member("Mailer"), None);
        assert_eq!(split_member("a::b::c"), None);
        assert_eq!(split_member("::send"), None);
    }
}
