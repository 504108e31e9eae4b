//! Per-parameter resolution.
//!
//! Each declared parameter is filled from the first source that yields an
//! acceptable value:
//!
//! 1. `with` overrides (position key, then name key);
//! 2. the locator, asked for the parameter's declared class;
//! 3. the locator, then the data store, asked for the parameter's name, when the
//!    name convention accepts it;
//! 4. `defaults` overrides;
//! 5. the parameter's declared default;
//! 6. otherwise fail, preferring an error retained from step 2 (anything but a
//!    "not found" for the declared class itself).
//!
//! Values from steps 1 to 4 must satisfy the parameter's type hint; a value that
//! does not is skipped and the next source is tried.

use tracing::trace;

use super::Injector;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionContext;
use crate::options::{Options, Overrides};
use crate::param::Param;
use crate::traits::Signature;
use crate::value::Value;

impl Injector<'_> {
    pub(super) fn resolve_parameters(
        &self,
        ctx: &mut ResolutionContext,
        signature: &dyn Signature,
        options: &Options,
    ) -> DiResult<Vec<Value>> {
        signature
            .parameters()
            .iter()
            .enumerate()
            .map(|(position, param)| self.resolve_parameter(ctx, position, param, options))
            .collect()
    }

    fn resolve_parameter(
        &self,
        ctx: &mut ResolutionContext,
        position: usize,
        param: &Param,
        options: &Options,
    ) -> DiResult<Value> {
        let name = param.name();

        if let Some(value) = self.from_overrides(ctx, options.with.as_ref(), position, param)? {
            trace!(param = name, "from with");
            return Ok(value);
        }

        let mut retained = None;
        if let Some(class) = param.hint().injectable_type() {
            match self.locator.get_in(ctx, class, &Options::default()) {
                Ok(value) if self.accepts(param, &value) => {
                    trace!(param = name, class, "by type");
                    return Ok(value);
                }
                Ok(_) => trace!(param = name, class, "type lookup produced a mismatched value"),
                // only a miss for the class itself; a deeper miss is a real failure
                Err(DiError::NotFound(missing)) if missing == class => {}
                Err(err) => {
                    trace!(param = name, class, error = %err, "type lookup failed, retained");
                    retained = Some(err);
                }
            }
        }

        if self.locator.config().name_convention.accepts(name) {
            if let Some(value) = self.by_name(ctx, param)? {
                return Ok(value);
            }
        }

        if let Some(value) = self.from_overrides(ctx, options.defaults.as_ref(), position, param)? {
            trace!(param = name, "from defaults");
            return Ok(value);
        }

        if let Some(default) = param.default() {
            return Ok(default.clone());
        }

        Err(retained.unwrap_or_else(|| DiError::MissingParameter(name.to_string())))
    }

    /// Interprets the override for `param`, if any, and type checks it.
    fn from_overrides(
        &self,
        ctx: &mut ResolutionContext,
        overrides: Option<&Overrides>,
        position: usize,
        param: &Param,
    ) -> DiResult<Option<Value>> {
        let Some(injectable) = overrides.and_then(|o| o.lookup(position, param.name())) else {
            return Ok(None);
        };
        let value = self.interpret(ctx, injectable)?;
        if self.accepts(param, &value) {
            Ok(Some(value))
        } else {
            trace!(param = param.name(), "override rejected by type hint");
            Ok(None)
        }
    }

    /// Name lookup: the locator first, then the data store.
    ///
    /// Only "not found" for this exact name counts as a miss; any other failure,
    /// including a deeper lookup that failed, propagates.
    fn by_name(&self, ctx: &mut ResolutionContext, param: &Param) -> DiResult<Option<Value>> {
        let name = param.name();

        match self.locator.get_in(ctx, name, &Options::default()) {
            Ok(value) if self.accepts(param, &value) => {
                trace!(param = name, "by name from locator");
                return Ok(Some(value));
            }
            Ok(_) => {}
            Err(err) if err.is_not_found_for(name) => {}
            Err(err) => return Err(err),
        }

        match self.locator.data().get_in(ctx, name) {
            Ok(value) if self.accepts(param, &value) => {
                trace!(param = name, "by name from data store");
                Ok(Some(value))
            }
            Ok(_) => Ok(None),
            Err(err) if err.is_not_found_for(name) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn accepts(&self, param: &Param, value: &Value) -> bool {
        param.hint().accepts(value, self.locator.catalog())
    }
}
