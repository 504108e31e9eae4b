//! Auto-discovery of unbound type names.
//!
//! When `get` is asked for an id without a binding and the id names a catalog type,
//! the locator looks for something that can stand in for it:
//!
//! 1. the first binding, in bind order, whose declared type satisfies the request;
//! 2. the type itself, when it is concrete;
//! 3. with `scan_all_known_types`, the first constructible catalog type that does.
//!
//! A hit is recorded as a real binding (`requested -> match`), so later lookups skip
//! the search and `has` reports it.

use tracing::debug;

use super::ServiceLocator;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionContext;
use crate::options::Options;
use crate::value::Value;

impl ServiceLocator {
    pub(super) fn discover(&self, ctx: &mut ResolutionContext, id: &str, options: &Options) -> DiResult<Value> {
        let catalog = self.catalog();
        let Some(def) = catalog.class(id) else {
            return Err(DiError::NotFound(id.to_string()));
        };

        let bound = self.inner.bindings.read().find_implementation(id, catalog);
        if let Some(found) = bound {
            debug!(id, binding = %found, "auto-discovered bound implementation");
            self.bind(id, found);
            return self.resolve_in(ctx, id, options);
        }

        if def.is_constructible() {
            debug!(id, "binding concrete type to itself");
            self.bind_self(id);
            return self.resolve_in(ctx, id, options);
        }

        if self.config().scan_all_known_types {
            let scanned = catalog
                .known_types()
                .find(|t| t.is_constructible() && t.name() != id && catalog.is_subtype(t.name(), id))
                .map(|t| t.name().to_string());
            if let Some(found) = scanned {
                debug!(id, class = %found, "auto-discovered catalog implementation");
                self.bind(id, found);
                return self.resolve_in(ctx, id, options);
            }
        }

        Err(DiError::NotFound(id.to_string()))
    }
}
