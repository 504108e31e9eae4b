//! Declared-parameter introspection.

use crate::param::Param;

/// Anything with declared parameters the injector can resolve: catalog functions,
/// closures, methods and constructors.
pub trait Signature {
    /// Declared parameters, in positional order.
    fn parameters(&self) -> &[Param];

    /// Human readable name for diagnostics.
    fn describe(&self) -> String;
}
