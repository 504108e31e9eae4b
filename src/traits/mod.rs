//! Core traits of the locator.

mod resolver;
mod signature;

pub use resolver::Resolver;
pub use signature::Signature;
