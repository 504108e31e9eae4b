//! Resolution options: `with` and `defaults` override maps.

use ahash::AHashMap;

use crate::marker::Injectable;

/// Key of an override: a parameter position or a parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Position(usize),
    Name(String),
}

/// Parameter overrides, keyed by position or by name.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Overrides, Injectable, Value};
///
/// let overrides = Overrides::new()
///     .at(0, "explicit")
///     .named("timeout", Value::Int(30));
///
/// assert!(overrides.lookup(0, "anything").is_some());
/// assert!(overrides.lookup(3, "timeout").is_some());
/// assert!(overrides.lookup(3, "retries").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: AHashMap<ParamKey, Injectable>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override by parameter position.
    pub fn at(mut self, position: usize, value: impl Into<Injectable>) -> Self {
        self.entries.insert(ParamKey::Position(position), value.into());
        self
    }

    /// Override by parameter name.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Injectable>) -> Self {
        self.entries.insert(ParamKey::Name(name.into()), value.into());
        self
    }

    /// The override for a parameter: position key first, then name key.
    pub fn lookup(&self, position: usize, name: &str) -> Option<&Injectable> {
        self.entries
            .get(&ParamKey::Position(position))
            .or_else(|| self.entries.get(&ParamKey::Name(name.to_string())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options passed to a resolution or a call.
///
/// Both maps are optional at the top level: `None` means "not specified here",
/// while `Some(Overrides::new())` means "explicitly empty", which is how a caller
/// clears overrides stored with a binding.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Injected ahead of every other source
    pub with: Option<Overrides>,
    /// Used only when type and name lookups found nothing
    pub defaults: Option<Overrides>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, overrides: Overrides) -> Self {
        self.with = Some(overrides);
        self
    }

    pub fn defaults(mut self, overrides: Overrides) -> Self {
        self.defaults = Some(overrides);
        self
    }

    /// Top-level merge: every key present in `over` replaces the key in `self`.
    ///
    /// No deep merge happens inside the override maps.
    pub fn merged_with(&self, over: &Options) -> Options {
        Options {
            with: over.with.clone().or_else(|| self.with.clone()),
            defaults: over.defaults.clone().or_else(|| self.defaults.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.with.is_none() && self.defaults.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn value_of(injectable: Option<&Injectable>) -> Option<Value> {
        match injectable {
            Some(Injectable::Value(v)) => Some(v.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_position_wins_over_name() {
        let overrides = Overrides::new().named("bob", "by-name").at(1, "by-position");
        assert_eq!(value_of(overrides.lookup(1, "bob")), Some(Value::from("by-position")));
        assert_eq!(value_of(overrides.lookup(0, "bob")), Some(Value::from("by-name")));
    }

    #[test]
    fn test_merge_replaces_whole_keys() {
        let bound = Options::new()
            .with(Overrides::new().named("a", "bound-a").named("b", "bound-b"))
            .defaults(Overrides::new().named("c", "bound-c"));
        let call_site = Options::new().with(Overrides::new().named("a", "site-a"));

        let merged = bound.merged_with(&call_site);
        let with = merged.with.as_ref().unwrap();
        assert_eq!(value_of(with.lookup(9, "a")), Some(Value::from("site-a")));
        // no deep merge: the bound "b" is gone
        assert!(with.lookup(9, "b").is_none());
        // untouched key survives
        assert!(merged.defaults.as_ref().unwrap().lookup(9, "c").is_some());
    }

    #[test]
    fn test_explicit_empty_clears_bound_overrides() {
        let bound = Options::new().defaults(Overrides::new().named("x", 1i64));
        let merged = bound.merged_with(&Options::new().defaults(Overrides::new()));
        assert!(merged.defaults.unwrap().is_empty());
    }
}
