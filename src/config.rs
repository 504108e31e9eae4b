//! Locator configuration.
//!
//! Configuration can be built in code, read from environment variables with a
//! prefix, or (with the `config` feature) deserialized from JSON.

use std::env;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default limit of the in-flight stack.
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 15;

/// Predicate deciding which parameter names are looked up as service ids.
///
/// The default accepts names starting with an uppercase ASCII letter, so a
/// parameter called `Mailer` is resolved from the locator by name while `mailer`
/// is not.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::NameConvention;
///
/// let default = NameConvention::default();
/// assert!(default.accepts("Mailer"));
/// assert!(!default.accepts("mailer"));
///
/// let prefixed = NameConvention::custom(|name| name.starts_with("svc_"));
/// assert!(prefixed.accepts("svc_mailer"));
/// ```
#[derive(Clone)]
pub struct NameConvention(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl NameConvention {
    pub fn uppercase_first() -> Self {
        Self::custom(|name| name.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
    }

    /// Disables name-based lookup entirely.
    pub fn never() -> Self {
        Self::custom(|_| false)
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        NameConvention(Arc::new(predicate))
    }

    pub fn accepts(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl Default for NameConvention {
    fn default() -> Self {
        Self::uppercase_first()
    }
}

impl fmt::Debug for NameConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameConvention(..)")
    }
}

/// Configuration of a [`ServiceLocator`](crate::ServiceLocator).
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::LocatorConfig;
///
/// let config = LocatorConfig::default()
///     .scan_all_known_types(true)
///     .max_resolution_depth(32);
/// assert!(config.scan_all_known_types);
/// assert_eq!(config.max_resolution_depth, 32);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LocatorConfig {
    /// Let auto-discovery walk every catalog type after scanning bindings
    pub scan_all_known_types: bool,
    /// Maximum number of ids in flight during one top-level resolution.
    ///
    /// Data store entries realised along the way count too: each lazy or factory
    /// datum occupies one `datum:<id>` frame, so avoid service ids of that form.
    pub max_resolution_depth: usize,
    #[cfg_attr(feature = "config", serde(skip))]
    pub name_convention: NameConvention,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            scan_all_known_types: false,
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            name_convention: NameConvention::default(),
        }
    }
}

impl LocatorConfig {
    pub fn scan_all_known_types(mut self, enabled: bool) -> Self {
        self.scan_all_known_types = enabled;
        self
    }

    pub fn max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    pub fn name_convention(mut self, convention: NameConvention) -> Self {
        self.name_convention = convention;
        self
    }

    /// Reads `<PREFIX>_SCAN_ALL_KNOWN_TYPES` and `<PREFIX>_MAX_RESOLUTION_DEPTH`.
    ///
    /// Missing or unparsable variables keep their defaults.
    pub fn from_env(prefix: &str) -> Self {
        let prefix = prefix.to_uppercase();
        let mut config = Self::default();

        if let Some(enabled) = read_env(&prefix, "SCAN_ALL_KNOWN_TYPES").and_then(|v| parse_flag(&v)) {
            config.scan_all_known_types = enabled;
        }
        if let Some(depth) = read_env(&prefix, "MAX_RESOLUTION_DEPTH").and_then(|v| v.parse().ok()) {
            config.max_resolution_depth = depth;
        }
        config
    }

    /// Parses a JSON document; absent fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn read_env(prefix: &str, key: &str) -> Option<String> {
    let env_key = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", prefix, key)
    };
    env::var(env_key).ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
