//! Error types for the locator, the data store and the injector.

use thiserror::Error;

/// Errors raised while resolving services, data or call targets.
///
/// The variants fall into a small taxonomy that the injector relies on when
/// deciding whether a failed lookup is a miss or a real failure:
///
/// - [`DiError::NotFound`] and [`DiError::DatumNotFound`] carry the failing id so
///   callers can tell "this exact id is absent" apart from "something deeper broke".
/// - [`DiError::Container`] groups failures of the locator itself (cycles, depth,
///   unresolvable bindings).
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{DiError, ContainerError};
///
/// let not_found = DiError::NotFound("Mailer".to_string());
/// assert!(not_found.is_not_found_for("Mailer"));
/// assert!(!not_found.is_not_found_for("Logger"));
///
/// let circular = DiError::Container(ContainerError::Circular(vec![
///     "A".to_string(),
///     "B".to_string(),
///     "A".to_string(),
/// ]));
/// assert!(circular.is_container_error());
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiError {
    /// No binding exists for the id and auto-discovery found nothing
    #[error("Service not found: {0}")]
    NotFound(String),
    /// The data store holds nothing under the id
    #[error("Datum not found: {0}")]
    DatumNotFound(String),
    /// Failure of the locator itself
    #[error(transparent)]
    Container(#[from] ContainerError),
    /// Every fallback for a required parameter was exhausted
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    /// The member exists but is not publicly invocable
    #[error("Member {member} of {target} is not public")]
    Visibility {
        /// Type (or instance class) owning the member
        target: String,
        /// Member name
        member: String,
    },
    /// The call target does not match any invocable shape
    #[error("Uncallable: {0}")]
    Uncallable(String),
    /// Raised by a user supplied body (constructor, function or method)
    #[error("Invocation failed: {0}")]
    Invocation(String),
}

/// Failures of the service locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// The in-flight stack reached the configured maximum depth
    #[error("Max depth {limit} exceeded: {}", .path.join(" -> "))]
    DepthExceeded {
        /// Configured `max_resolution_depth`
        limit: usize,
        /// Ids in flight when the limit was hit
        path: Vec<String>,
    },
    /// A string binding that names neither another binding nor a constructible type
    #[error("Could not make service {id} from string \"{target}\"")]
    Unresolvable {
        /// The id being resolved
        id: String,
        /// The bound string
        target: String,
    },
    /// A datum marker bound as a service points at an absent datum
    #[error("Service {service} refers to missing datum {datum}")]
    MissingDatum {
        /// The id being resolved
        service: String,
        /// The absent datum id
        datum: String,
    },
}

impl DiError {
    /// True when this is a [`DiError::NotFound`] or [`DiError::DatumNotFound`] for exactly `id`.
    pub fn is_not_found_for(&self, id: &str) -> bool {
        match self {
            DiError::NotFound(missing) | DiError::DatumNotFound(missing) => missing == id,
            _ => false,
        }
    }

    /// True for the "service not found" kind, whatever id it names.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_))
    }

    /// True for failures of the locator itself.
    pub fn is_container_error(&self) -> bool {
        matches!(self, DiError::Container(_))
    }

    /// Convenience constructor for body failures.
    pub fn invocation(message: impl Into<String>) -> Self {
        DiError::Invocation(message.into())
    }
}

/// Result type for locator and injector operations
pub type DiResult<T> = Result<T, DiError>;
