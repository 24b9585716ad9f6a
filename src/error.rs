//! Error types for the dependency injection container.

use thiserror::Error;

/// Structural problems found in a service definition while building it.
///
/// Every kind renders as the suffix of a [`DiError::Container`] message, which
/// always starts with the offending service id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerErrorKind {
    /// The definition carries no class to instantiate.
    MissingClass,
    /// The host construction facility does not know the class.
    UnknownClass(String),
    /// The service was requested again while it was still being built.
    CircularReference,
    /// A post-construction call carries no method name.
    MissingMethod,
    /// The host cannot invoke the named method on the instance.
    UncallableMethod(String),
}

impl std::fmt::Display for ContainerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerErrorKind::MissingClass => {
                write!(f, "service entry must be an array containing a 'class' key")
            }
            ContainerErrorKind::UnknownClass(class) => {
                write!(f, "service class does not exist: {}", class)
            }
            ContainerErrorKind::CircularReference => {
                write!(f, "service contains a circular reference")
            }
            ContainerErrorKind::MissingMethod => {
                write!(f, "service calls must be arrays containing a 'method' key")
            }
            ContainerErrorKind::UncallableMethod(method) => {
                write!(f, "service asks for call to uncallable method: {}", method)
            }
        }
    }
}

/// Dependency injection errors
///
/// Errors raised anywhere on the resolution path reach the caller unchanged:
/// a failure three references deep surfaces as that leaf failure, never as a
/// wrapped "could not build the root service" error.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, DiError};
///
/// let container = Container::builder().build();
/// match container.get("mailer") {
///     Err(DiError::ServiceNotFound(id)) => assert_eq!(id, "mailer"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_container::{ContainerErrorKind, DiError};
///
/// let circular = DiError::container("app", ContainerErrorKind::CircularReference);
/// assert_eq!(circular.to_string(), "app service contains a circular reference");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiError {
    /// No definition exists for the requested service id
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    /// A segment of the dotted parameter path is missing (carries the full path)
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),
    /// Structurally invalid definition, including circular references
    #[error("{id} {kind}")]
    Container {
        id: String,
        kind: ContainerErrorKind,
    },
    /// Host factory received the wrong number of positional arguments
    #[error("{target} expects {expected} argument(s), got {found}")]
    Arity {
        target: String,
        expected: usize,
        found: usize,
    },
    /// Host factory received an argument of the wrong shape
    #[error("{target} argument #{index} must be {expected}, got {found}")]
    ArgumentType {
        target: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// A resolved instance could not be downcast to the requested type
    #[error("Type mismatch for {id}: expected {expected}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
    },
    /// Free-form failure reported by the host construction facility
    #[error("Host error: {0}")]
    Host(String),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    /// Shorthand for a [`DiError::Container`] error.
    pub fn container(id: impl Into<String>, kind: ContainerErrorKind) -> Self {
        DiError::Container { id: id.into(), kind }
    }

    /// Shorthand for a [`DiError::Host`] error.
    pub fn host(message: impl Into<String>) -> Self {
        DiError::Host(message.into())
    }

    /// True for both the service and the parameter not-found errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::ServiceNotFound(_) | DiError::ParameterNotFound(_))
    }

    /// True when the error reports a dependency cycle.
    pub fn is_circular(&self) -> bool {
        matches!(
            self,
            DiError::Container { kind: ContainerErrorKind::CircularReference, .. }
        )
    }

    /// The service or parameter id the error is about, if it names one.
    pub fn service_id(&self) -> Option<&str> {
        match self {
            DiError::ServiceNotFound(id)
            | DiError::ParameterNotFound(id)
            | DiError::Container { id, .. }
            | DiError::TypeMismatch { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate and
/// by host factories registered with a [`TypeRegistry`](crate::TypeRegistry).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{DiError, DiResult};
///
/// fn lookup() -> DiResult<()> {
///     Err(DiError::ParameterNotFound("db.host".to_string()))
/// }
///
/// assert!(lookup().unwrap_err().is_not_found());
/// ```
pub type DiResult<T> = Result<T, DiError>;
