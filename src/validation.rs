//! Pre-flight validation of a definition table.
//!
//! [`Container::get`](crate::Container::get) only discovers a broken
//! definition when something asks for it. Validation walks every definition
//! up front, without building anything, and reports every problem it finds
//! instead of stopping at the first.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::definition::ServiceDefinition;
use crate::host::Host;
use crate::parameters::Parameters;
use crate::reference::Reference;

/// A problem that would make `get` fail for the named service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The definition has no class
    MissingClass { service: String },
    /// The host does not know the class
    UnknownClass { service: String, class: String },
    /// An argument references a service with no definition
    MissingService { service: String, reference: String },
    /// An argument references a parameter path that does not resolve
    MissingParameter { service: String, parameter: String },
    /// A call has no method name
    MissingMethod { service: String },
    /// The host cannot invoke a called method
    UncallableMethod { service: String, method: String },
    /// Service references form a cycle; first and last entries are equal
    CircularDependency { cycle: Vec<String> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingClass { service } => {
                write!(f, "{}: no class", service)
            }
            ValidationError::UnknownClass { service, class } => {
                write!(f, "{}: unknown class {}", service, class)
            }
            ValidationError::MissingService { service, reference } => {
                write!(f, "{}: references missing service {}", service, reference)
            }
            ValidationError::MissingParameter { service, parameter } => {
                write!(f, "{}: references missing parameter {}", service, parameter)
            }
            ValidationError::MissingMethod { service } => {
                write!(f, "{}: call without a method", service)
            }
            ValidationError::UncallableMethod { service, method } => {
                write!(f, "{}: uncallable method {}", service, method)
            }
            ValidationError::CircularDependency { cycle } => {
                write!(f, "circular dependency: {}", cycle.join(" -> "))
            }
        }
    }
}

/// Outcome of [`Container::validate`](crate::Container::validate).
///
/// # Examples
///
/// ```
/// use ferrous_container::{Argument, Container, ServiceDefinition, TypeRegistry, ValidationError};
///
/// let mut types = TypeRegistry::new();
/// types.register("Node", |_| Ok(()));
///
/// let container = Container::builder()
///     .host(types)
///     .service("a", ServiceDefinition::new("Node").arg(Argument::service("b")))
///     .service("b", ServiceDefinition::new("Node").arg(Argument::service("a")))
///     .build();
///
/// let report = container.validate();
/// assert!(!report.is_valid());
/// assert_eq!(
///     report.errors,
///     vec![ValidationError::CircularDependency {
///         cycle: vec!["a".into(), "b".into(), "a".into()],
///     }]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Definition problems in declaration order, then cycles.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors concerning one service.
    pub fn errors_for<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |error| match error {
            ValidationError::MissingClass { service: s }
            | ValidationError::UnknownClass { service: s, .. }
            | ValidationError::MissingService { service: s, .. }
            | ValidationError::MissingParameter { service: s, .. }
            | ValidationError::MissingMethod { service: s }
            | ValidationError::UncallableMethod { service: s, .. } => s == service,
            ValidationError::CircularDependency { cycle } => cycle.iter().any(|s| s == service),
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "valid");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

pub(crate) fn validate(
    services: &IndexMap<String, ServiceDefinition>,
    parameters: &Parameters,
    host: &dyn Host,
) -> ValidationReport {
    let mut errors = Vec::new();

    for (id, definition) in services {
        let class = match definition.class.as_deref() {
            Some(class) if !class.is_empty() => {
                if host.type_exists(class) {
                    Some(class)
                } else {
                    errors.push(ValidationError::UnknownClass {
                        service: id.clone(),
                        class: class.to_string(),
                    });
                    None
                }
            }
            _ => {
                errors.push(ValidationError::MissingClass { service: id.clone() });
                None
            }
        };

        for reference in definition.service_references() {
            if !services.contains_key(reference.id()) {
                errors.push(ValidationError::MissingService {
                    service: id.clone(),
                    reference: reference.id().to_string(),
                });
            }
        }

        for reference in definition.parameter_references() {
            if !parameters.contains(reference.id()) {
                errors.push(ValidationError::MissingParameter {
                    service: id.clone(),
                    parameter: reference.id().to_string(),
                });
            }
        }

        for call in &definition.calls {
            match (call.method.as_deref(), class) {
                (Some(method), _) if method.is_empty() => {
                    errors.push(ValidationError::MissingMethod { service: id.clone() })
                }
                (None, _) => errors.push(ValidationError::MissingMethod { service: id.clone() }),
                (Some(method), Some(class)) if !host.is_callable(class, method) => {
                    errors.push(ValidationError::UncallableMethod {
                        service: id.clone(),
                        method: method.to_string(),
                    })
                }
                _ => {}
            }
        }
    }

    errors.extend(
        find_cycles(services)
            .into_iter()
            .map(|cycle| ValidationError::CircularDependency { cycle }),
    );

    ValidationReport { errors }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// A node on the explicit depth-first stack, with the references still to
/// follow.
struct Frame<'a> {
    id: &'a str,
    targets: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(id: &'a str, services: &'a IndexMap<String, ServiceDefinition>) -> Self {
        let targets = services
            .get(id)
            .map(|definition| {
                definition
                    .service_references()
                    .map(|reference| reference.id())
                    .filter(|target| services.contains_key(*target))
                    .collect()
            })
            .unwrap_or_default();
        Self { id, targets, next: 0 }
    }
}

/// Every back edge of a depth-first walk over service references, as a path
/// starting and ending at the same id.
///
/// The walk keeps its own stack, so chain length is bounded by memory rather
/// than by the thread's call stack.
fn find_cycles(services: &IndexMap<String, ServiceDefinition>) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut cycles = Vec::new();

    for root in services.keys() {
        if marks.contains_key(root.as_str()) {
            continue;
        }

        marks.insert(root.as_str(), Mark::Visiting);
        let mut stack = vec![Frame::new(root, services)];

        while let Some(frame) = stack.last_mut() {
            let Some(target) = frame.targets.get(frame.next).copied() else {
                marks.insert(frame.id, Mark::Done);
                stack.pop();
                continue;
            };
            frame.next += 1;

            match marks.get(target).copied() {
                None => {
                    marks.insert(target, Mark::Visiting);
                    stack.push(Frame::new(target, services));
                }
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|f| f.id == target).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].iter().map(|f| f.id.to_string()).collect();
                    cycle.push(target.to_string());
                    cycles.push(cycle);
                }
                Some(Mark::Done) => {}
            }
        }
    }
    cycles
}
