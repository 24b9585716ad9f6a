//! Service definitions: what to build, with which arguments, and which
//! methods to call afterwards.

#[cfg(feature = "config")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::reference::{ParameterReference, ServiceReference};
use crate::value::Value;

/// One entry of an argument list.
///
/// A closed sum: the container matches it exhaustively, resolving the two
/// reference variants and passing literals through untouched.
///
/// With the `config` feature, `{"service": "<id>"}` and `{"parameter": "<id>"}`
/// deserialize as references and anything else, arrays included, as a
/// literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum Argument {
    Service(ServiceReference),
    Parameter(ParameterReference),
    Literal(Value),
}

impl Argument {
    pub fn service(id: impl Into<String>) -> Self {
        Argument::Service(ServiceReference::new(id))
    }

    pub fn parameter(id: impl Into<String>) -> Self {
        Argument::Parameter(ParameterReference::new(id))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Argument::Literal(value.into())
    }
}

#[cfg(feature = "config")]
impl<'de> Deserialize<'de> for Argument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Value::Map(map) = &value {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get("service") {
                    return Ok(Argument::service(id.as_str()));
                }
                if let Some(Value::String(id)) = map.get("parameter") {
                    return Ok(Argument::parameter(id.as_str()));
                }
            }
        }
        Ok(Argument::Literal(value))
    }
}

impl From<ServiceReference> for Argument {
    fn from(reference: ServiceReference) -> Self {
        Argument::Service(reference)
    }
}

impl From<ParameterReference> for Argument {
    fn from(reference: ParameterReference) -> Self {
        Argument::Parameter(reference)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Literal(value)
    }
}

/// A post-construction method invocation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CallDefinition {
    /// Required; a call without a method fails when the service is built.
    pub method: Option<String>,
    pub arguments: Vec<Argument>,
}

impl CallDefinition {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            arguments: Vec::new(),
        }
    }

    pub fn arg(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }
}

/// Declarative description of one service.
///
/// Definitions are read-only once handed to the container; construction state
/// is tracked separately so a definition is never mutated while it is built.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, CallDefinition, ServiceDefinition};
///
/// let app = ServiceDefinition::new("App")
///     .arg(Argument::service("logger"))
///     .arg(Argument::parameter("env.name"))
///     .call(CallDefinition::new("boot").arg(Argument::literal(true)));
///
/// assert_eq!(app.class.as_deref(), Some("App"));
/// assert_eq!(app.arguments.len(), 2);
/// assert_eq!(app.calls.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ServiceDefinition {
    /// Type name handed to the host construction facility.
    pub class: Option<String>,
    /// Positional constructor arguments.
    pub arguments: Vec<Argument>,
    /// Methods invoked in order once the instance exists.
    pub calls: Vec<CallDefinition>,
}

impl ServiceDefinition {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn arg(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn args<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn call(mut self, call: CallDefinition) -> Self {
        self.calls.push(call);
        self
    }

    /// Ids of every service referenced by constructor or call arguments, in
    /// declaration order (duplicates kept).
    pub fn service_references(&self) -> impl Iterator<Item = &ServiceReference> {
        self.all_arguments().filter_map(|arg| match arg {
            Argument::Service(reference) => Some(reference),
            _ => None,
        })
    }

    /// Every parameter reference in constructor or call arguments.
    pub fn parameter_references(&self) -> impl Iterator<Item = &ParameterReference> {
        self.all_arguments().filter_map(|arg| match arg {
            Argument::Parameter(reference) => Some(reference),
            _ => None,
        })
    }

    fn all_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments
            .iter()
            .chain(self.calls.iter().flat_map(|call| call.arguments.iter()))
    }
}
