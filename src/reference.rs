//! Reference markers used inside argument lists.

#[cfg(feature = "config")]
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
#[cfg(feature = "config")]
use serde::Serialize;

/// A placeholder meaning "resolve this id, don't pass it literally".
///
/// References carry no resolution logic and perform no validation; an id that
/// does not exist only fails once the container tries to resolve it.
pub trait Reference {
    /// The identifier this reference was constructed with.
    fn id(&self) -> &str;
}

/// Resolves to the service registered under the id.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Reference, ServiceReference};
///
/// let logger = ServiceReference::new("logger");
/// assert_eq!(logger.id(), "logger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct ServiceReference {
    #[cfg_attr(feature = "config", serde(rename = "service"))]
    id: String,
}

impl ServiceReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Reference for ServiceReference {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Resolves to the parameter found at the dotted path.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ParameterReference, Reference};
///
/// let port = ParameterReference::new("db.port");
/// assert_eq!(port.id(), "db.port");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct ParameterReference {
    #[cfg_attr(feature = "config", serde(rename = "parameter"))]
    id: String,
}

impl ParameterReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Reference for ParameterReference {
    fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ServiceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.id)
    }
}

impl std::fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}%", self.id)
    }
}

/// Reads `{"<key>": "<id>"}` and nothing else; sequences and extra keys are
/// rejected.
#[cfg(feature = "config")]
struct IdVisitor(&'static str);

#[cfg(feature = "config")]
impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a map with a single `{}` key", self.0)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        let mut id = None;
        while let Some(key) = map.next_key::<String>()? {
            if key != self.0 {
                return Err(de::Error::custom(format_args!(
                    "unknown field `{}`, expected `{}`",
                    key, self.0
                )));
            }
            if id.is_some() {
                return Err(de::Error::duplicate_field(self.0));
            }
            id = Some(map.next_value::<String>()?);
        }
        id.ok_or_else(|| de::Error::missing_field(self.0))
    }
}

#[cfg(feature = "config")]
impl<'de> Deserialize<'de> for ServiceReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IdVisitor("service")).map(Self::new)
    }
}

#[cfg(feature = "config")]
impl<'de> Deserialize<'de> for ParameterReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IdVisitor("parameter")).map(Self::new)
    }
}
