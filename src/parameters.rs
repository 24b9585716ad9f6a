//! The parameter tree and its dotted-path lookup.

use indexmap::IndexMap;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::value::Value;

/// Nested configuration values addressed by dot-separated paths.
///
/// Lookups walk one segment per nesting level; a path whose every segment
/// exists yields whatever sits at the end, scalar or subtree.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Parameters, Value};
///
/// let mut params = Parameters::new();
/// params.insert("db", Value::map([("host", Value::from("localhost"))]));
///
/// assert_eq!(params.get("db.host").unwrap(), &Value::from("localhost"));
/// assert!(params.get("db.port").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct Parameters {
    root: IndexMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a top-level entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.root.insert(key.into(), value.into());
        self
    }

    /// Resolves a dotted path.
    ///
    /// The id is split on `.` as-is, so an empty id is a single empty segment
    /// and fails like any other missing key. Errors always carry the full id,
    /// not the segment that was missing.
    ///
    /// A key that is present with a [`Value::Null`] counts as found and yields
    /// `Null`; only absent keys are errors.
    pub fn get(&self, id: &str) -> DiResult<&Value> {
        let mut tokens = id.split('.');
        let first = tokens.next().unwrap_or_default();
        let mut context = self
            .root
            .get(first)
            .ok_or_else(|| DiError::ParameterNotFound(id.to_string()))?;

        for token in tokens {
            context = context
                .get(token)
                .ok_or_else(|| DiError::ParameterNotFound(id.to_string()))?;
        }

        Ok(context)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.root
    }
}

impl From<IndexMap<String, Value>> for Parameters {
    fn from(root: IndexMap<String, Value>) -> Self {
        Self { root }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            root: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
