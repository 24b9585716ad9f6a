//! Container configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Deepest dependency chain resolved before giving up with
/// [`DiError::DepthExceeded`](crate::DiError::DepthExceeded).
///
/// Each nesting level costs a handful of stack frames, so the default stays
/// well inside a 2 MiB thread stack even in unoptimized builds. Raise it only
/// for threads with larger stacks.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What happens to a service whose construction failed partway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum FailurePolicy {
    /// The service keeps its in-progress marker. Every later `get` of it
    /// reports a circular reference instead of retrying.
    #[default]
    Poison,
    /// The service goes back to unresolved, and a later `get` runs the
    /// construction again, surfacing the real failure.
    Reset,
}

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ContainerConfig, FailurePolicy};
///
/// let config = ContainerConfig::default()
///     .with_max_depth(64)
///     .with_failure_policy(FailurePolicy::Reset);
///
/// assert_eq!(config.max_depth, 64);
/// assert_eq!(config.failure_policy, FailurePolicy::Reset);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    pub max_depth: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ContainerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
