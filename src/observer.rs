//! Hooks for observing service construction.
//!
//! The container already logs through `tracing`; observers are for callers
//! that want the events programmatically (metrics, test spies, audit trails).

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer of construction events.
///
/// Called synchronously on the resolving thread, only when a service is
/// actually built: cache hits are not reported. Keep implementations cheap.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, ResolutionObserver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Timings(Mutex<Vec<(String, Duration)>>);
///
/// impl ResolutionObserver for Timings {
///     fn resolving(&self, _id: &str) {}
///
///     fn resolved(&self, id: &str, duration: Duration) {
///         self.0.lock().unwrap().push((id.to_string(), duration));
///     }
/// }
///
/// let container = Container::builder()
///     .observer(Arc::new(Timings::default()))
///     .build();
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Construction of `id` is starting.
    fn resolving(&self, id: &str);

    /// `id` was built and all of its calls ran.
    fn resolved(&self, id: &str, duration: Duration);

    /// Construction of `id` failed with `error`. The same error then
    /// propagates to the caller.
    fn failed(&self, id: &str, error: &DiError) {
        let _ = (id, error);
    }
}

#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, id: &str) {
        for observer in &self.observers {
            observer.resolving(id);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, id: &str, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(id, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, id: &str, error: &DiError) {
        for observer in &self.observers {
            observer.failed(id, error);
        }
    }
}
