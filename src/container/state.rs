//! Construction state kept beside the (immutable) definitions.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{DiError, DiResult};
use crate::host::AnyArc;

/// Where a service is in its construction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Never requested, or reset after a failed attempt.
    Unresolved,
    /// Being built right now, or poisoned by a failed attempt.
    InProgress,
    /// Built and memoized.
    Resolved,
}

enum Slot {
    InProgress,
    Resolved(AnyArc),
}

/// Side table mapping service ids to their state and memoized instance.
///
/// An id is absent while unresolved. Entries only move forward
/// (`InProgress` then `Resolved`) unless a failed attempt is reset.
#[derive(Default)]
pub(crate) struct StateTable {
    slots: HashMap<String, Slot>,
}

impl StateTable {
    pub(crate) fn state(&self, id: &str) -> ServiceState {
        match self.slots.get(id) {
            None => ServiceState::Unresolved,
            Some(Slot::InProgress) => ServiceState::InProgress,
            Some(Slot::Resolved(_)) => ServiceState::Resolved,
        }
    }

    pub(crate) fn instance(&self, id: &str) -> Option<AnyArc> {
        match self.slots.get(id) {
            Some(Slot::Resolved(instance)) => Some(instance.clone()),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self, id: &str) {
        self.slots.insert(id.to_string(), Slot::InProgress);
    }

    pub(crate) fn complete(&mut self, id: &str, instance: AnyArc) {
        self.slots.insert(id.to_string(), Slot::Resolved(instance));
    }

    pub(crate) fn reset(&mut self, id: &str) {
        if let Some(Slot::InProgress) = self.slots.get(id) {
            self.slots.remove(id);
        }
    }

    pub(crate) fn resolved_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Resolved(_)))
            .count()
    }
}

/// Ids currently being built by the thread that holds the resolution lock,
/// outermost first.
pub(crate) type ResolutionStack = RefCell<Vec<String>>;

/// Frame on the resolution stack; popped on drop, including on error paths.
pub(crate) struct StackGuard<'a> {
    stack: &'a ResolutionStack,
}

impl<'a> StackGuard<'a> {
    pub(crate) fn enter(stack: &'a ResolutionStack, id: &str, max_depth: usize) -> DiResult<Self> {
        let mut frames = stack.borrow_mut();
        if frames.len() >= max_depth {
            return Err(DiError::DepthExceeded(frames.len()));
        }
        frames.push(id.to_string());
        Ok(Self { stack })
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

/// The chain that led back to `id`, for cycle diagnostics.
pub(crate) fn cycle_path(stack: &ResolutionStack, id: &str) -> String {
    let frames = stack.borrow();
    let start = frames.iter().position(|frame| frame == id).unwrap_or(0);
    let mut path: Vec<&str> = frames[start..].iter().map(String::as_str).collect();
    path.push(id);
    path.join(" -> ")
}
