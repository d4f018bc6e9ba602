//! Resolve-once forward references
//!
//! A [`Reference`] is a single-slot holder for a value that may not exist yet.
//! It starts Unresolved, transitions to Resolved at most once, and every clone
//! shares the same slot. This is what lets a caller capture a handle to a
//! sibling's output before that sibling has been built: the slot fills in when
//! the owning build completes, and every captured clone sees the value.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use thiserror::Error;

/// Error returned when a reference is read before it has been resolved.
///
/// This is a sequencing error at the call site, not a validation fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reference has not been resolved")]
pub struct NotResolved;

/// A shared, resolve-once slot for a value of type `T`.
///
/// Cloning is cheap and shares the underlying slot; resolving through any
/// clone resolves them all. The first `resolve` wins, later calls are ignored.
pub struct Reference<T> {
    slot: Rc<OnceCell<T>>,
}

impl<T> Reference<T> {
    /// Create an unresolved reference.
    pub fn unresolved() -> Self {
        Self {
            slot: Rc::new(OnceCell::new()),
        }
    }

    /// Create a reference that is already resolved to `value`.
    pub fn immediate(value: T) -> Self {
        let slot = OnceCell::new();
        let _ = slot.set(value);
        Self {
            slot: Rc::new(slot),
        }
    }

    /// Resolve the slot to `value` if it is still unresolved.
    ///
    /// First-write-wins: once resolved, further calls are silent no-ops.
    pub fn resolve(&self, value: T) {
        let _ = self.slot.set(value);
    }

    /// Whether the slot holds a value.
    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The resolved value, or [`NotResolved`] if the slot is still empty.
    pub fn get(&self) -> Result<&T, NotResolved> {
        self.slot.get().ok_or(NotResolved)
    }

    /// The resolved value, or `None` without failing.
    pub fn try_get(&self) -> Option<&T> {
        self.slot.get()
    }
}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for Reference<T> {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl<T: fmt::Debug> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => f.debug_tuple("Reference").field(value).finish(),
            None => f.write_str("Reference(<unresolved>)"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
