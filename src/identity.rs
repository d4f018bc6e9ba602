//! Node identity and the per-traversal visited tracker
//!
//! Every builder handle carries a [`NodeId`], an opaque token that stands in
//! for object identity. A [`Visited`] tracker maps those ids to what a single
//! traversal has already done with them, which is what makes cyclic graphs
//! terminate: a node reached a second time is answered from the tracker
//! instead of being entered again.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::reference::Reference;

/// Opaque, stable identity of one builder instance.
///
/// Assigned when a builder is wrapped in a handle and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What one traversal knows about a node.
enum Entry {
    /// Marked by a validate traversal; nothing more to record.
    Seen,
    /// A build is in progress higher on the call stack. The boxed value is
    /// the `Reference<T>` placeholder handed to descendants that cycle back.
    Building(Box<dyn Any>),
    /// The build finished; the boxed value is the finished `T`.
    Done(Box<dyn Any>),
}

/// Traversal-scoped record of processed nodes.
///
/// One instance serves exactly one Validate or one Build traversal. Entry
/// points allocate a fresh tracker per call; trackers are never shared across
/// traversals.
#[derive(Default)]
pub struct Visited {
    entries: HashMap<NodeId, Entry>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been processed by this traversal.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Record `id` as processed. Returns whether it was already present.
    pub fn mark(&mut self, id: NodeId) -> bool {
        if self.entries.contains_key(&id) {
            return true;
        }
        self.entries.insert(id, Entry::Seen);
        false
    }

    /// Install the in-progress placeholder for `id` before its build recurses.
    pub(crate) fn begin<T: 'static>(&mut self, id: NodeId) {
        self.entries
            .insert(id, Entry::Building(Box::new(Reference::<T>::unresolved())));
    }

    /// The placeholder for an in-progress node, if `id` is one.
    pub(crate) fn pending<T: 'static>(&self, id: NodeId) -> Option<Reference<T>> {
        match self.entries.get(&id) {
            Some(Entry::Building(slot)) => slot.downcast_ref::<Reference<T>>().cloned(),
            _ => None,
        }
    }

    /// The finished value for `id`, if its build already completed.
    pub(crate) fn done<T: Clone + 'static>(&self, id: NodeId) -> Option<T> {
        match self.entries.get(&id) {
            Some(Entry::Done(value)) => value.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Promote `id` from in-progress to finished, resolving the placeholder
    /// so every deferred reference handed out during the build fills in.
    pub(crate) fn complete<T: Clone + 'static>(&mut self, id: NodeId, value: T) {
        if let Some(Entry::Building(slot)) = self.entries.get(&id) {
            if let Some(placeholder) = slot.downcast_ref::<Reference<T>>() {
                placeholder.resolve(value.clone());
            }
        }
        self.entries.insert(id, Entry::Done(Box::new(value)));
    }
}

// =============================================================================
// TESTS
// =============================================================================
