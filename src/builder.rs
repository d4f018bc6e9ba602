//! The builder contract and its traversal state machine
//!
//! A concrete builder implements the three [`Builder`] hooks; everything else
//! (identity, cycle handling, fault accumulation, the validate-then-build
//! protocol) lives on [`BuilderHandle`] and is shared by every builder.
//!
//! # Traversal contract
//!
//! `validate` and `build_with` are keyed by the handle's [`NodeId`] in the
//! supplied [`Visited`] tracker:
//!
//! - A node reached a second time during validation returns immediately, so
//!   faults never duplicate no matter how many paths reach it.
//! - A node reached a second time during a build is answered from the tracker:
//!   a finished node hands back its value, an in-progress node (a true cycle)
//!   hands back a deferred [`Reference`] that fills in when the in-progress
//!   build completes. The node's own cell is never re-borrowed, which is what
//!   makes cyclic graphs safe under `RefCell`.
//!
//! Each entry-point call (`build`, `build_success`) allocates its own fresh
//! trackers; nothing is shared across traversals.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::failures::Failures;
use crate::identity::{NodeId, Visited};
use crate::reference::{NotResolved, Reference};
use crate::result::{BuildError, BuildResult};

/// Implementation contract for a concrete builder.
///
/// Hooks are invoked only through a [`BuilderHandle`]; implementations never
/// deal with identity or cycle bookkeeping themselves.
pub trait Builder {
    /// The value this builder produces. Cloning must be cheap enough to hand
    /// the same built value to every parent that reaches this node; fields
    /// that close cycles should be [`Reference`]s, which clone by handle.
    type Output: Clone + 'static;

    /// Produce a bare value from configured scalar fields only. No nested
    /// builder may be traversed here.
    fn instantiate(&self) -> Self::Output;

    /// Build nested child handles against the shared tracker and wire their
    /// outcomes into `value`'s fields.
    fn assemble(&mut self, value: &mut Self::Output, visited: &mut Visited);

    /// Record field-level faults and recurse into child handles' `validate`.
    fn check(&mut self, visited: &mut Visited, failures: &mut Failures);
}

/// What a mid-graph build step hands back: the finished value, or a deferred
/// reference to a node whose build is still in progress further up the stack.
#[derive(Debug)]
pub enum Built<T> {
    Value(T),
    Deferred(Reference<T>),
}

impl<T: Clone + 'static> Built<T> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Built::Deferred(_))
    }

    /// Wire this outcome into a reference-typed field. Finished values wrap
    /// as already-resolved references; deferred outcomes pass through and
    /// resolve when the owning build completes.
    pub fn into_reference(self) -> Reference<T> {
        match self {
            Built::Value(value) => Reference::immediate(value),
            Built::Deferred(reference) => reference,
        }
    }

    /// The finished value, if available at this point of the traversal.
    pub fn into_value(self) -> Result<T, NotResolved> {
        match self {
            Built::Value(value) => Ok(value),
            Built::Deferred(reference) => reference.get().cloned(),
        }
    }
}

/// Identity-bearing shared handle to a builder.
///
/// The handle owns the builder's [`NodeId`] and its cell; clones share both,
/// so the same builder can sit in several parent fields, including its own
/// descendants', and still count as one node per traversal.
pub struct BuilderHandle<B> {
    id: NodeId,
    cell: Rc<RefCell<B>>,
}

impl<B> Clone for BuilderHandle<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<B: Builder> BuilderHandle<B> {
    pub fn new(builder: B) -> Self {
        Self {
            id: NodeId::fresh(),
            cell: Rc::new(RefCell::new(builder)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Mutate the wrapped builder. Configuration happens before any
    /// traversal; calling this from inside a hook on the same builder will
    /// panic on the re-entrant borrow.
    pub fn configure(&self, configure: impl FnOnce(&mut B)) {
        configure(&mut self.cell.borrow_mut());
    }

    /// Read the wrapped builder.
    pub fn inspect<R>(&self, inspect: impl FnOnce(&B) -> R) -> R {
        inspect(&self.cell.borrow())
    }

    /// Validate this node against the shared tracker, accumulating faults.
    ///
    /// Idempotent per tracker: a node reachable via multiple paths is
    /// validated exactly once, so failures never duplicate.
    pub fn validate(&self, visited: &mut Visited, failures: &mut Failures) {
        if visited.mark(self.id) {
            trace!(node = %self.id, "already validated, skipping");
            return;
        }
        self.cell.borrow_mut().check(visited, failures);
    }

    /// Build this node against the shared tracker.
    ///
    /// A finished node returns its value; an in-progress node returns a
    /// deferred reference; an unvisited node instantiates, assembles its
    /// children, and records its finished value for every later path.
    pub fn build_with(&self, visited: &mut Visited) -> Built<B::Output> {
        if let Some(value) = visited.done::<B::Output>(self.id) {
            trace!(node = %self.id, "reusing finished value");
            return Built::Value(value);
        }
        if let Some(placeholder) = visited.pending::<B::Output>(self.id) {
            trace!(node = %self.id, "cycle reached in-progress node, deferring");
            return Built::Deferred(placeholder);
        }
        Built::Value(self.run_build(visited))
    }

    /// The begin / instantiate / assemble / complete sequence for a node not
    /// yet in the tracker.
    fn run_build(&self, visited: &mut Visited) -> B::Output {
        visited.begin::<B::Output>(self.id);
        let mut value = self.cell.borrow().instantiate();
        self.cell.borrow_mut().assemble(&mut value, visited);
        visited.complete(self.id, value.clone());
        value
    }

    /// Validate the whole graph, then build it if no faults were recorded.
    ///
    /// Both traversals get fresh trackers; validation is fail-slow and
    /// collects every fault in the graph before anything is built.
    pub fn build(&self) -> BuildResult<B::Output> {
        let mut failures = Failures::new();
        let mut visited = Visited::new();
        self.validate(&mut visited, &mut failures);
        if !failures.is_empty() {
            debug!(
                node = %self.id,
                keys = failures.len(),
                faults = failures.total(),
                "validation failed, not building"
            );
            return BuildResult::Failure(failures);
        }

        let mut visited = Visited::new();
        BuildResult::Success(self.run_build(&mut visited))
    }

    /// Build, converting accumulated faults into one hard error.
    pub fn build_success(&self) -> Result<B::Output, BuildError> {
        self.build().success()
    }
}
