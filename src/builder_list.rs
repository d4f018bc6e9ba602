//! Homogeneous collections of child builders
//!
//! A [`BuilderList`] holds an ordered run of child builder handles and bridges
//! them to the reference world: [`BuilderList::as_reference_list`] snapshots
//! the children into an all-unresolved [`ReferenceList`] that a caller can
//! capture early, and [`BuilderList::build_success`] builds every child and
//! resolves every snapshot ever issued, position by position. That pairing is
//! the forward-reference guarantee: capture first, build later, and the
//! captured list fills in.

use tracing::debug;

use crate::builder::{Builder, BuilderHandle};
use crate::failures::Failures;
use crate::identity::Visited;
use crate::reference::Reference;
use crate::reference_list::ReferenceList;
use crate::result::BuildError;

/// An ordered collection of child builders of one type.
pub struct BuilderList<B: Builder> {
    children: Vec<BuilderHandle<B>>,
    /// Every snapshot handed out by `as_reference_list`, kept so a single
    /// batch build resolves all of them, not just the most recent.
    issued: Vec<ReferenceList<B::Output>>,
}

impl<B: Builder> BuilderList<B> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            issued: Vec::new(),
        }
    }

    /// Append a freshly constructed child after running `configure` on it.
    /// Returns the child's handle so the caller can wire it elsewhere.
    pub fn add(&mut self, configure: impl FnOnce(&mut B)) -> BuilderHandle<B>
    where
        B: Default,
    {
        let handle = BuilderHandle::new(B::default());
        handle.configure(configure);
        self.children.push(handle.clone());
        handle
    }

    /// Append an existing handle, so the same builder can sit both in this
    /// list and in other fields of the graph.
    pub fn attach(&mut self, handle: BuilderHandle<B>) {
        self.children.push(handle);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BuilderHandle<B>> {
        self.children.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuilderHandle<B>> {
        self.children.iter()
    }

    /// Snapshot the current children, one unresolved entry per child by
    /// position. The snapshot's length is fixed now; children added later are
    /// not part of it.
    pub fn as_reference_list(&mut self) -> ReferenceList<B::Output> {
        let snapshot: ReferenceList<B::Output> = self
            .children
            .iter()
            .map(|_| Reference::unresolved())
            .collect();
        self.issued.push(snapshot.clone());
        snapshot
    }

    /// Validate every child against the shared tracker.
    pub fn validate_all(&self, visited: &mut Visited, failures: &mut Failures) {
        for child in &self.children {
            child.validate(visited, failures);
        }
    }

    /// Build every child in insertion order, collecting the produced values,
    /// then resolve every previously issued snapshot by binding each entry to
    /// the correspondingly positioned value.
    ///
    /// The first failing child converts its faults into the returned error.
    pub fn build_success(&mut self) -> Result<Vec<B::Output>, BuildError> {
        let mut values = Vec::with_capacity(self.children.len());
        for child in &self.children {
            values.push(child.build_success()?);
        }

        debug!(
            children = values.len(),
            snapshots = self.issued.len(),
            "batch build complete, resolving snapshots"
        );
        for snapshot in &self.issued {
            for (entry, value) in snapshot.iter().zip(&values) {
                entry.resolve(value.clone());
            }
        }

        Ok(values)
    }
}

impl<B: Builder> Default for BuilderList<B> {
    fn default() -> Self {
        Self::new()
    }
}
