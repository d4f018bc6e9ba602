//! builder-core: cycle-safe object graph construction and validation
//!
//! This crate is the reusable engine behind declarative builder graphs, with
//! NO I/O and no domain knowledge:
//! - Node identity and the per-traversal visited tracker
//! - Resolve-once references and ordered reference lists
//! - The validation fault model (keyed, append-only, fail-slow)
//! - The `Builder` trait and handle-based traversal state machine
//! - Homogeneous child-builder lists with snapshot resolution
//! - Field-level validation guards
//! - Flattened, serializable fault reports
//!
//! Concrete domain builders live in consuming crates: they implement the
//! three `Builder` hooks and call back into the engine for everything else.
//!
//! A graph may contain cycles of any length. Traversals terminate because
//! each node is keyed by identity in a traversal-scoped tracker and processed
//! at most once; a node reached while its own build is still in progress is
//! answered with a deferred [`Reference`] that fills in when that build
//! completes.

pub mod builder;
pub mod builder_list;
pub mod failures;
pub mod guards;
pub mod identity;
pub mod reference;
pub mod reference_list;
pub mod report;
pub mod result;

// Re-export the working surface
pub use builder::{Builder, BuilderHandle, Built};
pub use builder_list::BuilderList;
pub use failures::{Failure, Failures};
pub use identity::{NodeId, Visited};
pub use reference::{NotResolved, Reference};
pub use reference_list::ReferenceList;
pub use report::{FaultEntry, FaultReport};
pub use result::{BuildError, BuildResult};
