//! Validation fault accumulation
//!
//! Validation is fail-slow: a traversal records every fault it finds into a
//! [`Failures`] dictionary and never stops early, so a caller sees all missing
//! or invalid fields in one pass. Keys are usually field names; a key holds an
//! ordered, append-only list of [`Failure`] values. A child builder's faults
//! aggregate into the parent under one key as a nested dictionary.

use std::collections::BTreeMap;
use std::fmt;

/// One recorded validation fault.
///
/// Exactly one of three payloads: a carried error, a plain message, or a
/// nested dictionary holding a sub-object's faults.
#[derive(Debug)]
pub enum Failure {
    /// An error supplied by the caller, with its full cause chain.
    Error(anyhow::Error),
    /// A plain text message.
    Message(String),
    /// A sub-object's faults, keyed under the parent field.
    Nested(Failures),
}

impl Failure {
    pub fn message(text: impl Into<String>) -> Self {
        Failure::Message(text.into())
    }

    pub fn error(err: impl Into<anyhow::Error>) -> Self {
        Failure::Error(err.into())
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Error(err)
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::Message(text)
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::Message(text.to_string())
    }
}

impl From<Failures> for Failure {
    fn from(nested: Failures) -> Self {
        Failure::Nested(nested)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // alternate form prints the whole anyhow cause chain
            Failure::Error(err) => write!(f, "{err:#}"),
            Failure::Message(text) => f.write_str(text),
            Failure::Nested(nested) => write!(f, "{nested}"),
        }
    }
}

/// Append-only dictionary of validation faults, keyed by field name.
///
/// Recording under an existing key appends; nothing is ever overwritten.
#[derive(Debug, Default)]
pub struct Failures {
    entries: BTreeMap<String, Vec<Failure>>,
}

impl Failures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure under `key`, creating the list if absent.
    ///
    /// Accepts anything convertible into [`Failure`]: a message, an
    /// `anyhow::Error`, or a nested `Failures`.
    pub fn record(&mut self, key: impl Into<String>, failure: impl Into<Failure>) {
        self.entries.entry(key.into()).or_default().push(failure.into());
    }

    /// Number of keys with at least one failure.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of failures across all keys (nested dictionaries count
    /// as one entry here; see [`Failures::report`] for the flattened view).
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The failures recorded under `key`, in call order.
    pub fn get(&self, key: &str) -> Option<&[Failure]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Failure])> {
        self.entries
            .iter()
            .map(|(key, list)| (key.as_str(), list.as_slice()))
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report())
    }
}

// =============================================================================
// TESTS
// =============================================================================
