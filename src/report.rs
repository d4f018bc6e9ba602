//! Flattened fault reports
//!
//! A [`Failures`] dictionary is a tree: nested dictionaries aggregate a
//! sub-object's faults under the parent key. Tooling usually wants the flat
//! view, one row per fault keyed by a dotted path, and that is what
//! [`Failures::report`] produces. The report types are serde-serializable so
//! they can cross a process boundary; builder state itself never does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::failures::{Failure, Failures};

/// One flattened fault: the dotted path to the failing field and its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultEntry {
    pub path: String,
    pub message: String,
}

/// Flat, ordered view of a whole fault tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultReport {
    pub entries: Vec<FaultEntry>,
}

impl FaultReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("no failures");
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", entry.path, entry.message)?;
        }
        Ok(())
    }
}

impl Failures {
    /// Flatten the fault tree into one entry per fault, nested keys joined
    /// with dots (`owner.name`).
    pub fn report(&self) -> FaultReport {
        let mut entries = Vec::new();
        flatten(self, None, &mut entries);
        FaultReport { entries }
    }
}

fn flatten(failures: &Failures, prefix: Option<&str>, out: &mut Vec<FaultEntry>) {
    for (key, list) in failures.iter() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.to_string(),
        };
        for failure in list {
            match failure {
                Failure::Nested(nested) => flatten(nested, Some(&path), out),
                // alternate form prints the whole anyhow cause chain
                Failure::Error(err) => out.push(FaultEntry {
                    path: path.clone(),
                    message: format!("{err:#}"),
                }),
                Failure::Message(message) => out.push(FaultEntry {
                    path: path.clone(),
                    message: message.clone(),
                }),
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
