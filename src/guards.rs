//! Field-level validation guards
//!
//! Small assertions concrete builders call from their `check` hooks. Each
//! guard records at most one failure under the given key, built by the
//! caller-supplied factory, and never fails hard itself.

use crate::failures::{Failure, Failures};

/// Record a failure under `key` if `condition` is false.
pub fn check(
    condition: bool,
    key: &str,
    failures: &mut Failures,
    fail: impl FnOnce() -> Failure,
) {
    if !condition {
        failures.record(key, fail());
    }
}

/// Record a failure if `value` is absent.
pub fn require<T>(
    value: Option<&T>,
    key: &str,
    failures: &mut Failures,
    fail: impl FnOnce() -> Failure,
) {
    check(value.is_some(), key, failures, fail);
}

/// Required string: record one failure if absent, empty, or all-whitespace.
pub fn require_text(
    value: Option<&str>,
    key: &str,
    failures: &mut Failures,
    fail: impl FnOnce() -> Failure,
) {
    check(
        value.is_some_and(|text| !text.trim().is_empty()),
        key,
        failures,
        fail,
    );
}

/// Optional string: absent means "not provided" and is fine; record one
/// failure only if a value is present but empty or all-whitespace.
pub fn optional_text(
    value: Option<&str>,
    key: &str,
    failures: &mut Failures,
    fail: impl FnOnce() -> Failure,
) {
    check(
        value.is_none_or(|text| !text.trim().is_empty()),
        key,
        failures,
        fail,
    );
}

/// Required collection of strings: record one failure if the collection is
/// absent or empty, or one failure if any element is blank. Never more than
/// one failure per call, however many elements are invalid.
pub fn require_each<S: AsRef<str>>(
    values: Option<&[S]>,
    key: &str,
    failures: &mut Failures,
    fail: impl FnOnce() -> Failure,
) {
    let ok = match values {
        None => false,
        Some([]) => false,
        Some(items) => items.iter().all(|item| !item.as_ref().trim().is_empty()),
    };
    check(ok, key, failures, fail);
}

// =============================================================================
// TESTS
// =============================================================================
