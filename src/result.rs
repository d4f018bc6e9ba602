//! Build outcomes and the hard-error taxonomy

use thiserror::Error;

use crate::failures::Failures;
use crate::reference::NotResolved;

/// Hard errors raised by misuse of the outcome API or by the exception-style
/// build shortcut. Validation faults themselves never surface here except
/// bundled inside [`BuildError::Failed`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build failed; carries every accumulated fault.
    #[error("build failed: {0}")]
    Failed(Failures),

    /// `failures()` was called on a successful outcome.
    #[error("build succeeded; there are no failures to report")]
    Succeeded,

    /// A reference was read before it was resolved.
    #[error(transparent)]
    NotResolved(#[from] NotResolved),
}

/// The outcome of one `build()` invocation: a built value or a non-empty
/// set of validation faults. Exactly one branch is populated.
#[derive(Debug)]
pub enum BuildResult<T> {
    Success(T),
    Failure(Failures),
}

impl<T> BuildResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BuildResult::Failure(_))
    }

    /// The built value. A failed outcome converts into
    /// [`BuildError::Failed`] carrying the fault dictionary.
    pub fn success(self) -> Result<T, BuildError> {
        match self {
            BuildResult::Success(value) => Ok(value),
            BuildResult::Failure(failures) => Err(BuildError::Failed(failures)),
        }
    }

    /// The accumulated faults. A successful outcome has nothing to report
    /// and yields [`BuildError::Succeeded`].
    pub fn failures(&self) -> Result<&Failures, BuildError> {
        match self {
            BuildResult::Success(_) => Err(BuildError::Succeeded),
            BuildResult::Failure(failures) => Ok(failures),
        }
    }

    /// Bridge to a plain `Result`.
    pub fn into_result(self) -> Result<T, Failures> {
        match self {
            BuildResult::Success(value) => Ok(value),
            BuildResult::Failure(failures) => Err(failures),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
