use crate::core::domain::model::identifier::{Identifier, ResourceKind};
use std::backtrace::Backtrace;
use std::time::Duration;
use thiserror::Error;

// Same type as `Backtrace`; the alias keeps thiserror from emitting the
// nightly-only `provide` method it generates for fields named `Backtrace`.
type CapturedBacktrace = Backtrace;

/// The main error type for Oracle VM Manager operations.
///
/// Every variant aborts the current convergence attempt. A resource that is
/// already in its desired state is never reported through this type; that is
/// a successful [`ChangeReport`](crate::ChangeReport) with `changed == false`.
#[derive(Error, Debug)]
pub enum OvmError {
    /// Represents errors that occur while talking to the manager
    ///
    /// # Fields
    /// * `0` - A description of what went wrong on the wire
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents rejected credentials
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Represents validation failures with detailed context
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    /// * `backtrace` - Stack trace where the error occurred
    #[error("Validation error: {source}")]
    Validation {
        source: ValidationError,
        backtrace: CapturedBacktrace,
    },

    /// No resource of the given kind carries the requested name
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    /// Several resources of the given kind share the requested name
    #[error("{kind} name '{name}' is ambiguous: {count} objects share it")]
    Ambiguous {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    /// The manager finished a job with `FAILURE`
    ///
    /// # Fields
    /// * `job` - The failed job's identifier
    /// * `detail` - The error detail supplied by the manager
    #[error("Job {} failed: {detail}", job.value)]
    JobFailure { job: Identifier, detail: String },

    /// A job did not reach a terminal state within the polling budget
    #[error("Job {} did not complete within {waited:?}", job.value)]
    Timeout { job: Identifier, waited: Duration },

    /// The manager answered with a document that breaks the API contract
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl OvmError {
    /// Returns `true` when the caller can fix the problem by changing its
    /// input (a name, a size) rather than by retrying later.
    pub fn is_caller_correctable(&self) -> bool {
        matches!(
            self,
            OvmError::NotFound { .. } | OvmError::Ambiguous { .. } | OvmError::Validation { .. }
        )
    }
}

impl From<ValidationError> for OvmError {
    fn from(error: ValidationError) -> Self {
        OvmError::Validation {
            source: error,
            backtrace: Backtrace::capture(),
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with an OvmError
pub type OvmResult<T> = Result<T, OvmError>;
