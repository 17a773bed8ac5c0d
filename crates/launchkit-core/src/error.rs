//! Errors produced by the descriptor builder and the job-control facade.

use thiserror::Error;

use crate::errno::ClassifiedError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LaunchctlError>;

/// Errors that can occur while building descriptors or controlling jobs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchctlError {
    /// A field was given a value of the wrong kind.
    #[error("{field} must be {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    /// A string field was given a value outside its allow-list.
    #[error("{field} must be one of {}", allowed.join(", "))]
    ConstraintViolation { field: String, allowed: Vec<String> },

    /// The call itself was malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A weekday could not be normalized.
    #[error("Invalid day of week: {0}")]
    InvalidWeekday(String),

    /// A calendar interval named none of Minute, Hour, Day, Weekday or Month.
    #[error("StartCalendarInterval cannot be an empty object")]
    EmptyConstraint,

    /// No job carries the requested label.
    #[error("No job found with label: {0}")]
    NotFound(String),

    /// The operation exists but is not implemented yet.
    #[error("{0} is not yet implemented")]
    Unsupported(&'static str),

    /// The job-control capability reported a classified errno.
    #[error("{}: {} (errno {})", .0.code, .0.message, .0.errno)]
    SystemFailure(ClassifiedError),
}

impl LaunchctlError {
    pub(crate) fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    /// The classified errno, for `SystemFailure` errors.
    pub fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            Self::SystemFailure(classified) => Some(classified),
            _ => None,
        }
    }

    /// Numeric errno carried by this error, or `0` for validation errors.
    pub fn errno(&self) -> i32 {
        self.classified().map_or(0, |c| c.errno)
    }
}
