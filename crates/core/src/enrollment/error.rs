//! Validation error types for enrollment payloads.

use thiserror::Error;

/// A request field failed a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field broke a rule; `reason` names which one.
    #[error("{field}: {reason}")]
    Field {
        /// Field name as it appears in the request.
        field: &'static str,
        /// Human-readable reason.
        reason: &'static str,
    },

    /// One or more fee components are zero or negative.
    #[error("enrollment, tuition, misc, pta, lms_books fees must be greater than zero")]
    RequiredFees,
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Field { .. } => "VALIDATION_ERROR",
            Self::RequiredFees => "REQUIRED_FEES",
        }
    }

    /// Name of the offending field, if the error concerns a single field.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Field { field, .. } => Some(field),
            Self::RequiredFees => None,
        }
    }
}
