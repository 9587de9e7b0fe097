//! Application-wide error types.
//!
//! Domain errors from the lower crates are folded into [`AppError`] at the
//! HTTP boundary. Only the first four variants carry a message that is safe
//! to return to a client; `Database` and `Internal` are reported generically.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (or already soft-deleted).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request content failed a validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. an invalid discount combination).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate student or enrollment).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::BusinessRule(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::BusinessRule(_) => "business_rule_violation",
            Self::Conflict(_) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true when the caller can act on the error by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Message safe to show to a client.
    ///
    /// Infrastructure failures never leak their detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
