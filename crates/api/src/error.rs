//! Error responses.
//!
//! Every failure is rendered as `{ "error": code, "message": text }`.
//! Storage failures are logged here and reach the client only as a generic
//! `internal_error`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bursar_core::discount::DiscountError;
use bursar_core::enrollment::ValidationError;
use bursar_db::repositories::{EnrollmentError, FinancialError, PaymentError};
use bursar_shared::AppError;
use serde_json::json;
use tracing::error;

/// An HTTP error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn client(status: StatusCode, code: &'static str, message: impl ToString) -> Self {
        Self {
            status,
            code,
            message: message.to_string(),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if !err.is_client_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.error_code(),
            message: err.public_message(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::client(StatusCode::BAD_REQUEST, err.error_code(), &err)
    }
}

impl From<DiscountError> for ApiError {
    fn from(err: DiscountError) -> Self {
        Self::client(StatusCode::BAD_REQUEST, err.error_code(), &err)
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        let status = match &err {
            EnrollmentError::Database(db) => return AppError::Database(db.to_string()).into(),
            EnrollmentError::Discount(discount) => return (*discount).into(),
            EnrollmentError::NotFound(_) | EnrollmentError::StudentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EnrollmentError::DuplicateStudent
            | EnrollmentError::DuplicateEnrollment
            | EnrollmentError::DuplicateDiscount => StatusCode::CONFLICT,
            EnrollmentError::RequiredFees => StatusCode::BAD_REQUEST,
        };
        Self::client(status, err.error_code(), &err)
    }
}

impl From<FinancialError> for ApiError {
    fn from(err: FinancialError) -> Self {
        match err {
            FinancialError::Database(db) => AppError::Database(db.to_string()).into(),
            FinancialError::NotFound(_) => {
                Self::client(StatusCode::NOT_FOUND, err.error_code(), &err)
            }
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let status = match &err {
            PaymentError::Database(db) => return AppError::Database(db.to_string()).into(),
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::DuplicateInvoice => StatusCode::CONFLICT,
        };
        Self::client(status, err.error_code(), &err)
    }
}
