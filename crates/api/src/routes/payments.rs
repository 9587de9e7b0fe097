//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use bursar_core::payment::{OtherPaymentInput, TuitionPaymentInput};
use bursar_shared::types::EnrollmentId;

use super::today;
use crate::{ApiError, AppState};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments/{id}/payments", get(list_payments))
        .route("/enrollments/{id}/payments/tuition", post(record_tuition))
        .route("/enrollments/{id}/payments/other", post(record_other))
}

/// POST `/enrollments/{id}/payments/tuition`
async fn record_tuition(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    Json(payload): Json<TuitionPaymentInput>,
) -> Result<impl IntoResponse, ApiError> {
    state.validator.tuition_payment(&payload, today())?;

    let record = state.payments.record_tuition(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST `/enrollments/{id}/payments/other`
async fn record_other(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    Json(payload): Json<OtherPaymentInput>,
) -> Result<impl IntoResponse, ApiError> {
    state.validator.other_payment(&payload, today())?;

    let record = state.payments.record_other(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET `/enrollments/{id}/payments` - Both invoice kinds, newest first.
async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.payments.list(id).await?;
    Ok(Json(records))
}
