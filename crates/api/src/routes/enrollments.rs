//! Enrollment routes: create, update and delete.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use bursar_core::discount::ComputedDiscount;
use bursar_core::enrollment::{
    EnrollmentChanges, EnrollmentType, FeeSchedule, GradeLevel, NewEnrollment, display_name,
};
use bursar_db::repositories::{DeleteOutcome, EnrollmentAggregate, discount::to_computed};
use bursar_shared::types::{EnrollmentId, StudentId};
use serde::Serialize;

use super::today;
use crate::{ApiError, AppState};

/// Creates the enrollment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", post(create_enrollment))
        .route(
            "/enrollments/{id}",
            put(update_enrollment).delete(delete_enrollment),
        )
}

/// An enrollment with its student and active discounts.
#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    /// Enrollment ID.
    pub id: EnrollmentId,
    /// Student ID.
    pub student_id: StudentId,
    /// `First M. Last Suffix`.
    pub student_name: String,
    /// School year.
    pub school_year: String,
    /// Grade level.
    pub grade_level: GradeLevel,
    /// New or returning.
    pub enrollment_type: EnrollmentType,
    /// Fee components.
    #[serde(flatten)]
    pub fees: FeeSchedule,
    /// Term length in months.
    pub months: i32,
    /// Active discounts.
    pub discounts: Vec<ComputedDiscount>,
}

impl From<EnrollmentAggregate> for EnrollmentResponse {
    fn from(aggregate: EnrollmentAggregate) -> Self {
        let EnrollmentAggregate {
            student,
            enrollment,
            discounts,
        } = aggregate;

        Self {
            id: EnrollmentId::from_uuid(enrollment.id),
            student_id: StudentId::from_uuid(student.id),
            student_name: display_name(
                &student.first_name,
                &student.middle_name,
                &student.last_name,
                &student.suffix,
            ),
            school_year: enrollment.school_year,
            grade_level: enrollment.grade_level.into(),
            enrollment_type: enrollment.enrollment_type.into(),
            fees: FeeSchedule {
                monthly_tuition: enrollment.monthly_tuition,
                enrollment_fee: enrollment.enrollment_fee,
                misc_fee: enrollment.misc_fee,
                pta_fee: enrollment.pta_fee,
                lms_books_fee: enrollment.lms_books_fee,
            },
            months: enrollment.months,
            discounts: discounts.iter().map(to_computed).collect(),
        }
    }
}

/// Response for a deleted enrollment.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Deleted enrollment.
    pub enrollment_id: EnrollmentId,
    /// Its student.
    pub student_id: StudentId,
    /// Whether the student was deleted with its last enrollment.
    pub student_deleted: bool,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            enrollment_id: outcome.enrollment_id,
            student_id: outcome.student_id,
            student_deleted: outcome.student_deleted,
        }
    }
}

/// POST `/enrollments` - Create an enrollment and, for new students, the student.
async fn create_enrollment(
    State(state): State<AppState>,
    Json(payload): Json<NewEnrollment>,
) -> Result<impl IntoResponse, ApiError> {
    state.validator.new_enrollment(&payload, today())?;

    let aggregate = state.enrollments.create(payload).await?;
    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from(aggregate))))
}

/// PUT `/enrollments/{id}` - Replace student details, fees and discounts.
async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    Json(payload): Json<EnrollmentChanges>,
) -> Result<impl IntoResponse, ApiError> {
    state.validator.enrollment_changes(&payload, today())?;

    let aggregate = state.enrollments.update(id, payload).await?;
    Ok(Json(EnrollmentResponse::from(aggregate)))
}

/// DELETE `/enrollments/{id}` - Soft-delete an enrollment.
async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.enrollments.delete(id).await?;
    Ok(Json(DeleteResponse::from(outcome)))
}
