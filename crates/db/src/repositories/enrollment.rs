//! Enrollment repository: the student, enrollment and discount aggregate.
//!
//! Create, update and delete each run in one [`UnitOfWork`]. Nothing from a
//! failed operation is ever visible: the whole transaction rolls back.

use std::time::Duration;

use bursar_core::discount::{ComputedDiscount, DiscountError, compute_discounts};
use bursar_core::enrollment::{
    EnrollmentChanges, FeeSchedule, GradeLevel, NewEnrollment, SchoolYear, StudentProfile,
    StudentSource, TERM_MONTHS,
};
use bursar_shared::types::{EnrollmentId, StudentId};
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{info, warn};

use super::discount::DiscountReconciler;
use crate::active::SoftDeletable;
use crate::constraint::{self, Constraint};
use crate::entities::{discounts, enrollments, sea_orm_active_enums::EnrollmentType, students};
use crate::unit_of_work::UnitOfWork;

/// Term length as stored in the `months` column.
#[allow(clippy::cast_possible_wrap)]
const MONTHS_COLUMN: i32 = TERM_MONTHS as i32;

/// Error types for enrollment operations.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    /// Enrollment not found or already deleted.
    #[error("Enrollment not found: {0}")]
    NotFound(EnrollmentId),

    /// Student not found or already deleted.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// An active student with the same identity already exists.
    #[error("A student with the same name, gender and birthdate already exists")]
    DuplicateStudent,

    /// The student is already enrolled for the school year.
    #[error("Student is already enrolled for this school year")]
    DuplicateEnrollment,

    /// A fee component is zero or negative.
    #[error("enrollment, tuition, misc, pta, lms_books fees must be greater than zero")]
    RequiredFees,

    /// A concurrent writer created the same active discount.
    #[error("Discount is already active for this enrollment")]
    DuplicateDiscount,

    /// The requested discounts break the combination rules.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for EnrollmentError {
    fn from(err: DbErr) -> Self {
        match constraint::violated(&err) {
            Some(Constraint::StudentIdentity) => Self::DuplicateStudent,
            Some(Constraint::EnrollmentPerSchoolYear) => Self::DuplicateEnrollment,
            Some(Constraint::PositiveFees) => Self::RequiredFees,
            Some(Constraint::ActiveDiscount) => Self::DuplicateDiscount,
            Some(Constraint::TuitionInvoiceNumber | Constraint::OtherInvoiceNumber) | None => {
                Self::Database(err)
            }
        }
    }
}

impl EnrollmentError {
    /// True for both enrollment and student not-found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::StudentNotFound(_))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::StudentNotFound(_) => "NOT_FOUND",
            Self::DuplicateStudent => "DUPLICATE_STUDENT",
            Self::DuplicateEnrollment => "DUPLICATE_ENROLLMENT",
            Self::RequiredFees => "REQUIRED_FEES",
            Self::DuplicateDiscount => "DUPLICATE_DISCOUNT",
            Self::Discount(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// A student, one of their enrollments, and its active discounts.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentAggregate {
    /// The student.
    pub student: students::Model,
    /// The enrollment.
    pub enrollment: enrollments::Model,
    /// Active discounts, in discount type order.
    pub discounts: Vec<discounts::Model>,
}

/// Result of deleting an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The deleted enrollment.
    pub enrollment_id: EnrollmentId,
    /// Its student.
    pub student_id: StudentId,
    /// Whether the student was soft-deleted because no active enrollment
    /// referenced it any more.
    pub student_deleted: bool,
}

/// Enrollment repository for aggregate writes.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
    statement_timeout: Duration,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    /// Creates an enrollment, its student (for new students) and discounts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The discounts break the combination rules
    /// - A returning student is not active
    /// - The student identity or (student, school year) pair already exists
    /// - A fee is not positive
    /// - Database operation fails
    pub async fn create(
        &self,
        input: NewEnrollment,
    ) -> Result<EnrollmentAggregate, EnrollmentError> {
        let discounts = compute_discounts(&input.discounts, &input.fees)
            .inspect_err(log_discount_rejection)?;

        let uow = UnitOfWork::begin(&self.db, self.statement_timeout).await?;
        let result = Self::create_in(uow.transaction(), &input, &discounts).await;
        let aggregate = uow.finish(result).await.inspect_err(log_rejection)?;

        info!(
            enrollment_id = %aggregate.enrollment.id,
            student_id = %aggregate.student.id,
            discounts = aggregate.discounts.len(),
            "Enrollment created"
        );
        Ok(aggregate)
    }

    async fn create_in(
        txn: &DatabaseTransaction,
        input: &NewEnrollment,
        discounts: &[ComputedDiscount],
    ) -> Result<EnrollmentAggregate, EnrollmentError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let student = match &input.source {
            StudentSource::New { student } => Self::insert_student(txn, student, now).await?,
            // Shared lock: a concurrent delete of the student's last
            // enrollment must wait for this insert before counting.
            StudentSource::Old { student_id } => students::Entity::active()
                .filter(students::Column::Id.eq(student_id.into_inner()))
                .lock_shared()
                .one(txn)
                .await?
                .ok_or(EnrollmentError::StudentNotFound(*student_id))?,
        };

        let enrollment = enrollments::ActiveModel {
            id: Set(EnrollmentId::new().into_inner()),
            student_id: Set(student.id),
            enrollment_type: Set(EnrollmentType::from(input.source.enrollment_type())),
            months: Set(MONTHS_COLUMN),
            created_at: Set(now),
            deleted_at: Set(None),
            ..enrollment_columns(&input.school_year, input.grade_level, &input.fees, now)
        }
        .insert(txn)
        .await?;

        let enrollment_id = EnrollmentId::from_uuid(enrollment.id);
        let mut rows = Vec::with_capacity(discounts.len());
        for discount in discounts {
            rows.push(DiscountReconciler::insert(txn, enrollment_id, discount, now).await?);
        }

        Ok(EnrollmentAggregate {
            student,
            enrollment,
            discounts: rows,
        })
    }

    async fn insert_student(
        txn: &DatabaseTransaction,
        profile: &StudentProfile,
        now: DateTimeWithTimeZone,
    ) -> Result<students::Model, DbErr> {
        students::ActiveModel {
            id: Set(StudentId::new().into_inner()),
            created_at: Set(now),
            deleted_at: Set(None),
            ..student_columns(profile, now)
        }
        .insert(txn)
        .await
    }

    /// Replaces an enrollment's student details, fees and discounts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The discounts break the combination rules
    /// - The enrollment or its student is not active
    /// - The new student identity or school year collides with another row
    /// - A fee is not positive
    /// - Database operation fails
    pub async fn update(
        &self,
        id: EnrollmentId,
        changes: EnrollmentChanges,
    ) -> Result<EnrollmentAggregate, EnrollmentError> {
        let discounts = compute_discounts(&changes.discounts, &changes.fees)
            .inspect_err(log_discount_rejection)?;

        let uow = UnitOfWork::begin(&self.db, self.statement_timeout).await?;
        let result = Self::update_in(uow.transaction(), id, &changes, &discounts).await;
        let aggregate = uow.finish(result).await.inspect_err(log_rejection)?;

        info!(
            enrollment_id = %id,
            student_id = %aggregate.student.id,
            discounts = aggregate.discounts.len(),
            "Enrollment updated"
        );
        Ok(aggregate)
    }

    async fn update_in(
        txn: &DatabaseTransaction,
        id: EnrollmentId,
        changes: &EnrollmentChanges,
        discounts: &[ComputedDiscount],
    ) -> Result<EnrollmentAggregate, EnrollmentError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        // Locks the enrollment so concurrent updates and deletes serialize.
        let current = Self::lock_active(txn, id).await?;
        let student_id = StudentId::from_uuid(current.student_id);

        let updated = students::Entity::update_many()
            .set(student_columns(&changes.student, now))
            .filter(students::Entity::is_active())
            .filter(students::Column::Id.eq(current.student_id))
            .exec(txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::StudentNotFound(student_id));
        }

        let updated = enrollments::Entity::update_many()
            .set(enrollment_columns(
                &changes.school_year,
                changes.grade_level,
                &changes.fees,
                now,
            ))
            .filter(enrollments::Entity::is_active())
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .exec(txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::NotFound(id));
        }

        let discounts = DiscountReconciler::reconcile(txn, id, discounts, now).await?;

        let student = students::Entity::active()
            .filter(students::Column::Id.eq(current.student_id))
            .one(txn)
            .await?
            .ok_or(EnrollmentError::StudentNotFound(student_id))?;
        let enrollment = enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .one(txn)
            .await?
            .ok_or(EnrollmentError::NotFound(id))?;

        Ok(EnrollmentAggregate {
            student,
            enrollment,
            discounts,
        })
    }

    /// Soft-deletes an enrollment, and its student when no other active
    /// enrollment references it.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not active or the database
    /// operation fails.
    pub async fn delete(&self, id: EnrollmentId) -> Result<DeleteOutcome, EnrollmentError> {
        let uow = UnitOfWork::begin(&self.db, self.statement_timeout).await?;
        let result = Self::delete_in(uow.transaction(), id).await;
        let outcome = uow.finish(result).await.inspect_err(log_rejection)?;

        info!(
            enrollment_id = %outcome.enrollment_id,
            student_id = %outcome.student_id,
            student_deleted = outcome.student_deleted,
            "Enrollment deleted"
        );
        Ok(outcome)
    }

    async fn delete_in(
        txn: &DatabaseTransaction,
        id: EnrollmentId,
    ) -> Result<DeleteOutcome, EnrollmentError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let enrollment = Self::lock_active(txn, id).await?;
        let student_id = enrollment.student_id;

        enrollments::Entity::soft_delete(now)
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .exec(txn)
            .await?;

        // Deleting two enrollments of one student at once must not leave the
        // student active, so the count below runs under the student's lock.
        students::Entity::active()
            .filter(students::Column::Id.eq(student_id))
            .lock_exclusive()
            .one(txn)
            .await?;

        let remaining = enrollments::Entity::active()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .count(txn)
            .await?;

        let student_deleted = if remaining == 0 {
            students::Entity::soft_delete(now)
                .filter(students::Column::Id.eq(student_id))
                .exec(txn)
                .await?
                .rows_affected
                > 0
        } else {
            false
        };

        Ok(DeleteOutcome {
            enrollment_id: id,
            student_id: StudentId::from_uuid(student_id),
            student_deleted,
        })
    }

    /// Loads an active enrollment with its student and active discounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not active or the database
    /// query fails.
    pub async fn get(&self, id: EnrollmentId) -> Result<EnrollmentAggregate, EnrollmentError> {
        let uow = UnitOfWork::begin_read(&self.db, self.statement_timeout).await?;
        let result = Self::get_in(uow.transaction(), id).await;
        uow.finish(result).await
    }

    async fn get_in(
        txn: &DatabaseTransaction,
        id: EnrollmentId,
    ) -> Result<EnrollmentAggregate, EnrollmentError> {
        let enrollment = enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .one(txn)
            .await?
            .ok_or(EnrollmentError::NotFound(id))?;
        let student = students::Entity::active()
            .filter(students::Column::Id.eq(enrollment.student_id))
            .one(txn)
            .await?
            .ok_or(EnrollmentError::NotFound(id))?;
        let discounts = DiscountReconciler::active_for(txn, id).await?;

        Ok(EnrollmentAggregate {
            student,
            enrollment,
            discounts,
        })
    }

    /// Every discount row ever written for an enrollment, soft-deleted ones
    /// included, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn discount_history(
        &self,
        id: EnrollmentId,
    ) -> Result<Vec<discounts::Model>, EnrollmentError> {
        Ok(DiscountReconciler::history_for(&self.db, id).await?)
    }

    async fn lock_active(
        txn: &DatabaseTransaction,
        id: EnrollmentId,
    ) -> Result<enrollments::Model, EnrollmentError> {
        enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(EnrollmentError::NotFound(id))
    }
}

/// Mutable student columns.
fn student_columns(profile: &StudentProfile, now: DateTimeWithTimeZone) -> students::ActiveModel {
    students::ActiveModel {
        first_name: Set(profile.first_name.clone()),
        middle_name: Set(profile.middle_name.clone()),
        last_name: Set(profile.last_name.clone()),
        suffix: Set(profile.suffix.clone()),
        gender: Set(profile.gender.into()),
        birthdate: Set(profile.birthdate),
        address: Set(profile.address.clone()),
        mother_name: Set(profile.mother_name.clone()),
        mother_job: Set(profile.mother_job.clone()),
        mother_education: Set(profile.mother_education.clone()),
        father_name: Set(profile.father_name.clone()),
        father_job: Set(profile.father_job.clone()),
        father_education: Set(profile.father_education.clone()),
        contact_numbers: Set(profile.contact_numbers.clone()),
        living_with: Set(profile.living_with.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Mutable enrollment columns.
fn enrollment_columns(
    school_year: &SchoolYear,
    grade_level: GradeLevel,
    fees: &FeeSchedule,
    now: DateTimeWithTimeZone,
) -> enrollments::ActiveModel {
    enrollments::ActiveModel {
        school_year: Set(school_year.as_str().to_string()),
        grade_level: Set(grade_level.into()),
        monthly_tuition: Set(fees.monthly_tuition),
        enrollment_fee: Set(fees.enrollment_fee),
        misc_fee: Set(fees.misc_fee),
        pta_fee: Set(fees.pta_fee),
        lms_books_fee: Set(fees.lms_books_fee),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Logs client-caused failures; opaque failures are logged at the boundary.
fn log_rejection(err: &EnrollmentError) {
    if !matches!(err, EnrollmentError::Database(_)) {
        warn!(code = err.error_code(), error = %err, "Enrollment write rejected");
    }
}

fn log_discount_rejection(err: &DiscountError) {
    warn!(code = err.error_code(), error = %err, "Enrollment discounts rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_months_column_matches_term() {
        assert_eq!(u32::try_from(MONTHS_COLUMN).unwrap(), TERM_MONTHS);
    }

    #[test]
    fn test_unmapped_db_error_stays_opaque() {
        let err = EnrollmentError::from(DbErr::Query(RuntimeErr::Internal("timeout".to_string())));
        assert!(matches!(err, EnrollmentError::Database(_)));
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_discount_error_code_passes_through() {
        let err = EnrollmentError::from(DiscountError::CarpoolNotExclusive);
        assert_eq!(err.error_code(), "INVALID_DISCOUNT_COMBINATION");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_variants() {
        assert!(EnrollmentError::NotFound(EnrollmentId::new()).is_not_found());
        assert!(EnrollmentError::StudentNotFound(StudentId::new()).is_not_found());
    }
}
