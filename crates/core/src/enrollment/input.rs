//! Inputs to the enrollment writer.

use bursar_shared::types::StudentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::types::{EnrollmentType, FeeSchedule, GradeLevel, SchoolYear, StudentProfile};
use super::validation::Validator;
use crate::discount::DiscountRequest;

/// Where the enrolling student comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "enrollment_type", rename_all = "snake_case")]
pub enum StudentSource {
    /// First enrollment: create the student from this profile.
    New {
        /// Student details.
        student: StudentProfile,
    },
    /// Returning student: reuse an existing active student.
    Old {
        /// Existing student.
        student_id: StudentId,
    },
}

impl StudentSource {
    /// Enrollment type implied by the source.
    #[must_use]
    pub const fn enrollment_type(&self) -> EnrollmentType {
        match self {
            Self::New { .. } => EnrollmentType::New,
            Self::Old { .. } => EnrollmentType::Old,
        }
    }
}

/// A new enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    /// Student to enroll.
    #[serde(flatten)]
    pub source: StudentSource,
    /// School year.
    pub school_year: SchoolYear,
    /// Grade level.
    pub grade_level: GradeLevel,
    /// Fee components.
    #[serde(flatten)]
    pub fees: FeeSchedule,
    /// Requested discounts.
    #[serde(default)]
    pub discounts: DiscountRequest,
}

/// Replacement values for an existing enrollment and its student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentChanges {
    /// Student details.
    pub student: StudentProfile,
    /// School year.
    pub school_year: SchoolYear,
    /// Grade level.
    pub grade_level: GradeLevel,
    /// Fee components.
    #[serde(flatten)]
    pub fees: FeeSchedule,
    /// Requested discounts; replaces the current set.
    #[serde(default)]
    pub discounts: DiscountRequest,
}

impl Validator {
    /// Checks a new enrollment before it reaches storage.
    pub fn new_enrollment(
        &self,
        input: &NewEnrollment,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if let StudentSource::New { student } = &input.source {
            self.student(student, today)?;
        }
        self.fees(&input.fees)
    }

    /// Checks enrollment changes before they reach storage.
    pub fn enrollment_changes(
        &self,
        input: &EnrollmentChanges,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        self.student(&input.student, today)?;
        self.fees(&input.fees)
    }
}
