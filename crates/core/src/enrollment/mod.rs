//! Enrollment domain: fee schedules, student profiles, and payload validation.

pub mod error;
pub mod input;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use input::{EnrollmentChanges, NewEnrollment, StudentSource};
pub use types::{
    EnrollmentType, FeeSchedule, Gender, GradeLevel, SchoolYear, StudentProfile, TERM_MONTHS,
    display_name,
};
pub use validation::{RuleResult, Validator};
