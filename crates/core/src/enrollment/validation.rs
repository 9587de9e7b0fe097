//! Payload validation rules.
//!
//! Each rule is a pure predicate returning `Ok(())` or the reason it failed.
//! [`Validator`] holds the limits, is built once at start-up and handed to
//! request handlers; there is no process-wide registry.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::{FeeSchedule, SchoolYear, StudentProfile};

/// Outcome of a single rule.
pub type RuleResult = Result<(), &'static str>;

/// Value has no leading or trailing whitespace.
pub fn trimmed(value: &str) -> RuleResult {
    if value.trim() == value {
        Ok(())
    } else {
        Err("must not have leading or trailing spaces")
    }
}

/// Value is non-empty.
pub fn required(value: &str) -> RuleResult {
    if value.trim().is_empty() {
        Err("is required")
    } else {
        Ok(())
    }
}

/// Value contains only ASCII letters and spaces.
pub fn alpha_with_spaces(value: &str) -> RuleResult {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        Ok(())
    } else {
        Err("must contain only letters and spaces")
    }
}

/// Value is at most `max` characters long.
pub fn max_len(value: &str, max: usize) -> RuleResult {
    if value.chars().count() <= max {
        Ok(())
    } else {
        Err("is too long")
    }
}

/// Value is a `YYYY-YYYY` school year with consecutive years.
pub fn school_year(value: &str) -> RuleResult {
    SchoolYear::parse(value)
        .map(|_| ())
        .ok_or("must be formatted as YYYY-YYYY with consecutive years")
}

/// Date is not after `today`.
pub fn not_in_future(date: NaiveDate, today: NaiveDate) -> RuleResult {
    if date <= today {
        Ok(())
    } else {
        Err("must not be in the future")
    }
}

/// Amount is strictly greater than zero.
pub fn decimal_gt_zero(amount: Decimal) -> RuleResult {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err("must be greater than zero")
    }
}

/// Validates enrollment payloads against the rules above.
#[derive(Debug, Clone)]
pub struct Validator {
    max_name_len: usize,
    max_suffix_len: usize,
    max_text_len: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_name_len: 100,
            max_suffix_len: 10,
            max_text_len: 100,
        }
    }
}

fn check(field: &'static str, result: RuleResult) -> Result<(), ValidationError> {
    result.map_err(|reason| ValidationError::Field { field, reason })
}

impl Validator {
    /// Creates a validator with the standard field limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A required personal name.
    pub fn name(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        check(field, required(value))?;
        check(field, trimmed(value))?;
        check(field, alpha_with_spaces(value))?;
        check(field, max_len(value, self.max_name_len))
    }

    /// An optional personal name (empty passes).
    pub fn optional_name(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Ok(());
        }
        self.name(field, value)
    }

    /// An optional free-text field bounded in length.
    pub fn text(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        check(field, max_len(value, self.max_text_len))
    }

    /// A strictly positive amount.
    pub fn positive_amount(
        &self,
        field: &'static str,
        amount: Decimal,
    ) -> Result<(), ValidationError> {
        check(field, decimal_gt_zero(amount))
    }

    /// Every fee component must be strictly positive.
    pub fn fees(&self, fees: &FeeSchedule) -> Result<(), ValidationError> {
        if fees
            .components()
            .iter()
            .all(|(_, amount)| decimal_gt_zero(*amount).is_ok())
        {
            Ok(())
        } else {
            Err(ValidationError::RequiredFees)
        }
    }

    /// Identity and guardian fields of a student.
    pub fn student(
        &self,
        student: &StudentProfile,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        self.name("first_name", &student.first_name)?;
        self.name("middle_name", &student.middle_name)?;
        self.name("last_name", &student.last_name)?;
        if !student.suffix.is_empty() {
            check("suffix", alpha_with_spaces(&student.suffix))?;
            check("suffix", max_len(&student.suffix, self.max_suffix_len))?;
        }
        check("birthdate", not_in_future(student.birthdate, today))?;
        check("address", required(&student.address))?;
        self.text("address", &student.address)?;
        self.optional_name("mother_name", &student.mother_name)?;
        self.text("mother_job", &student.mother_job)?;
        self.text("mother_education", &student.mother_education)?;
        self.optional_name("father_name", &student.father_name)?;
        self.text("father_job", &student.father_job)?;
        self.text("father_education", &student.father_education)?;
        self.text("living_with", &student.living_with)
    }
}
