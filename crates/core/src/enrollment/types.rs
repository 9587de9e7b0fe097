//! Enrollment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::validation::school_year;

/// Fixed length of a school term, in months.
///
/// Monthly tuition is billed for this many months.
pub const TERM_MONTHS: u32 = 10;

/// Whether the student is enrolling for the first time or returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentType {
    /// First enrollment; a new student record is created.
    New,
    /// Returning student; the existing student record is reused.
    Old,
}

impl EnrollmentType {
    /// Returns the storage/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    /// Parses an enrollment type, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "old" => Some(Self::Old),
            _ => None,
        }
    }
}

/// Student gender as recorded on the enrollment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Returns the storage/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parses a gender, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Grade level offered by the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    /// Nursery 1.
    #[serde(rename = "nursery-1")]
    Nursery1,
    /// Nursery 2.
    #[serde(rename = "nursery-2")]
    Nursery2,
    /// Kindergarten 1.
    #[serde(rename = "kinder-1")]
    Kinder1,
    /// Kindergarten 2.
    #[serde(rename = "kinder-2")]
    Kinder2,
    /// Grade 1.
    #[serde(rename = "grade-1")]
    Grade1,
    /// Grade 2.
    #[serde(rename = "grade-2")]
    Grade2,
    /// Grade 3.
    #[serde(rename = "grade-3")]
    Grade3,
    /// Grade 4.
    #[serde(rename = "grade-4")]
    Grade4,
    /// Grade 5.
    #[serde(rename = "grade-5")]
    Grade5,
    /// Grade 6.
    #[serde(rename = "grade-6")]
    Grade6,
}

impl GradeLevel {
    /// All grade levels, lowest first.
    pub const ALL: [Self; 10] = [
        Self::Nursery1,
        Self::Nursery2,
        Self::Kinder1,
        Self::Kinder2,
        Self::Grade1,
        Self::Grade2,
        Self::Grade3,
        Self::Grade4,
        Self::Grade5,
        Self::Grade6,
    ];

    /// Returns the storage/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nursery1 => "nursery-1",
            Self::Nursery2 => "nursery-2",
            Self::Kinder1 => "kinder-1",
            Self::Kinder2 => "kinder-2",
            Self::Grade1 => "grade-1",
            Self::Grade2 => "grade-2",
            Self::Grade3 => "grade-3",
            Self::Grade4 => "grade-4",
            Self::Grade5 => "grade-5",
            Self::Grade6 => "grade-6",
        }
    }

    /// Parses a grade level, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A school year in `YYYY-YYYY` form where the second year follows the first.
///
/// Decoding goes through [`SchoolYear::parse`], so a payload cannot carry a
/// malformed year past deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear(String);

impl TryFrom<String> for SchoolYear {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        school_year(&value).map_err(|reason| ValidationError::Field {
            field: "school_year",
            reason,
        })?;
        Ok(Self(value))
    }
}

impl From<SchoolYear> for String {
    fn from(year: SchoolYear) -> Self {
        year.0
    }
}

impl SchoolYear {
    /// Parses a school year such as `2024-2025`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (first, second) = value.split_once('-')?;
        if first.len() != 4 || second.len() != 4 {
            return None;
        }
        if !first.bytes().chain(second.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let first: u32 = first.parse().ok()?;
        let second: u32 = second.parse().ok()?;
        (second == first + 1).then(|| Self(value.to_string()))
    }

    /// Returns the school year as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fee components charged for one enrollment.
///
/// Every component must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Tuition billed per month of the term.
    pub monthly_tuition: Decimal,
    /// One-time enrollment fee.
    pub enrollment_fee: Decimal,
    /// Miscellaneous fee.
    pub misc_fee: Decimal,
    /// Parent-teacher association fee.
    pub pta_fee: Decimal,
    /// Learning-management-system and books fee.
    pub lms_books_fee: Decimal,
}

impl FeeSchedule {
    /// Tuition for a whole term of `months` months.
    #[must_use]
    pub fn term_tuition(&self, months: u32) -> Decimal {
        self.monthly_tuition * Decimal::from(months)
    }

    /// Sum of all fee components before discounts.
    #[must_use]
    pub fn gross_total(&self, months: u32) -> Decimal {
        self.term_tuition(months)
            + self.enrollment_fee
            + self.misc_fee
            + self.pta_fee
            + self.lms_books_fee
    }

    /// Named components, in a stable order.
    #[must_use]
    pub fn components(&self) -> [(&'static str, Decimal); 5] {
        [
            ("monthly_tuition", self.monthly_tuition),
            ("enrollment_fee", self.enrollment_fee),
            ("misc_fee", self.misc_fee),
            ("pta_fee", self.pta_fee),
            ("lms_books_fee", self.lms_books_fee),
        ]
    }
}

/// Identity and demographic details of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Given name.
    pub first_name: String,
    /// Middle name.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Name suffix (e.g. "Jr"); empty when none.
    #[serde(default)]
    pub suffix: String,
    /// Gender.
    pub gender: Gender,
    /// Date of birth.
    pub birthdate: NaiveDate,
    /// Home address.
    pub address: String,
    /// Mother's name.
    #[serde(default)]
    pub mother_name: String,
    /// Mother's occupation.
    #[serde(default)]
    pub mother_job: String,
    /// Mother's educational attainment.
    #[serde(default)]
    pub mother_education: String,
    /// Father's name.
    #[serde(default)]
    pub father_name: String,
    /// Father's occupation.
    #[serde(default)]
    pub father_job: String,
    /// Father's educational attainment.
    #[serde(default)]
    pub father_education: String,
    /// Guardian contact numbers.
    #[serde(default)]
    pub contact_numbers: Vec<String>,
    /// Who the student lives with.
    #[serde(default)]
    pub living_with: String,
}

impl StudentProfile {
    /// Display name: `First M. Last Suffix`.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.suffix,
        )
    }
}

/// Builds a display name as `First M. Last Suffix`, skipping blank parts.
#[must_use]
pub fn display_name(first: &str, middle: &str, last: &str, suffix: &str) -> String {
    let middle_initial = middle
        .trim()
        .chars()
        .next()
        .map(|initial| format!("{initial}."));

    [
        Some(first.trim().to_string()),
        middle_initial,
        Some(last.trim().to_string()),
        Some(suffix.trim().to_string()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
