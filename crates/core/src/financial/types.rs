//! Financial read-model types.

use bursar_shared::types::{EnrollmentId, StudentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discount::{ComputedDiscount, DiscountType};
use crate::enrollment::{EnrollmentType, FeeSchedule, GradeLevel, SchoolYear};

/// How much of the amount due has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Some, but not all, of the amount due paid.
    Partial,
    /// Amount due fully covered.
    Paid,
}

impl PaymentStatus {
    /// Classifies a payment position.
    ///
    /// `Unpaid` takes precedence, so an enrollment whose discounts cover
    /// everything but which has no payments still reads as unpaid.
    #[must_use]
    pub fn classify(total_due: Decimal, total_paid: Decimal) -> Self {
        if total_paid.is_zero() {
            Self::Unpaid
        } else if total_paid >= total_due {
            Self::Paid
        } else {
            Self::Partial
        }
    }

    /// Returns the status label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Due, paid and remaining amounts for one enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Fees for the term less active discounts.
    pub total_due: Decimal,
    /// Sum of counted payments.
    pub total_paid: Decimal,
    /// `total_due - total_paid`; negative when overpaid.
    pub remaining: Decimal,
    /// Derived status.
    pub payment_status: PaymentStatus,
}

/// Student summary shown alongside an enrollment's financials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    /// Student ID.
    pub id: StudentId,
    /// `First M. Last Suffix`.
    pub full_name: String,
    /// Given name.
    pub first_name: String,
    /// Middle name.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Suffix, empty when none.
    pub suffix: String,
}

/// Full financial view of one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentFinancials {
    /// Enrollment ID.
    pub enrollment_id: EnrollmentId,
    /// Student the enrollment belongs to.
    pub student: StudentSummary,
    /// School year.
    pub school_year: SchoolYear,
    /// Grade level.
    pub grade_level: GradeLevel,
    /// New or returning.
    pub enrollment_type: EnrollmentType,
    /// Fee components.
    pub fees: FeeSchedule,
    /// Term length in months.
    pub months: u32,
    /// Active discounts.
    pub discounts: Vec<ComputedDiscount>,
    /// Sum of active discount amounts.
    pub discount_total: Decimal,
    /// Types of the active discounts.
    pub discount_types: Vec<DiscountType>,
    /// Totals and status.
    #[serde(flatten)]
    pub summary: FinancialSummary,
}

/// One row of the financial listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionRow {
    /// Enrollment ID.
    pub enrollment_id: EnrollmentId,
    /// Student ID.
    pub student_id: StudentId,
    /// `First M. Last Suffix`.
    pub full_name: String,
    /// School year.
    pub school_year: SchoolYear,
    /// Grade level.
    pub grade_level: GradeLevel,
    /// Types of the active discounts.
    pub discount_types: Vec<DiscountType>,
    /// Totals and status.
    #[serde(flatten)]
    pub summary: FinancialSummary,
}
