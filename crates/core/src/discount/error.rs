//! Discount rule errors.

use thiserror::Error;

use super::types::DiscountType;

/// Errors raised by the discount rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscountError {
    /// Two of scholar, sibling, and full_year were selected together.
    #[error("invalid discount combination: {first} cannot be combined with {second}")]
    ExclusiveTuitionDiscounts {
        /// First conflicting discount.
        first: DiscountType,
        /// Second conflicting discount.
        second: DiscountType,
    },

    /// Carpool was selected alongside another discount.
    #[error("invalid discount combination: carpool cannot be combined with other discounts")]
    CarpoolNotExclusive,

    /// A negative carpool amount was supplied.
    #[error("carpool amount cannot be negative")]
    NegativeCarpoolAmount,
}

impl DiscountError {
    /// True for the mutual-exclusion failures.
    #[must_use]
    pub const fn is_invalid_combination(&self) -> bool {
        matches!(
            self,
            Self::ExclusiveTuitionDiscounts { .. } | Self::CarpoolNotExclusive
        )
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ExclusiveTuitionDiscounts { .. } | Self::CarpoolNotExclusive => {
                "INVALID_DISCOUNT_COMBINATION"
            }
            Self::NegativeCarpoolAmount => "NEGATIVE_CARPOOL_AMOUNT",
        }
    }
}
