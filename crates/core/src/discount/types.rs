//! Discount data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of discount a student may receive.
///
/// Ordering follows declaration order and is used to emit computed
/// discounts deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiscountType {
    /// Top of class; waives the LMS/books fee.
    #[serde(rename = "rank_1")]
    Rank1,
    /// Sibling also enrolled; 5% off term tuition.
    #[serde(rename = "sibling")]
    Sibling,
    /// Whole year paid up front; one month of tuition off.
    #[serde(rename = "full_year")]
    FullYear,
    /// Scholarship; 50% off term tuition.
    #[serde(rename = "scholar")]
    Scholar,
    /// Carpool service reduction; amount supplied by the caller.
    #[serde(rename = "carpool")]
    Carpool,
}

impl DiscountType {
    /// All discount types.
    pub const ALL: [Self; 5] = [
        Self::Rank1,
        Self::Sibling,
        Self::FullYear,
        Self::Scholar,
        Self::Carpool,
    ];

    /// Tuition discounts of which at most one may be selected.
    pub const TUITION_EXCLUSIVE: [Self; 3] = [Self::Scholar, Self::Sibling, Self::FullYear];

    /// Returns the code used in payloads and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rank1 => "rank_1",
            Self::Sibling => "sibling",
            Self::FullYear => "full_year",
            Self::Scholar => "scholar",
            Self::Carpool => "carpool",
        }
    }

    /// Parses a discount code, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for codes this version does not know.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == code)
    }

    /// The fee bucket this discount reduces.
    #[must_use]
    pub const fn scope(self) -> DiscountScope {
        match self {
            Self::Rank1 => DiscountScope::LmsBooks,
            Self::Sibling | Self::FullYear | Self::Scholar => DiscountScope::Tuition,
            Self::Carpool => DiscountScope::Carpool,
        }
    }

    /// Whether this discount belongs to the mutually exclusive tuition group.
    #[must_use]
    pub fn is_tuition_exclusive(self) -> bool {
        Self::TUITION_EXCLUSIVE.contains(&self)
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fee bucket a discount reduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountScope {
    /// LMS and books fee.
    LmsBooks,
    /// Term tuition.
    Tuition,
    /// Carpool service.
    Carpool,
}

impl DiscountScope {
    /// Returns the code used in payloads and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LmsBooks => "lms_books",
            Self::Tuition => "tuition",
            Self::Carpool => "carpool",
        }
    }
}

impl std::fmt::Display for DiscountScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discounts requested for an enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRequest {
    /// Requested discount codes; case-insensitive, may repeat or be unknown.
    #[serde(default)]
    pub codes: Vec<String>,
    /// Fixed carpool reduction, used only when `carpool` is requested.
    #[serde(default)]
    pub carpool_amount: Option<Decimal>,
}

impl DiscountRequest {
    /// Builds a request from codes with no carpool amount.
    #[must_use]
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            carpool_amount: None,
        }
    }
}

/// A concrete discount derived from a request and a fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedDiscount {
    /// Discount type.
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    /// Fee bucket reduced.
    pub scope: DiscountScope,
    /// Reduction amount.
    pub amount: Decimal,
}

impl ComputedDiscount {
    /// Composite key a persisted discount is matched on.
    #[must_use]
    pub const fn key(&self) -> (DiscountType, DiscountScope) {
        (self.discount_type, self.scope)
    }
}
