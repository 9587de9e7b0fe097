//! Financial aggregation.

use rust_decimal::Decimal;

use super::types::{FinancialSummary, PaymentStatus};
use crate::enrollment::FeeSchedule;

/// Financial calculations over an enrollment's fees, discounts and payments.
pub struct FinancialService;

impl FinancialService {
    /// Amount due: term fees less the sum of active discounts.
    #[must_use]
    pub fn total_due<I>(fees: &FeeSchedule, months: u32, discounts: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        let discount_total: Decimal = discounts.into_iter().sum();
        fees.gross_total(months) - discount_total
    }

    /// Summarises an enrollment.
    ///
    /// `discounts` and `payments` must already be restricted to active rows.
    #[must_use]
    pub fn summarize<D, P>(
        fees: &FeeSchedule,
        months: u32,
        discounts: D,
        payments: P,
    ) -> FinancialSummary
    where
        D: IntoIterator<Item = Decimal>,
        P: IntoIterator<Item = Decimal>,
    {
        let total_due = Self::total_due(fees, months, discounts);
        let total_paid: Decimal = payments.into_iter().sum();
        Self::from_totals(total_due, total_paid)
    }

    /// Derives remaining and status from precomputed totals.
    #[must_use]
    pub fn from_totals(total_due: Decimal, total_paid: Decimal) -> FinancialSummary {
        FinancialSummary {
            total_due,
            total_paid,
            remaining: total_due - total_paid,
            payment_status: PaymentStatus::classify(total_due, total_paid),
        }
    }
}
