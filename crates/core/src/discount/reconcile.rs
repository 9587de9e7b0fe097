//! Diffing a requested discount set against persisted rows.
//!
//! The plan is computed here without touching storage; the repository layer
//! applies it inside the enrollment update transaction.

use std::collections::BTreeSet;

use bursar_shared::types::DiscountId;
use rust_decimal::Decimal;

use super::types::{ComputedDiscount, DiscountScope, DiscountType};

/// A non-deleted discount row as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDiscount {
    /// Row id.
    pub id: DiscountId,
    /// Discount type.
    pub discount_type: DiscountType,
    /// Fee bucket.
    pub scope: DiscountScope,
    /// Stored amount.
    pub amount: Decimal,
}

/// Changes needed to bring persisted discounts in line with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Active rows whose amount (and timestamp) must be refreshed.
    pub updates: Vec<(DiscountId, Decimal)>,
    /// Requested discounts with no active row; inserted fresh.
    pub inserts: Vec<ComputedDiscount>,
    /// Active rows to soft-delete.
    pub removals: Vec<DiscountId>,
}

impl ReconcilePlan {
    /// True when applying the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty() && self.removals.is_empty()
    }
}

/// Builds the reconciliation plan.
///
/// Each requested discount updates the active row with the same
/// `(type, scope)` or, failing that, becomes an insert. Active rows whose type
/// was not requested are removed, except carpool rows which this sweep never
/// touches.
#[must_use]
pub fn plan_reconciliation(
    active: &[ActiveDiscount],
    requested: &[ComputedDiscount],
) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for discount in requested {
        let existing = active
            .iter()
            .find(|row| (row.discount_type, row.scope) == discount.key());
        match existing {
            Some(row) => plan.updates.push((row.id, discount.amount)),
            None => plan.inserts.push(*discount),
        }
    }

    let requested_types: BTreeSet<DiscountType> =
        requested.iter().map(|d| d.discount_type).collect();

    plan.removals = active
        .iter()
        .filter(|row| row.discount_type != DiscountType::Carpool)
        .filter(|row| !requested_types.contains(&row.discount_type))
        .map(|row| row.id)
        .collect();

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(discount_type: DiscountType, amount: Decimal) -> ActiveDiscount {
        ActiveDiscount {
            id: DiscountId::new(),
            discount_type,
            scope: discount_type.scope(),
            amount,
        }
    }

    fn wanted(discount_type: DiscountType, amount: Decimal) -> ComputedDiscount {
        ComputedDiscount {
            discount_type,
            scope: discount_type.scope(),
            amount,
        }
    }

    #[test]
    fn test_matching_row_is_updated() {
        let existing = row(DiscountType::Sibling, dec!(1300));
        let plan = plan_reconciliation(&[existing], &[wanted(DiscountType::Sibling, dec!(1500))]);

        assert_eq!(plan.updates, vec![(existing.id, dec!(1500))]);
        assert!(plan.inserts.is_empty());
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn test_missing_row_is_inserted() {
        let plan = plan_reconciliation(&[], &[wanted(DiscountType::Rank1, dec!(8000))]);

        assert!(plan.updates.is_empty());
        assert_eq!(plan.inserts, vec![wanted(DiscountType::Rank1, dec!(8000))]);
    }

    #[test]
    fn test_unrequested_row_is_removed() {
        let scholar = row(DiscountType::Scholar, dec!(13000));
        let plan = plan_reconciliation(&[scholar], &[wanted(DiscountType::Sibling, dec!(1300))]);

        assert_eq!(plan.removals, vec![scholar.id]);
        assert_eq!(plan.inserts.len(), 1);
    }

    #[test]
    fn test_empty_request_removes_all_but_carpool() {
        let rank = row(DiscountType::Rank1, dec!(8000));
        let full_year = row(DiscountType::FullYear, dec!(2600));
        let carpool = row(DiscountType::Carpool, dec!(1000));

        let plan = plan_reconciliation(&[rank, full_year, carpool], &[]);

        assert_eq!(plan.removals, vec![rank.id, full_year.id]);
        assert!(plan.updates.is_empty());
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn test_carpool_is_updated_when_requested() {
        let carpool = row(DiscountType::Carpool, dec!(1000));
        let plan = plan_reconciliation(&[carpool], &[wanted(DiscountType::Carpool, dec!(1200))]);

        assert_eq!(plan.updates, vec![(carpool.id, dec!(1200))]);
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn test_no_change_plan() {
        let plan = plan_reconciliation(&[], &[]);
        assert!(plan.is_empty());
    }
}
