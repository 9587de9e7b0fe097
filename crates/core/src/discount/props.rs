//! Property-based tests for the discount rule engine and reconciler.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconcile::{ActiveDiscount, plan_reconciliation};
use super::rules::{compute_discounts, selected_types};
use super::types::{DiscountRequest, DiscountType};
use crate::enrollment::{FeeSchedule, TERM_MONTHS};
use bursar_shared::types::DiscountId;

/// Amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn fee_schedule() -> impl Strategy<Value = FeeSchedule> {
    (
        positive_amount(),
        positive_amount(),
        positive_amount(),
        positive_amount(),
        positive_amount(),
    )
        .prop_map(
            |(monthly_tuition, enrollment_fee, misc_fee, pta_fee, lms_books_fee)| FeeSchedule {
                monthly_tuition,
                enrollment_fee,
                misc_fee,
                pta_fee,
                lms_books_fee,
            },
        )
}

fn discount_type() -> impl Strategy<Value = DiscountType> {
    prop::sample::select(DiscountType::ALL.to_vec())
}

/// Known codes in random case, mixed with junk codes.
fn code() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (discount_type(), any::<bool>()).prop_map(|(t, upper)| {
            if upper {
                t.as_str().to_ascii_uppercase()
            } else {
                t.as_str().to_string()
            }
        }),
        1 => "[a-z_]{1,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Accepted requests never hold two exclusive tuition discounts, and
    /// carpool only ever appears alone.
    #[test]
    fn prop_accepted_sets_respect_exclusion(
        codes in prop::collection::vec(code(), 0..8),
        fees in fee_schedule(),
    ) {
        let request = DiscountRequest::from_codes(codes.clone());
        if let Ok(discounts) = compute_discounts(&request, &fees) {
            let exclusive = discounts
                .iter()
                .filter(|d| d.discount_type.is_tuition_exclusive())
                .count();
            prop_assert!(exclusive <= 1);

            let has_carpool = discounts.iter().any(|d| d.discount_type == DiscountType::Carpool);
            prop_assert!(!has_carpool || discounts.len() == 1);

            prop_assert_eq!(discounts.len(), selected_types(&codes).len());
        }
    }

    /// Output is ordered by type with no duplicates.
    #[test]
    fn prop_output_is_sorted_and_unique(
        codes in prop::collection::vec(code(), 0..8),
        fees in fee_schedule(),
    ) {
        if let Ok(discounts) = compute_discounts(&DiscountRequest::from_codes(codes), &fees) {
            prop_assert!(discounts.windows(2).all(|w| w[0].discount_type < w[1].discount_type));
        }
    }

    /// Tuition discounts never exceed term tuition and are non-negative.
    #[test]
    fn prop_tuition_discounts_bounded(
        discount_type in prop::sample::select(DiscountType::TUITION_EXCLUSIVE.to_vec()),
        fees in fee_schedule(),
    ) {
        let request = DiscountRequest::from_codes([discount_type.as_str()]);
        let discounts = compute_discounts(&request, &fees).unwrap();
        prop_assert_eq!(discounts.len(), 1);
        let amount = discounts[0].amount;
        prop_assert!(amount > Decimal::ZERO);
        prop_assert!(amount <= fees.term_tuition(TERM_MONTHS));
    }

    /// Applying a plan leaves exactly the requested types plus any carpool
    /// rows that were already active.
    #[test]
    fn prop_plan_converges_to_request(
        active_types in prop::collection::btree_set(discount_type(), 0..5),
        codes in prop::collection::vec(code(), 0..6),
        fees in fee_schedule(),
    ) {
        let Ok(requested) = compute_discounts(&DiscountRequest::from_codes(codes), &fees) else {
            return Ok(());
        };
        let active: Vec<ActiveDiscount> = active_types
            .iter()
            .map(|&t| ActiveDiscount {
                id: DiscountId::new(),
                discount_type: t,
                scope: t.scope(),
                amount: Decimal::ONE,
            })
            .collect();

        let plan = plan_reconciliation(&active, &requested);

        prop_assert_eq!(plan.updates.len() + plan.inserts.len(), requested.len());

        let mut remaining: Vec<DiscountType> = active
            .iter()
            .filter(|row| !plan.removals.contains(&row.id))
            .map(|row| row.discount_type)
            .chain(plan.inserts.iter().map(|d| d.discount_type))
            .collect();
        remaining.sort();

        let mut expected: Vec<DiscountType> = requested.iter().map(|d| d.discount_type).collect();
        if active_types.contains(&DiscountType::Carpool)
            && !expected.contains(&DiscountType::Carpool)
        {
            expected.push(DiscountType::Carpool);
        }
        expected.sort();

        prop_assert_eq!(remaining, expected);
    }
}
