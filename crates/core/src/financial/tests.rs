//! Tests for the financial aggregator.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::FinancialService;
use super::types::PaymentStatus;
use crate::discount::{DiscountRequest, compute_discounts, total_discount};
use crate::enrollment::{FeeSchedule, TERM_MONTHS};

fn fees() -> FeeSchedule {
    FeeSchedule {
        monthly_tuition: dec!(2600),
        enrollment_fee: dec!(4000),
        misc_fee: dec!(500),
        pta_fee: dec!(300),
        lms_books_fee: dec!(8000),
    }
}

#[test]
fn test_rank_1_with_partial_payment() {
    let discounts = compute_discounts(&DiscountRequest::from_codes(["rank_1"]), &fees()).unwrap();
    let summary = FinancialService::summarize(
        &fees(),
        TERM_MONTHS,
        discounts.iter().map(|d| d.amount),
        [dec!(10000)],
    );

    assert_eq!(summary.total_due, dec!(30800));
    assert_eq!(summary.total_paid, dec!(10000));
    assert_eq!(summary.remaining, dec!(20800));
    assert_eq!(summary.payment_status, PaymentStatus::Partial);
}

#[test]
fn test_fresh_enrollment_is_unpaid() {
    let summary = FinancialService::summarize(&fees(), TERM_MONTHS, Vec::new(), Vec::new());
    assert_eq!(summary.total_due, dec!(38800));
    assert_eq!(summary.remaining, summary.total_due);
    assert_eq!(summary.payment_status, PaymentStatus::Unpaid);
}

#[rstest]
#[case(dec!(100), dec!(0), PaymentStatus::Unpaid)]
#[case(dec!(100), dec!(50), PaymentStatus::Partial)]
#[case(dec!(100), dec!(100), PaymentStatus::Paid)]
#[case(dec!(100), dec!(150), PaymentStatus::Paid)]
#[case(dec!(0), dec!(0), PaymentStatus::Unpaid)]
#[case(dec!(0), dec!(1), PaymentStatus::Paid)]
fn test_payment_status(
    #[case] due: Decimal,
    #[case] paid: Decimal,
    #[case] expected: PaymentStatus,
) {
    assert_eq!(PaymentStatus::classify(due, paid), expected);
}

#[test]
fn test_overpayment_goes_negative() {
    let summary = FinancialService::from_totals(dec!(100), dec!(120));
    assert_eq!(summary.remaining, dec!(-20));
    assert_eq!(summary.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&PaymentStatus::Partial).unwrap(), "\"partial\"");
}

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Recomputing from components reproduces total_due exactly.
    #[test]
    fn prop_total_due_is_exact(
        monthly in amount(),
        enrollment in amount(),
        misc in amount(),
        pta in amount(),
        lms in amount(),
        code in prop::sample::select(vec!["rank_1", "sibling", "full_year", "scholar"]),
    ) {
        let fees = FeeSchedule {
            monthly_tuition: monthly,
            enrollment_fee: enrollment,
            misc_fee: misc,
            pta_fee: pta,
            lms_books_fee: lms,
        };
        let discounts = compute_discounts(&DiscountRequest::from_codes([code]), &fees).unwrap();
        let due =
            FinancialService::total_due(&fees, TERM_MONTHS, discounts.iter().map(|d| d.amount));

        let expected = monthly * Decimal::from(TERM_MONTHS) + enrollment + misc + pta + lms
            - total_discount(&discounts);
        prop_assert_eq!(due, expected);
        prop_assert_eq!(due + total_discount(&discounts), fees.gross_total(TERM_MONTHS));
    }

    /// remaining + total_paid == total_due for any split of payments.
    #[test]
    fn prop_remaining_balances(
        payments in prop::collection::vec(amount(), 0..6),
    ) {
        let summary =
            FinancialService::summarize(&fees(), TERM_MONTHS, Vec::new(), payments.clone());
        prop_assert_eq!(summary.remaining + summary.total_paid, summary.total_due);
        prop_assert_eq!(summary.total_paid, payments.iter().copied().sum::<Decimal>());
        if payments.is_empty() {
            prop_assert_eq!(summary.payment_status, PaymentStatus::Unpaid);
        }
    }
}
