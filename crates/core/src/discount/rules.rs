//! Discount rule engine.
//!
//! Pure and deterministic: the same request and fee schedule always yield
//! the same discounts, in [`DiscountType`] order.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use super::error::DiscountError;
use super::types::{ComputedDiscount, DiscountRequest, DiscountType};
use crate::enrollment::{FeeSchedule, TERM_MONTHS};

/// Sibling discount rate applied to term tuition (5%).
pub const SIBLING_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Scholar discount rate applied to term tuition (50%).
pub const SCHOLAR_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Resolves requested codes to known discount types.
///
/// Matching is case-insensitive, duplicates collapse, and unknown codes are
/// dropped so payloads from newer clients are still accepted.
#[must_use]
pub fn selected_types<S: AsRef<str>>(codes: &[S]) -> BTreeSet<DiscountType> {
    codes
        .iter()
        .filter_map(|code| DiscountType::parse(code.as_ref()))
        .collect()
}

/// Enforces the mutual-exclusion policy.
///
/// At most one of scholar, sibling, and full_year; carpool only on its own.
/// Rank 1 combines with anything except carpool.
pub fn validate_combination(selected: &BTreeSet<DiscountType>) -> Result<(), DiscountError> {
    let mut exclusive = selected.iter().copied().filter(|t| t.is_tuition_exclusive());
    if let (Some(first), Some(second)) = (exclusive.next(), exclusive.next()) {
        return Err(DiscountError::ExclusiveTuitionDiscounts { first, second });
    }

    if selected.contains(&DiscountType::Carpool) && selected.len() > 1 {
        return Err(DiscountError::CarpoolNotExclusive);
    }

    Ok(())
}

/// Amount of a single discount for the given fee schedule.
#[must_use]
pub fn discount_amount(
    discount_type: DiscountType,
    fees: &FeeSchedule,
    carpool_amount: Option<Decimal>,
) -> Decimal {
    let term_tuition = fees.term_tuition(TERM_MONTHS);
    match discount_type {
        DiscountType::Rank1 => fees.lms_books_fee,
        DiscountType::Sibling => term_tuition * SIBLING_RATE,
        DiscountType::FullYear => fees.monthly_tuition,
        DiscountType::Scholar => term_tuition * SCHOLAR_RATE,
        DiscountType::Carpool => carpool_amount.unwrap_or(Decimal::ZERO),
    }
}

/// Validates a discount request and computes the concrete discounts.
///
/// # Errors
///
/// Returns `DiscountError` if the selection violates the exclusion policy or
/// the carpool amount is negative. Nothing is computed in that case.
pub fn compute_discounts(
    request: &DiscountRequest,
    fees: &FeeSchedule,
) -> Result<Vec<ComputedDiscount>, DiscountError> {
    let selected = selected_types(&request.codes);
    validate_combination(&selected)?;

    if selected.contains(&DiscountType::Carpool)
        && request
            .carpool_amount
            .is_some_and(|amount| amount < Decimal::ZERO)
    {
        return Err(DiscountError::NegativeCarpoolAmount);
    }

    Ok(selected
        .into_iter()
        .map(|discount_type| ComputedDiscount {
            discount_type,
            scope: discount_type.scope(),
            amount: discount_amount(discount_type, fees, request.carpool_amount),
        })
        .collect())
}

/// Sum of discount amounts.
#[must_use]
pub fn total_discount(discounts: &[ComputedDiscount]) -> Decimal {
    discounts.iter().map(|d| d.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::types::DiscountScope;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn fees() -> FeeSchedule {
        FeeSchedule {
            monthly_tuition: dec!(2600),
            enrollment_fee: dec!(4000),
            misc_fee: dec!(500),
            pta_fee: dec!(300),
            lms_books_fee: dec!(8000),
        }
    }

    fn compute(codes: &[&str]) -> Result<Vec<ComputedDiscount>, DiscountError> {
        compute_discounts(&DiscountRequest::from_codes(codes.iter().copied()), &fees())
    }

    #[test]
    fn test_rates() {
        assert_eq!(SIBLING_RATE, dec!(0.05));
        assert_eq!(SCHOLAR_RATE, dec!(0.50));
    }

    #[rstest]
    #[case("rank_1", DiscountScope::LmsBooks, dec!(8000))]
    #[case("sibling", DiscountScope::Tuition, dec!(1300))]
    #[case("full_year", DiscountScope::Tuition, dec!(2600))]
    #[case("scholar", DiscountScope::Tuition, dec!(13000))]
    #[case("carpool", DiscountScope::Carpool, dec!(0))]
    fn test_single_discount_amounts(
        #[case] code: &str,
        #[case] scope: DiscountScope,
        #[case] amount: Decimal,
    ) {
        let discounts = compute(&[code]).unwrap();
        assert_eq!(discounts.len(), 1);
        assert_eq!(discounts[0].discount_type.as_str(), code);
        assert_eq!(discounts[0].scope, scope);
        assert_eq!(discounts[0].amount, amount);
    }

    #[test]
    fn test_codes_are_case_insensitive_and_deduplicated() {
        let discounts = compute(&["RANK_1", "rank_1", " Sibling "]).unwrap();
        let types: Vec<_> = discounts.iter().map(|d| d.discount_type).collect();
        assert_eq!(types, vec![DiscountType::Rank1, DiscountType::Sibling]);
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let discounts = compute(&["early_bird", "rank_1"]).unwrap();
        assert_eq!(discounts.len(), 1);
        assert_eq!(discounts[0].discount_type, DiscountType::Rank1);

        assert!(compute(&["early_bird"]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_request() {
        assert!(compute(&[]).unwrap().is_empty());
    }

    #[rstest]
    #[case(&["scholar", "sibling"])]
    #[case(&["scholar", "full_year"])]
    #[case(&["sibling", "full_year"])]
    #[case(&["sibling", "full_year", "scholar"])]
    #[case(&["rank_1", "sibling", "scholar"])]
    fn test_exclusive_tuition_discounts_rejected(#[case] codes: &[&str]) {
        let err = compute(codes).unwrap_err();
        assert!(matches!(err, DiscountError::ExclusiveTuitionDiscounts { .. }));
        assert!(err.is_invalid_combination());
    }

    #[rstest]
    #[case(&["carpool", "rank_1"])]
    #[case(&["carpool", "sibling"])]
    #[case(&["carpool", "scholar"])]
    #[case(&["carpool", "full_year"])]
    fn test_carpool_with_anything_rejected(#[case] codes: &[&str]) {
        assert_eq!(compute(codes).unwrap_err(), DiscountError::CarpoolNotExclusive);
    }

    #[rstest]
    #[case(&["rank_1", "scholar"])]
    #[case(&["rank_1", "sibling"])]
    #[case(&["rank_1", "full_year"])]
    fn test_rank_1_combines_with_one_tuition_discount(#[case] codes: &[&str]) {
        let discounts = compute(codes).unwrap();
        assert_eq!(discounts.len(), 2);
    }

    #[test]
    fn test_carpool_amount_passes_through() {
        let request = DiscountRequest {
            codes: vec!["carpool".to_string()],
            carpool_amount: Some(dec!(1500.50)),
        };
        let discounts = compute_discounts(&request, &fees()).unwrap();
        assert_eq!(discounts[0].amount, dec!(1500.50));
    }

    #[test]
    fn test_carpool_amount_ignored_when_carpool_not_requested() {
        let request = DiscountRequest {
            codes: vec!["rank_1".to_string()],
            carpool_amount: Some(dec!(-5)),
        };
        let discounts = compute_discounts(&request, &fees()).unwrap();
        assert_eq!(discounts.len(), 1);
    }

    #[test]
    fn test_negative_carpool_amount_rejected() {
        let request = DiscountRequest {
            codes: vec!["carpool".to_string()],
            carpool_amount: Some(dec!(-1)),
        };
        assert_eq!(
            compute_discounts(&request, &fees()).unwrap_err(),
            DiscountError::NegativeCarpoolAmount
        );
    }

    #[test]
    fn test_fractional_tuition_is_exact() {
        let mut fees = fees();
        fees.monthly_tuition = dec!(2333.33);
        let request = DiscountRequest::from_codes(["sibling"]);
        let discounts = compute_discounts(&request, &fees).unwrap();
        assert_eq!(discounts[0].amount, dec!(1166.665));
    }

    #[test]
    fn test_total_discount() {
        let discounts = compute(&["rank_1", "scholar"]).unwrap();
        assert_eq!(total_discount(&discounts), dec!(21000));
    }
}
