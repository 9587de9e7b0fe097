//! Discount policy.
//!
//! - Rule engine: validates requested codes and derives concrete amounts
//! - Reconciliation: diffs requested discounts against persisted rows

pub mod error;
pub mod reconcile;
pub mod rules;
pub mod types;

#[cfg(test)]
mod props;

pub use error::DiscountError;
pub use reconcile::{ActiveDiscount, ReconcilePlan, plan_reconciliation};
pub use rules::{
    SCHOLAR_RATE, SIBLING_RATE, compute_discounts, discount_amount, selected_types,
    total_discount, validate_combination,
};
pub use types::{ComputedDiscount, DiscountRequest, DiscountScope, DiscountType};
