//! Currency helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; rounding happens only when an
//! amount is rendered for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits shown for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to the display scale (half away from zero).
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// Formats an amount for display, always with two fractional digits.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    round_for_display(amount).to_string()
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
