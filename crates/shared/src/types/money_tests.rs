use super::*;
use rust_decimal_macros::dec;

#[test]
fn test_format_whole_amount() {
    assert_eq!(format_amount(dec!(30800)), "30800.00");
}

#[test]
fn test_format_keeps_cents() {
    assert_eq!(format_amount(dec!(1300.5)), "1300.50");
    assert_eq!(format_amount(dec!(0.01)), "0.01");
}

#[test]
fn test_format_rounds_half_away_from_zero() {
    assert_eq!(format_amount(dec!(10.005)), "10.01");
    assert_eq!(format_amount(dec!(10.004)), "10.00");
    assert_eq!(format_amount(dec!(-10.005)), "-10.01");
}

#[test]
fn test_round_for_display_does_not_touch_exact_values() {
    assert_eq!(round_for_display(dec!(1300)), dec!(1300.00));
    assert_eq!(round_for_display(dec!(13000.00)), dec!(13000));
}

#[test]
fn test_format_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
}
