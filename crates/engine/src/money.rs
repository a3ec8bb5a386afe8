//! Currency rounding.
//!
//! Every monetary value the engine hands to callers is rounded to 2 decimal
//! places with half-away-from-zero rounding (the scaled-integer rule
//! `round(value * 100) / 100`), never banker's rounding. Intermediate values
//! stay unrounded; only boundary values go through [`round_cents`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to currency minor-unit precision (2 decimals, half away from zero).
///
/// ```rust
/// use rust_decimal_macros::dec;
///
/// assert_eq!(engine::round_cents(dec!(1.005)), dec!(1.01));
/// assert_eq!(engine::round_cents(dec!(-1.005)), dec!(-1.01));
/// ```
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(2.675)), dec!(2.68));
        assert_eq!(round_cents(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn leaves_two_decimal_values_unchanged() {
        assert_eq!(round_cents(dec!(386.81)), dec!(386.81));
        assert_eq!(round_cents(dec!(0)), dec!(0.00));
    }

    #[test]
    fn truncates_below_midpoint() {
        assert_eq!(round_cents(dec!(1.0049)), dec!(1.00));
        assert_eq!(round_cents(dec!(386.80688)), dec!(386.81));
    }
}
