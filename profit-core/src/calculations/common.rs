//! Rounding and clamping shared by every calculation step.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for currency amounts and margins.
pub const CENTS_DP: u32 = 2;

/// Rounds to whole cents, half a cent going away from zero.
///
/// Decimal arithmetic is exact, so a value sitting on the half-cent is
/// always seen as such and never drifts to the wrong side.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use profit_core::calculations::common::round_cents;
///
/// assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
/// assert_eq!(round_cents(dec!(3.171)), dec!(3.17));
/// assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero if it is negative.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
