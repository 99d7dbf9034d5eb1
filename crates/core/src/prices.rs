//! Prices

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places prices are stored and compared with.
pub const CURRENCY_PRECISION: u32 = 2;

/// Largest drift between an expected and a live price that still counts as equal.
pub const PRICE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round a price to currency precision using round-half-up.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a price at zero and round it to currency precision.
pub fn clamp_price(value: Decimal) -> Decimal {
    round_price(value.max(Decimal::ZERO))
}

/// Whether two prices are within [`PRICE_TOLERANCE`] of each other.
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= PRICE_TOLERANCE
}

/// Whether a price is zero or close enough to zero to be treated as unset.
pub fn is_near_zero(value: Decimal) -> bool {
    value.abs() <= PRICE_TOLERANCE
}

/// A compare-at price only counts as set when it is present and positive.
pub fn effective_compare_at(compare_at: Option<Decimal>) -> Option<Decimal> {
    compare_at.filter(|value| value.is_sign_positive() && !value.is_zero())
}
