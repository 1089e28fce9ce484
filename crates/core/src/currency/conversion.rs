//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Converted amounts are rounded to 4 decimal places
//! - Use banker's rounding (round half to even)
//! - Same-currency conversion returns the amount untouched
//!
//! The balance calculator only sees the [`CurrencyConverter`] trait, so rates
//! may come from a static table, a live feed, or a test closure.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use tripsplit_shared::types::CurrencyCode;

/// Decimal places kept on converted amounts.
pub const CONVERSION_DECIMAL_PLACES: u32 = 4;

/// Converts an amount from one currency into another.
///
/// Implementations must be total: unknown currency pairs fall back to a
/// best-effort result (identity at worst) and never panic, because the balance
/// calculator sums converted amounts unconditionally. Codes are compared
/// case-insensitively after trimming.
pub trait CurrencyConverter {
    /// Converts `amount` from `from` into `to`.
    fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal;
}

impl<F> CurrencyConverter for F
where
    F: Fn(Decimal, &str, &str) -> Decimal,
{
    fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        self(amount, from, to)
    }
}

/// Converter that never changes an amount.
///
/// Useful when every expense is already recorded in the ledger currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl CurrencyConverter for IdentityConverter {
    fn convert(&self, amount: Decimal, _from: &str, _to: &str) -> Decimal {
        amount
    }
}

/// Returns true if both codes name the same currency after normalization.
#[must_use]
pub fn same_currency(a: &str, b: &str) -> bool {
    CurrencyCode::new(a) == CurrencyCode::new(b)
}

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
/// Returns `None` if the multiplication overflows.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .map(|converted| round_dp(converted, decimal_places))
}

/// Rounds a value using banker's rounding (MidpointNearestEven).
#[must_use]
pub fn round_dp(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
