//! Amount allocation using the Largest Remainder Method.
//!
//! Splitting an expense into per-participant shares must not lose or invent
//! cents: the allocations always sum exactly to the total rounded to the
//! target precision.
//!
//! 1. Round the total to the target precision
//! 2. Round every exact allocation toward zero
//! 3. Hand the leftover units, one each, to the largest fractional parts

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;

use super::conversion::round_dp;

/// Allocation utility for distributing amounts.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocates `total` equally across `count` recipients.
    ///
    /// Earlier recipients receive the leftover units, so 100 / 3 at two
    /// decimals is `[33.34, 33.33, 33.33]`.
    #[must_use]
    pub fn allocate_equal(total: Decimal, count: usize, decimal_places: u32) -> Vec<Decimal> {
        if count == 0 {
            return Vec::new();
        }

        let total = round_dp(total, decimal_places);
        let count_dec = Decimal::from(count);
        let exact = total / count_dec;
        let base = exact.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero);
        let unit = Decimal::new(1, decimal_places);

        let extra = Self::leftover_units(total - base * count_dec, unit);

        (0..count)
            .map(|i| if i < extra { base + unit } else { base })
            .collect()
    }

    /// Allocates `total` by percentages (which should sum to 100).
    ///
    /// Leftover units go to the largest fractional remainders; ties keep
    /// input order.
    #[must_use]
    pub fn allocate_by_percentages(
        total: Decimal,
        percentages: &[Decimal],
        decimal_places: u32,
    ) -> Vec<Decimal> {
        if percentages.is_empty() {
            return Vec::new();
        }

        let total = round_dp(total, decimal_places);
        let unit = Decimal::new(1, decimal_places);

        let exact: Vec<Decimal> = percentages
            .iter()
            .map(|p| total * *p / Decimal::ONE_HUNDRED)
            .collect();
        let mut rounded: Vec<Decimal> = exact
            .iter()
            .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
            .collect();

        let allocated: Decimal = rounded.iter().copied().sum();
        let extra = Self::leftover_units(total - allocated, unit);
        if extra == 0 {
            return rounded;
        }

        let mut remainders: Vec<(usize, Decimal)> = exact
            .iter()
            .zip(&rounded)
            .map(|(e, r)| *e - *r)
            .enumerate()
            .collect();
        remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        for (idx, _) in remainders.into_iter().take(extra) {
            rounded[idx] += unit;
        }

        rounded
    }

    fn leftover_units(remainder: Decimal, unit: Decimal) -> usize {
        (remainder / unit)
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .to_usize()
            .unwrap_or(0)
    }
}
