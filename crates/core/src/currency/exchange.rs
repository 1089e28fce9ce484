//! Exchange rate types and logic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::CurrencyCode;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub fn new(
        from_currency: impl Into<CurrencyCode>,
        to_currency: impl Into<CurrencyCode>,
        rate: Decimal,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
        }
    }

    /// Returns true if the rate can be used for conversion.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.rate > Decimal::ZERO
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        Some(Self {
            from_currency: self.to_currency.clone(),
            to_currency: self.from_currency.clone(),
            rate: Decimal::ONE.checked_div(self.rate)?,
        })
    }

    /// Applies the rate to an amount in `from_currency`, unrounded.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.rate)
    }
}
