//! Static exchange rate tables.
//!
//! A [`RateTable`] holds rates quoted against one base currency
//! (1 base = rate quote). [`StaticRates`] keeps one table per base and picks
//! the table whose base is the conversion target, so a conversion into the
//! ledger currency divides by that table's rate for the source currency.
//!
//! Lookup order for `from -> to`:
//! 1. Same currency: amount unchanged
//! 2. Table based on `to`: direct, inverse, or triangulated through the base
//! 3. Table based on `from`: direct rate `from -> to`
//! 4. Nothing usable: amount unchanged (identity fallback)

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use tripsplit_shared::types::CurrencyCode;

use super::conversion::{CONVERSION_DECIMAL_PLACES, CurrencyConverter, convert_amount, round_dp};
use super::exchange::ExchangeRate;

/// Built-in rates: (base, [(quote, mantissa, scale)]).
const BUILTIN_RATES: [(&str, [(&str, i64, u32); 4]); 5] = [
    ("CHF", [("EUR", 103, 2), ("USD", 102, 2), ("JPY", 166, 0), ("GBP", 84, 2)]),
    ("EUR", [("CHF", 97, 2), ("USD", 99, 2), ("JPY", 161, 0), ("GBP", 82, 2)]),
    ("USD", [("CHF", 98, 2), ("EUR", 101, 2), ("JPY", 156, 0), ("GBP", 80, 2)]),
    ("JPY", [("CHF", 6, 3), ("EUR", 62, 4), ("USD", 64, 4), ("GBP", 51, 4)]),
    ("GBP", [("CHF", 119, 2), ("EUR", 122, 2), ("USD", 125, 2), ("JPY", 195, 0)]),
];

/// How a conversion obtained its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RateLookupMethod {
    /// Source and target are the same currency.
    Identity,
    /// Source is the table base (amount * rate).
    Direct,
    /// Target is the table base (amount / rate).
    Inverse,
    /// Converted through the table base.
    Triangulated,
    /// No usable rate; the amount passed through unchanged.
    Fallback,
}

/// Result of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount.
    pub amount: Decimal,
    /// How the rate was obtained.
    pub method: RateLookupMethod,
}

impl Conversion {
    const fn unchanged(amount: Decimal, method: RateLookupMethod) -> Self {
        Self { amount, method }
    }
}

/// Rates quoted against a single base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Creates an empty table for `base`.
    #[must_use]
    pub fn new(base: impl Into<CurrencyCode>) -> Self {
        Self {
            base: base.into(),
            rates: BTreeMap::new(),
        }
    }

    /// Builder form of [`RateTable::set_rate`].
    #[must_use]
    pub fn with_rate(mut self, quote: impl Into<CurrencyCode>, rate: Decimal) -> Self {
        self.set_rate(quote, rate);
        self
    }

    /// Sets `1 base = rate quote`, replacing any previous rate.
    pub fn set_rate(&mut self, quote: impl Into<CurrencyCode>, rate: Decimal) {
        self.rates.insert(quote.into(), rate);
    }

    /// Inserts an exchange rate that touches the base on either side.
    ///
    /// Rates quoted the other way round (quote -> base) are inverted.
    /// Returns false if the rate does not involve the base or is not positive.
    pub fn insert(&mut self, rate: &ExchangeRate) -> bool {
        if !rate.is_usable() {
            return false;
        }
        if rate.from_currency == self.base {
            self.rates.insert(rate.to_currency.clone(), rate.rate);
            return true;
        }
        if rate.to_currency == self.base {
            if let Some(inverse) = rate.inverse() {
                self.rates.insert(inverse.to_currency, inverse.rate);
                return true;
            }
        }
        false
    }

    /// The base currency.
    #[must_use]
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Usable rate for `quote` (1 base = rate quote). The base itself is 1.
    #[must_use]
    pub fn rate(&self, quote: &CurrencyCode) -> Option<Decimal> {
        if *quote == self.base {
            return Some(Decimal::ONE);
        }
        self.rates
            .get(quote)
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
    }

    /// All rates in the table as base -> quote exchange rates.
    pub fn exchange_rates(&self) -> impl Iterator<Item = ExchangeRate> + '_ {
        self.rates
            .iter()
            .map(|(quote, rate)| ExchangeRate::new(self.base.clone(), quote.clone(), *rate))
    }

    /// Converts through this table's base.
    #[must_use]
    pub fn convert(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> Conversion {
        if from == to {
            return Conversion::unchanged(amount, RateLookupMethod::Identity);
        }

        let converted = if *from == self.base {
            self.rate(to)
                .and_then(|rate| amount.checked_mul(rate))
                .map(|value| (value, RateLookupMethod::Direct))
        } else if *to == self.base {
            self.rate(from)
                .and_then(|rate| amount.checked_div(rate))
                .map(|value| (value, RateLookupMethod::Inverse))
        } else {
            match (self.rate(from), self.rate(to)) {
                (Some(source), Some(target)) => amount
                    .checked_div(source)
                    .and_then(|in_base| in_base.checked_mul(target))
                    .map(|value| (value, RateLookupMethod::Triangulated)),
                _ => None,
            }
        };

        match converted {
            Some((value, method)) => Conversion {
                amount: round_dp(value, CONVERSION_DECIMAL_PLACES),
                method,
            },
            None => Conversion::unchanged(amount, RateLookupMethod::Fallback),
        }
    }
}

/// A set of rate tables keyed by base currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRates {
    tables: BTreeMap<CurrencyCode, RateTable>,
}

impl StaticRates {
    /// Creates a set without any tables (every conversion is identity).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in CHF/EUR/USD/JPY/GBP table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rates = Self::empty();
        for (base, quotes) in BUILTIN_RATES {
            let table = quotes
                .iter()
                .fold(RateTable::new(base), |table, (quote, mantissa, scale)| {
                    table.with_rate(*quote, Decimal::new(*mantissa, *scale))
                });
            rates.insert_table(table);
        }
        rates
    }

    /// Layers configured overrides (base -> quote -> rate) over the current tables.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, BTreeMap<String, Decimal>>) -> Self {
        for (base, quotes) in overrides {
            for (quote, rate) in quotes {
                self.set_rate(base.as_str(), quote.as_str(), *rate);
            }
        }
        self
    }

    /// Adds or replaces the table for its base.
    pub fn insert_table(&mut self, table: RateTable) {
        self.tables.insert(table.base().clone(), table);
    }

    /// Sets `1 base = rate quote`, creating the base table if needed.
    pub fn set_rate(&mut self, base: &str, quote: &str, rate: Decimal) {
        let base = CurrencyCode::new(base);
        self.tables
            .entry(base.clone())
            .or_insert_with(|| RateTable::new(base))
            .set_rate(quote, rate);
    }

    /// The table for `base`, if any.
    #[must_use]
    pub fn table(&self, base: &str) -> Option<&RateTable> {
        self.tables.get(&CurrencyCode::new(base))
    }

    /// Direct static rate `from -> to` from the `from` table.
    #[must_use]
    pub fn static_rate(&self, from: &str, to: &str) -> Option<Decimal> {
        let to = CurrencyCode::new(to);
        self.table(from).and_then(|table| table.rate(&to))
    }

    /// Converts `amount` and reports how the rate was found.
    #[must_use]
    pub fn lookup(&self, amount: Decimal, from: &str, to: &str) -> Conversion {
        let from = CurrencyCode::new(from);
        let to = CurrencyCode::new(to);
        if from == to {
            return Conversion::unchanged(amount, RateLookupMethod::Identity);
        }

        if let Some(table) = self.tables.get(&to) {
            let conversion = table.convert(amount, &from, &to);
            if conversion.method != RateLookupMethod::Fallback {
                return conversion;
            }
        }

        let direct = self
            .tables
            .get(&from)
            .and_then(|table| table.rate(&to))
            .and_then(|rate| convert_amount(amount, rate, CONVERSION_DECIMAL_PLACES));
        if let Some(converted) = direct {
            return Conversion {
                amount: converted,
                method: RateLookupMethod::Direct,
            };
        }

        debug!(%from, %to, "no exchange rate for currency pair, passing amount through");
        Conversion::unchanged(amount, RateLookupMethod::Fallback)
    }
}

impl CurrencyConverter for StaticRates {
    fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        self.lookup(amount, from, to).amount
    }
}
