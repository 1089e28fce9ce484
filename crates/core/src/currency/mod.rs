//! Multi-currency handling and exchange rates.

pub mod allocation;
pub mod conversion;
pub mod exchange;
pub mod rates;


pub use allocation::AllocationUtil;
pub use conversion::{
    CONVERSION_DECIMAL_PLACES, CurrencyConverter, IdentityConverter, convert_amount, round_dp,
    same_currency,
};
pub use exchange::ExchangeRate;
pub use rates::{Conversion, RateLookupMethod, RateTable, StaticRates};
