//! Building and validating per-participant expense shares.
//!
//! Shares are always expressed in the ledger currency and usually rounded to
//! cents, in which case they sum to the amount rounded to two decimals.
//! `SplitBuilder::equal_exact` keeps the amount's own precision instead, so
//! its shares sum to the amount itself.

pub mod builder;
pub mod error;

pub use builder::{SHARE_DECIMAL_PLACES, SplitBuilder};
pub use error::SplitError;
