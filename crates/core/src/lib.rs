//! Core settlement logic for TripSplit.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Callers hand in plain data and a currency converter and get plain data back.
//!
//! # Modules
//!
//! - `currency` - Exchange rates and amount conversion
//! - `split` - Per-participant expense shares
//! - `group` - Groups, participants, and expenses
//! - `settlement` - Net balances and settlement transfers

pub mod currency;
pub mod group;
pub mod settlement;
pub mod split;

pub use currency::{CurrencyConverter, IdentityConverter, StaticRates};
pub use group::{Expense, ExpenseSplit, Group, GroupError, Participant, SplitMode};
pub use settlement::{
    Balance, Settlement, SettlementPlan, compute_balances, compute_settlements,
};
