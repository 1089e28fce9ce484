//! Net balances and the transfers that settle them.
//!
//! - `balance` - Paid, owed, and net totals per participant
//! - `settle` - Greedy creditor/debtor matching
//! - `plan` - Both steps over a full expense history

pub mod balance;
pub mod plan;
pub mod settle;
pub mod types;

#[cfg(test)]
mod props;
#[cfg(test)]
mod scenarios;

pub use balance::{compute_balances, compute_ledger};
pub use plan::{plan, plan_with_tolerance};
pub use settle::{apply_settlements, compute_settlements, compute_settlements_with_tolerance, round2};
pub use types::{Balance, ParticipantLedger, SETTLEMENT_TOLERANCE, Settlement, SettlementPlan};
