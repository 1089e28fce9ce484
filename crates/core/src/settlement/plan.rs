//! End-to-end settlement planning for an expense history.

use rust_decimal::Decimal;
use tracing::info;
use tripsplit_shared::types::CurrencyCode;

use super::balance::compute_ledger;
use super::settle::compute_settlements_with_tolerance;
use super::types::{Balance, SETTLEMENT_TOLERANCE, SettlementPlan};
use crate::currency::CurrencyConverter;
use crate::group::types::{Expense, Participant};

/// Builds a settlement plan with the default one-cent tolerance.
pub fn plan<C>(
    participants: &[Participant],
    expenses: &[Expense],
    converter: &C,
    ledger_currency: &CurrencyCode,
) -> SettlementPlan
where
    C: CurrencyConverter + ?Sized,
{
    plan_with_tolerance(
        participants,
        expenses,
        converter,
        ledger_currency,
        SETTLEMENT_TOLERANCE,
    )
}

/// Builds a settlement plan.
pub fn plan_with_tolerance<C>(
    participants: &[Participant],
    expenses: &[Expense],
    converter: &C,
    ledger_currency: &CurrencyCode,
    tolerance: Decimal,
) -> SettlementPlan
where
    C: CurrencyConverter + ?Sized,
{
    let ledger = compute_ledger(participants, expenses, converter, ledger_currency);
    let balances: Vec<Balance> = ledger.iter().cloned().map(Balance::from).collect();
    let settlements = compute_settlements_with_tolerance(&balances, tolerance);

    let plan = SettlementPlan {
        currency: ledger_currency.clone(),
        ledger,
        balances,
        settlements,
    };

    info!(
        currency = %plan.currency,
        participants = plan.balances.len(),
        expenses = expenses.len(),
        settlements = plan.settlements.len(),
        total = %plan.total_transferred(),
        "Settlement plan ready"
    );

    plan
}
