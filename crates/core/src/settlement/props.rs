//! Property-based tests for balances and settlements.
//!
//! - Property 1: Conservation of money
//! - Property 2: Zero activity yields zero balances
//! - Property 3: Expense order does not matter
//! - Property 4: Settlements clear balances
//! - Property 5: No zero-amount transfers
//! - Property 6: Transfer count is bounded

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::{CurrencyCode, ExpenseId, GroupId, ParticipantId};

use super::balance::compute_balances;
use super::settle::{
    apply_settlements, compute_settlements, compute_settlements_with_tolerance,
};
use super::types::{Balance, SETTLEMENT_TOLERANCE};
use crate::currency::IdentityConverter;
use crate::group::types::{Expense, Participant, SplitMode};
use crate::split::SplitBuilder;

const NAMES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// The first four names are current participants; the rest only show up in
/// expense history.
fn current_participants() -> Vec<Participant> {
    NAMES[..4].iter().map(|id| Participant::new(*id, *id)).collect()
}

/// Positive cent amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// An expense whose equal splits sum exactly to its amount.
fn balanced_expense() -> impl Strategy<Value = Expense> {
    (
        positive_amount(),
        0usize..NAMES.len(),
        prop::sample::subsequence(NAMES.to_vec(), 1..=NAMES.len()),
    )
        .prop_map(|(amount, payer, members)| {
            let members: Vec<ParticipantId> =
                members.into_iter().map(ParticipantId::new).collect();
            let splits = SplitBuilder::equal(amount, &members).unwrap();
            Expense {
                id: ExpenseId::generate(),
                group_id: GroupId::new("group_props"),
                description: "Generated".to_string(),
                amount,
                currency: CurrencyCode::fallback(),
                paid_by: ParticipantId::new(NAMES[payer]),
                splits,
                split_mode: SplitMode::Equal,
                created_at: Utc::now(),
            }
        })
}

fn expenses() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(balanced_expense(), 0..20)
}

/// Balances on a cent grid that sum to zero.
fn zero_sum_cent_balances() -> impl Strategy<Value = Vec<Balance>> {
    prop::collection::vec(-100_000i64..100_000i64, 1..8).prop_map(|cents| to_zero_sum(&cents, 1))
}

/// Balances on a five-cent grid that sum to zero.
fn zero_sum_rappen_balances() -> impl Strategy<Value = Vec<Balance>> {
    prop::collection::vec(-20_000i64..20_000i64, 1..8).prop_map(|steps| to_zero_sum(&steps, 5))
}

fn to_zero_sum(steps: &[i64], step_cents: i64) -> Vec<Balance> {
    let closing: i64 = -steps.iter().sum::<i64>();
    steps
        .iter()
        .chain(std::iter::once(&closing))
        .enumerate()
        .map(|(i, v)| Balance::new(format!("P{i}"), Decimal::new(v * step_cents, 2)))
        .collect()
}

/// Arbitrary balances with four decimals, not necessarily summing to zero.
fn any_balances() -> impl Strategy<Value = Vec<Balance>> {
    prop::collection::vec(-10_000_000i64..10_000_000i64, 0..12).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Balance::new(format!("P{i}"), Decimal::new(v, 4)))
            .collect()
    })
}

fn by_participant(balances: &[Balance]) -> HashMap<String, Decimal> {
    balances
        .iter()
        .map(|b| (b.participant_id.to_string(), b.net))
        .collect()
}

fn parties(balances: &[Balance]) -> usize {
    balances
        .iter()
        .filter(|b| b.net.abs() > SETTLEMENT_TOLERANCE)
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: when every expense is fully split, nets sum to exactly zero.
    #[test]
    fn prop_conservation(expenses in expenses()) {
        let balances = compute_balances(
            &current_participants(),
            &expenses,
            &IdentityConverter,
            &CurrencyCode::fallback(),
        );
        let total: Decimal = balances.iter().map(|b| b.net).sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    /// Property 2: no expenses means every participant is at zero, whatever
    /// the converter would return.
    #[test]
    fn prop_zero_activity(rate in any::<i64>()) {
        let converter = move |_: Decimal, _: &str, _: &str| Decimal::from(rate);
        let balances = compute_balances(
            &current_participants(),
            &[],
            &converter,
            &CurrencyCode::fallback(),
        );
        prop_assert_eq!(balances.len(), 4);
        prop_assert!(balances.iter().all(|b| b.net.is_zero()));
    }

    /// Property 3: shuffling the expense history never changes a net.
    #[test]
    fn prop_order_independence(
        (original, shuffled) in expenses().prop_flat_map(|e| (Just(e.clone()), Just(e).prop_shuffle()))
    ) {
        let ledger = CurrencyCode::fallback();
        let first = compute_balances(&current_participants(), &original, &IdentityConverter, &ledger);
        let second = compute_balances(&current_participants(), &shuffled, &IdentityConverter, &ledger);
        prop_assert_eq!(by_participant(&first), by_participant(&second));
    }

    /// Property 4: on a five-cent grid every balance is cleared exactly.
    #[test]
    fn prop_settlement_clears_rappen_balances(balances in zero_sum_rappen_balances()) {
        let settlements = compute_settlements(&balances);
        let adjusted = apply_settlements(&balances, &settlements);
        prop_assert!(adjusted.iter().all(|b| b.net.is_zero()), "{:?}", adjusted);
    }

    /// Property 4b: on a cent grid transfers conserve money and leave no
    /// participant further from zero than one cent per party.
    #[test]
    fn prop_settlement_residual_is_bounded(balances in zero_sum_cent_balances()) {
        let settlements = compute_settlements(&balances);
        let adjusted = apply_settlements(&balances, &settlements);
        let bound = SETTLEMENT_TOLERANCE * Decimal::from(balances.len());

        prop_assert_eq!(adjusted.len(), balances.len());
        prop_assert_eq!(adjusted.iter().map(|b| b.net).sum::<Decimal>(), Decimal::ZERO);
        prop_assert!(adjusted.iter().all(|b| b.net.abs() <= bound), "{:?}", adjusted);
    }

    /// Property 5: every transfer is at least one cent.
    #[test]
    fn prop_no_zero_emission(balances in any_balances()) {
        for settlement in compute_settlements(&balances) {
            prop_assert!(settlement.amount >= SETTLEMENT_TOLERANCE);
            prop_assert!(settlement.from_participant_id != settlement.to_participant_id);
        }
    }

    /// Property 5 holds for any configured tolerance, including zero.
    #[test]
    fn prop_no_zero_emission_any_tolerance(
        balances in any_balances(),
        tolerance_mills in 0i64..20,
    ) {
        let tolerance = Decimal::new(tolerance_mills, 3);
        for settlement in compute_settlements_with_tolerance(&balances, tolerance) {
            prop_assert!(settlement.amount > Decimal::ZERO, "{:?}", settlement);
        }
    }

    /// Property 6: at most `creditors + debtors - 1` transfers.
    #[test]
    fn prop_boundedness(balances in any_balances()) {
        let settlements = compute_settlements(&balances);
        prop_assert!(settlements.len() <= parties(&balances).saturating_sub(1));
    }

    /// Same input, same output.
    #[test]
    fn prop_deterministic(balances in any_balances()) {
        prop_assert_eq!(compute_settlements(&balances), compute_settlements(&balances));
    }
}
