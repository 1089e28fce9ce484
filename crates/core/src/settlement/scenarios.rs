//! End-to-end settlement scenarios.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tripsplit_shared::types::{CurrencyCode, ExpenseId, GroupId, ParticipantId};

use super::balance::compute_balances;
use super::settle::{apply_settlements, compute_settlements};
use super::types::{Balance, Settlement};
use crate::currency::{IdentityConverter, StaticRates};
use crate::group::types::{Expense, ExpenseSplit, Participant, SplitMode};

fn participants(ids: &[&str]) -> Vec<Participant> {
    ids.iter().map(|id| Participant::new(*id, *id)).collect()
}

fn expense(
    amount: Decimal,
    currency: &str,
    paid_by: &str,
    splits: &[(&str, Decimal)],
    split_mode: SplitMode,
) -> Expense {
    Expense {
        id: ExpenseId::generate(),
        group_id: GroupId::new("group_trip"),
        description: "Trip".to_string(),
        amount,
        currency: CurrencyCode::new(currency),
        paid_by: ParticipantId::new(paid_by),
        splits: splits
            .iter()
            .map(|(id, share)| ExpenseSplit::new(*id, *share))
            .collect(),
        split_mode,
        created_at: Utc::now(),
    }
}

fn chf() -> CurrencyCode {
    CurrencyCode::new("CHF")
}

fn nets(balances: &[Balance]) -> Vec<(&str, Decimal)> {
    balances
        .iter()
        .map(|b| (b.participant_id.as_str(), b.net))
        .collect()
}

fn transfers(settlements: &[Settlement]) -> Vec<(&str, &str, Decimal)> {
    settlements
        .iter()
        .map(|s| {
            (
                s.from_participant_id.as_str(),
                s.to_participant_id.as_str(),
                s.amount,
            )
        })
        .collect()
}

#[test]
fn test_simple_two_person_split() {
    let expenses = vec![expense(
        dec!(100),
        "CHF",
        "A",
        &[("A", dec!(50)), ("B", dec!(50))],
        SplitMode::Equal,
    )];

    let balances = compute_balances(&participants(&["A", "B"]), &expenses, &IdentityConverter, &chf());
    assert_eq!(nets(&balances), vec![("A", dec!(50)), ("B", dec!(-50))]);

    let settlements = compute_settlements(&balances);
    assert_eq!(transfers(&settlements), vec![("B", "A", dec!(50))]);
}

#[test]
fn test_three_person_uneven_rounding() {
    let expenses = vec![expense(
        dec!(100),
        "CHF",
        "A",
        &[("A", dec!(33.33)), ("B", dec!(33.33)), ("C", dec!(33.34))],
        SplitMode::Equal,
    )];

    let balances = compute_balances(
        &participants(&["A", "B", "C"]),
        &expenses,
        &IdentityConverter,
        &chf(),
    );
    assert_eq!(
        nets(&balances),
        vec![("A", dec!(66.67)), ("B", dec!(-33.33)), ("C", dec!(-33.34))]
    );

    let settlements = compute_settlements(&balances);
    assert_eq!(
        transfers(&settlements),
        vec![("B", "A", dec!(33.33)), ("C", "A", dec!(33.34))]
    );
    let to_a: Decimal = settlements.iter().map(|s| s.amount).sum();
    assert_eq!(to_a, dec!(66.67));
}

#[test]
fn test_multi_currency_uses_converted_amount() {
    let expenses = vec![expense(
        dec!(100),
        "EUR",
        "A",
        &[("A", dec!(48.55)), ("B", dec!(48.54))],
        SplitMode::Equal,
    )];
    let converter = |amount: Decimal, from: &str, to: &str| {
        if from == "EUR" && to == "CHF" {
            amount * dec!(0.9709)
        } else {
            amount
        }
    };

    let balances = compute_balances(&participants(&["A", "B"]), &expenses, &converter, &chf());
    assert_eq!(nets(&balances), vec![("A", dec!(48.54)), ("B", dec!(-48.54))]);
    assert_eq!(
        transfers(&compute_settlements(&balances)),
        vec![("B", "A", dec!(48.54))]
    );
}

#[test]
fn test_multi_currency_with_static_rates() {
    let expenses = vec![expense(
        dec!(100),
        "EUR",
        "A",
        &[("A", dec!(48.55)), ("B", dec!(48.54))],
        SplitMode::Equal,
    )];

    let balances = compute_balances(
        &participants(&["A", "B"]),
        &expenses,
        &StaticRates::builtin(),
        &chf(),
    );
    // 100 / 1.03 = 97.0874 CHF credited, not the raw 100
    assert_eq!(balances[0].net, dec!(97.0874) - dec!(48.55));
    assert_eq!(
        transfers(&compute_settlements(&balances)),
        vec![("B", "A", dec!(48.54))]
    );
}

#[test]
fn test_already_settled() {
    let balances = vec![
        Balance::new("A", dec!(0.01)),
        Balance::new("B", dec!(-0.004)),
        Balance::new("C", dec!(-0.006)),
    ];
    assert!(compute_settlements(&balances).is_empty());
}

#[test]
fn test_single_payer_without_splits() {
    let single = expense(dec!(40), "CHF", "A", &[], SplitMode::SinglePayer);
    let group = participants(&["A", "B"]);

    let balances = compute_balances(&group, std::slice::from_ref(&single), &IdentityConverter, &chf());
    assert_eq!(nets(&balances), vec![("A", dec!(40)), ("B", dec!(0))]);
    assert!(compute_settlements(&balances).is_empty());

    // Only other expenses offset it
    let dinner = expense(
        dec!(100),
        "CHF",
        "B",
        &[("A", dec!(50)), ("B", dec!(50))],
        SplitMode::Equal,
    );
    let balances = compute_balances(&group, &[single, dinner], &IdentityConverter, &chf());
    assert_eq!(nets(&balances), vec![("A", dec!(-10)), ("B", dec!(50))]);
    assert_eq!(
        transfers(&compute_settlements(&balances)),
        vec![("A", "B", dec!(10))]
    );
}

#[test]
fn test_stale_participant_is_kept() {
    let expenses = vec![expense(
        dec!(60),
        "CHF",
        "Z",
        &[("A", dec!(30)), ("Z", dec!(30))],
        SplitMode::Equal,
    )];

    let balances = compute_balances(&participants(&["A"]), &expenses, &IdentityConverter, &chf());
    assert_eq!(nets(&balances), vec![("A", dec!(-30)), ("Z", dec!(30))]);

    let settlements = compute_settlements(&balances);
    assert_eq!(transfers(&settlements), vec![("A", "Z", dec!(30))]);
    assert!(
        apply_settlements(&balances, &settlements)
            .iter()
            .all(|b| b.net.is_zero())
    );
}

#[test]
fn test_custom_split_remainder_stays_with_payer() {
    let expenses = vec![expense(
        dec!(100),
        "CHF",
        "A",
        &[("B", dec!(30)), ("C", dec!(20))],
        SplitMode::Custom,
    )];

    let balances = compute_balances(
        &participants(&["A", "B", "C"]),
        &expenses,
        &IdentityConverter,
        &chf(),
    );
    assert_eq!(
        nets(&balances),
        vec![("A", dec!(100)), ("B", dec!(-30)), ("C", dec!(-20))]
    );
    assert_eq!(
        transfers(&compute_settlements(&balances)),
        vec![("B", "A", dec!(30)), ("C", "A", dec!(20))]
    );
}
