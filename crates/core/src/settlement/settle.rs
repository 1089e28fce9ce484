//! Greedy debt settlement.
//!
//! Creditors and debtors are matched with two cursors in the order they appear
//! in the balance list. Each step transfers the smaller of the two outstanding
//! amounts, so at least one cursor advances per step and the number of
//! transfers never exceeds `creditors + debtors - 1`. The result is not
//! guaranteed to be the minimum number of transfers.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;
use tripsplit_shared::types::ParticipantId;

use super::types::{Balance, SETTLEMENT_TOLERANCE, Settlement};

/// Rounds to cents, halves away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

struct Position<'a> {
    participant_id: &'a ParticipantId,
    outstanding: Decimal,
}

/// Settles `balances` with the default one-cent tolerance.
#[must_use]
pub fn compute_settlements(balances: &[Balance]) -> Vec<Settlement> {
    compute_settlements_with_tolerance(balances, SETTLEMENT_TOLERANCE)
}

/// Settles `balances`, ignoring outstanding amounts within `tolerance`.
///
/// Emitted amounts are rounded to cents and exceed the tolerance. A transfer
/// that rounds to zero is dropped, which matters for tolerances below half a
/// cent. The input is not modified and the output depends only on the input
/// order.
#[must_use]
pub fn compute_settlements_with_tolerance(
    balances: &[Balance],
    tolerance: Decimal,
) -> Vec<Settlement> {
    let tolerance = tolerance.abs();
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for balance in balances {
        if balance.net > tolerance {
            creditors.push(Position {
                participant_id: &balance.participant_id,
                outstanding: balance.net,
            });
        } else if balance.net < -tolerance {
            debtors.push(Position {
                participant_id: &balance.participant_id,
                outstanding: -balance.net,
            });
        }
    }

    let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let amount = debtor.outstanding.min(creditor.outstanding);
        let rounded = round2(amount);

        if amount > tolerance && rounded > Decimal::ZERO {
            settlements.push(Settlement {
                from_participant_id: debtor.participant_id.clone(),
                to_participant_id: creditor.participant_id.clone(),
                amount: rounded,
            });
        }

        debtor.outstanding -= amount;
        creditor.outstanding -= amount;

        if debtor.outstanding <= tolerance {
            i += 1;
        }
        if creditor.outstanding <= tolerance {
            j += 1;
        }
    }

    debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        settlements = settlements.len(),
        "Computed settlements"
    );

    settlements
}

/// Applies transfers to balances: the payer's net rises, the receiver's falls.
///
/// Ids that only appear in `settlements` are appended with a zero start.
#[must_use]
pub fn apply_settlements(balances: &[Balance], settlements: &[Settlement]) -> Vec<Balance> {
    let mut adjusted = balances.to_vec();
    let mut index: HashMap<ParticipantId, usize> = HashMap::with_capacity(adjusted.len());
    for (position, balance) in adjusted.iter().enumerate() {
        index.entry(balance.participant_id.clone()).or_insert(position);
    }

    let mut adjust = |id: &ParticipantId, delta: Decimal| {
        let position = *index.entry(id.clone()).or_insert_with(|| {
            adjusted.push(Balance::new(id.clone(), Decimal::ZERO));
            adjusted.len() - 1
        });
        adjusted[position].net += delta;
    };

    for settlement in settlements {
        adjust(&settlement.from_participant_id, settlement.amount);
        adjust(&settlement.to_participant_id, -settlement.amount);
    }

    adjusted
}
