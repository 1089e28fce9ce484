//! Settlement domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{CurrencyCode, ParticipantId};

/// Amounts at or below this magnitude are treated as settled.
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A participant's net position in ledger currency.
///
/// Positive: the group owes them. Negative: they owe the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Participant the balance belongs to.
    pub participant_id: ParticipantId,
    /// Paid minus owed.
    pub net: Decimal,
}

impl Balance {
    /// Creates a balance.
    #[must_use]
    pub fn new(participant_id: impl Into<ParticipantId>, net: Decimal) -> Self {
        Self {
            participant_id: participant_id.into(),
            net,
        }
    }

    /// Whether the balance is within `tolerance` of zero.
    #[must_use]
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.net.abs() <= tolerance.abs()
    }
}

/// Paid and owed totals behind a [`Balance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantLedger {
    /// Participant the totals belong to.
    pub participant_id: ParticipantId,
    /// Converted amounts of expenses they paid.
    pub paid: Decimal,
    /// Sum of their split shares.
    pub owed: Decimal,
    /// Paid minus owed.
    pub net: Decimal,
}

impl ParticipantLedger {
    pub(crate) fn empty(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            paid: Decimal::ZERO,
            owed: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

impl From<ParticipantLedger> for Balance {
    fn from(ledger: ParticipantLedger) -> Self {
        Self {
            participant_id: ledger.participant_id,
            net: ledger.net,
        }
    }
}

/// A directed payment that reduces outstanding debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Debtor who pays.
    pub from_participant_id: ParticipantId,
    /// Creditor who receives.
    pub to_participant_id: ParticipantId,
    /// Amount in ledger currency, rounded to cents.
    pub amount: Decimal,
}

/// Balances plus the transfers that clear them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPlan {
    /// Currency every amount is expressed in.
    pub currency: CurrencyCode,
    /// Per-participant paid and owed totals.
    pub ledger: Vec<ParticipantLedger>,
    /// Net balances, same order as `ledger`.
    pub balances: Vec<Balance>,
    /// Transfers in emission order.
    pub settlements: Vec<Settlement>,
}

impl SettlementPlan {
    /// Sum of all transfer amounts.
    #[must_use]
    pub fn total_transferred(&self) -> Decimal {
        self.settlements.iter().map(|s| s.amount).sum()
    }

    /// Whether nobody needs to pay anybody.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}
