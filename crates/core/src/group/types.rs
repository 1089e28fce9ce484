//! Domain types for groups, participants, and shared expenses.
//!
//! Field names serialize in camelCase so stored group documents keep their
//! shape (`paidBy`, `participantId`, `splitMode`, ...).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{CurrencyCode, ExpenseId, GroupId, Money, ParticipantId};

/// A member of a group. Identity is the `id`; name and email are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique within the group.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Optional contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    /// Creates a participant with an explicit id.
    #[must_use]
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }
}

/// The amount (in ledger currency) one participant owes for one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    /// Participant owing the share.
    pub participant_id: ParticipantId,
    /// Share in ledger currency.
    pub share: Decimal,
}

impl ExpenseSplit {
    /// Creates a split.
    #[must_use]
    pub fn new(participant_id: impl Into<ParticipantId>, share: Decimal) -> Self {
        Self {
            participant_id: participant_id.into(),
            share,
        }
    }
}

/// How an expense is divided between participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitMode {
    /// Every participant owes `amount / participants`.
    #[default]
    Equal,
    /// The payer carries the whole expense; splits are empty or zero-sum.
    SinglePayer,
    /// Arbitrary shares; any uncovered remainder is absorbed by the payer.
    Custom,
}

/// A shared expense paid by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense id.
    pub id: ExpenseId,
    /// Owning group.
    pub group_id: GroupId,
    /// What was paid for.
    pub description: String,
    /// Amount in `currency`; non-negative in valid input.
    pub amount: Decimal,
    /// Currency the expense was paid in.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Participant who paid.
    pub paid_by: ParticipantId,
    /// Per-participant shares in ledger currency.
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    /// How the splits were produced.
    #[serde(default)]
    pub split_mode: SplitMode,
    /// When the expense was recorded.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// The amount in the currency it was paid in.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::new(self.amount, self.currency.clone())
    }

    /// Sum of all split shares.
    #[must_use]
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|split| split.share).sum()
    }
}

/// The unit of settlement: participants plus their full expense history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group id.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Ledger currency balances are computed in.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Current participants.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Every expense ever recorded, including ones paid by removed participants.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    /// Display name.
    pub name: String,
    /// Optional contact address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Input for adding an expense.
///
/// When `splits` is empty and the mode is `Equal`, the group divides the
/// converted amount equally across its current participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseInput {
    /// What was paid for.
    pub description: String,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency the expense was paid in.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Participant who paid.
    pub paid_by: ParticipantId,
    /// Prepared shares in ledger currency.
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    /// Defaults to `Equal`.
    #[serde(default)]
    pub split_mode: Option<SplitMode>,
}
