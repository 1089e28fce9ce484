//! Split error types.

use rust_decimal::Decimal;
use thiserror::Error;
use tripsplit_shared::types::ParticipantId;

/// Errors raised while building or validating expense splits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// No participants to split between.
    #[error("Cannot split an expense between zero participants")]
    NoParticipants,

    /// A share or percentage is negative.
    #[error("Share for {0} cannot be negative")]
    NegativeShare(ParticipantId),

    /// The same participant appears twice.
    #[error("Participant {0} appears more than once in the split")]
    DuplicateParticipant(ParticipantId),

    /// Custom shares add up to more than the expense.
    #[error("Shares total {total} exceeds expense amount {amount}")]
    SharesExceedAmount {
        /// Sum of shares.
        total: Decimal,
        /// Expense amount in ledger currency.
        amount: Decimal,
    },

    /// Percentages must sum to exactly 100.
    #[error("Percentages must sum to 100, got {0}")]
    PercentagesDoNotSumTo100(Decimal),

    /// A single-payer expense must not shift money between participants.
    #[error("Single-payer splits must sum to zero, got {0}")]
    SinglePayerNotZeroSum(Decimal),
}
