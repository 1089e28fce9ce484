//! Group error types.

use thiserror::Error;
use tripsplit_shared::AppError;
use tripsplit_shared::types::{ExpenseId, ParticipantId};

use crate::split::SplitError;

/// Errors raised by group mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Group name is blank.
    #[error("Group name cannot be empty")]
    EmptyName,

    /// Participant name is blank.
    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    /// Expense description is blank.
    #[error("Expense description cannot be empty")]
    EmptyDescription,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Participant not found.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Participant id already taken.
    #[error("Participant already exists: {0}")]
    DuplicateParticipant(ParticipantId),

    /// Splits are inconsistent with the expense.
    #[error(transparent)]
    InvalidSplit(#[from] SplitError),
}

impl From<GroupError> for AppError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::ParticipantNotFound(_) | GroupError::ExpenseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            GroupError::DuplicateParticipant(_) => Self::Conflict(err.to_string()),
            GroupError::InvalidSplit(_) => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
