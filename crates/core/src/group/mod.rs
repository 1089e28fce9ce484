//! Groups of travellers sharing expenses.

pub mod error;
pub mod service;
pub mod types;

pub use error::GroupError;
pub use types::{
    Expense, ExpenseSplit, Group, NewExpenseInput, NewParticipant, Participant, SplitMode,
};
