//! Group mutations and settlement queries.
//!
//! Mutations validate their input and stamp `updated_at` with the caller's
//! clock. Removing a participant never touches the expense history, so their
//! past payments and shares keep counting towards everybody's balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tripsplit_shared::types::{CurrencyCode, ExpenseId, GroupId, ParticipantId};

use super::error::GroupError;
use super::types::{
    Expense, ExpenseSplit, Group, NewExpenseInput, NewParticipant, Participant, SplitMode,
};
use crate::currency::CurrencyConverter;
use crate::settlement::{self, Balance, ParticipantLedger, Settlement, SettlementPlan};
use crate::split::SplitBuilder;

impl Group {
    /// Creates an empty group settling in `currency`.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::EmptyName` if `name` is blank.
    pub fn new(
        name: &str,
        currency: impl Into<CurrencyCode>,
        now: DateTime<Utc>,
    ) -> Result<Self, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }

        let group = Self {
            id: GroupId::generate(),
            name: name.to_string(),
            currency: currency.into(),
            participants: Vec::new(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        info!(group_id = %group.id, currency = %group.currency, "Group created");
        Ok(group)
    }

    /// Looks up a current participant.
    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Looks up an expense.
    #[must_use]
    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    /// Adds a participant with a generated id and returns it.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::EmptyParticipantName` if the name is blank.
    pub fn add_participant(
        &mut self,
        input: NewParticipant,
        now: DateTime<Utc>,
    ) -> Result<Participant, GroupError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyParticipantName);
        }

        let participant = Participant {
            id: ParticipantId::generate(),
            name: name.to_string(),
            email: input
                .email
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
        };
        self.insert_participant(participant, now)
    }

    /// Adds a participant that already carries an id, e.g. one re-joining
    /// after removal.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::DuplicateParticipant` if the id is taken.
    pub fn insert_participant(
        &mut self,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<Participant, GroupError> {
        if self.participant(&participant.id).is_some() {
            return Err(GroupError::DuplicateParticipant(participant.id));
        }

        debug!(group_id = %self.id, participant_id = %participant.id, "Participant added");
        self.participants.push(participant.clone());
        self.updated_at = now;
        Ok(participant)
    }

    /// Removes a participant, keeping every expense that references them.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::ParticipantNotFound` for an unknown id.
    pub fn remove_participant(
        &mut self,
        id: &ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<Participant, GroupError> {
        let position = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| GroupError::ParticipantNotFound(id.clone()))?;

        let removed = self.participants.remove(position);
        self.updated_at = now;
        debug!(group_id = %self.id, participant_id = %id, "Participant removed");
        Ok(removed)
    }

    /// Records an expense and returns the stored copy.
    ///
    /// The amount is converted into the group currency to check the splits.
    /// An `Equal` expense without splits is divided across the current
    /// participants.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank description, a negative amount, a payer or
    /// split participant outside the group, or splits that break their mode.
    pub fn add_expense<C>(
        &mut self,
        input: NewExpenseInput,
        converter: &C,
        now: DateTime<Utc>,
    ) -> Result<Expense, GroupError>
    where
        C: CurrencyConverter + ?Sized,
    {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(GroupError::EmptyDescription);
        }
        if input.amount < Decimal::ZERO {
            return Err(GroupError::NegativeAmount);
        }
        self.require_participant(&input.paid_by)?;
        for split in &input.splits {
            self.require_participant(&split.participant_id)?;
        }

        let split_mode = input.split_mode.unwrap_or_default();
        let converted = converter.convert(
            input.amount,
            input.currency.as_str(),
            self.currency.as_str(),
        );
        let splits = self.resolve_splits(split_mode, converted, input.splits)?;

        let expense = Expense {
            id: ExpenseId::generate(),
            group_id: self.id.clone(),
            description: description.to_string(),
            amount: input.amount,
            currency: input.currency,
            paid_by: input.paid_by,
            splits,
            split_mode,
            created_at: now,
        };

        info!(
            group_id = %self.id,
            expense_id = %expense.id,
            amount = %expense.money(),
            converted = %converted,
            "Expense added"
        );
        self.expenses.push(expense.clone());
        self.updated_at = now;
        Ok(expense)
    }

    /// Deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::ExpenseNotFound` for an unknown id.
    pub fn remove_expense(
        &mut self,
        id: &ExpenseId,
        now: DateTime<Utc>,
    ) -> Result<Expense, GroupError> {
        let position = self
            .expenses
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| GroupError::ExpenseNotFound(id.clone()))?;

        let removed = self.expenses.remove(position);
        self.updated_at = now;
        debug!(group_id = %self.id, expense_id = %id, "Expense removed");
        Ok(removed)
    }

    /// Paid, owed, and net totals in the group currency.
    pub fn ledger<C>(&self, converter: &C) -> Vec<ParticipantLedger>
    where
        C: CurrencyConverter + ?Sized,
    {
        settlement::compute_ledger(&self.participants, &self.expenses, converter, &self.currency)
    }

    /// Net balances in the group currency.
    pub fn balances<C>(&self, converter: &C) -> Vec<Balance>
    where
        C: CurrencyConverter + ?Sized,
    {
        settlement::compute_balances(&self.participants, &self.expenses, converter, &self.currency)
    }

    /// Transfers that settle the group.
    pub fn settlements<C>(&self, converter: &C) -> Vec<Settlement>
    where
        C: CurrencyConverter + ?Sized,
    {
        settlement::compute_settlements(&self.balances(converter))
    }

    /// Ledger, balances, and transfers in one pass.
    pub fn plan<C>(&self, converter: &C) -> SettlementPlan
    where
        C: CurrencyConverter + ?Sized,
    {
        settlement::plan(&self.participants, &self.expenses, converter, &self.currency)
    }

    fn require_participant(&self, id: &ParticipantId) -> Result<(), GroupError> {
        match self.participant(id) {
            Some(_) => Ok(()),
            None => Err(GroupError::ParticipantNotFound(id.clone())),
        }
    }

    fn resolve_splits(
        &self,
        mode: SplitMode,
        converted: Decimal,
        splits: Vec<ExpenseSplit>,
    ) -> Result<Vec<ExpenseSplit>, GroupError> {
        if !splits.is_empty() {
            SplitBuilder::validate(mode, converted, &splits)?;
            return Ok(splits);
        }

        match mode {
            SplitMode::Equal if converted > Decimal::ZERO => {
                let members: Vec<ParticipantId> =
                    self.participants.iter().map(|p| p.id.clone()).collect();
                Ok(SplitBuilder::equal_exact(converted, &members)?)
            }
            _ => Ok(SplitBuilder::single_payer()),
        }
    }
}
