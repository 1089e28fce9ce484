//! Split builders for the supported split modes.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tripsplit_shared::types::ParticipantId;

use super::error::SplitError;
use crate::currency::{AllocationUtil, round_dp};
use crate::group::types::{ExpenseSplit, SplitMode};

/// Shares are kept to cents.
pub const SHARE_DECIMAL_PLACES: u32 = 2;

/// Split builder.
pub struct SplitBuilder;

impl SplitBuilder {
    /// Splits `amount` equally; earlier participants absorb leftover cents.
    ///
    /// # Errors
    ///
    /// Returns an error if `participants` is empty or contains duplicates.
    pub fn equal(
        amount: Decimal,
        participants: &[ParticipantId],
    ) -> Result<Vec<ExpenseSplit>, SplitError> {
        if participants.is_empty() {
            return Err(SplitError::NoParticipants);
        }
        ensure_unique(participants.iter())?;

        Ok(Self::allocate_equal(amount, participants, SHARE_DECIMAL_PLACES))
    }

    /// Splits `amount` equally without rounding it to cents first.
    ///
    /// Shares keep the precision of `amount` (at least cents), so they sum to
    /// `amount` exactly. Used for converted amounts that carry sub-cent digits.
    ///
    /// # Errors
    ///
    /// Returns an error if `participants` is empty or contains duplicates.
    pub fn equal_exact(
        amount: Decimal,
        participants: &[ParticipantId],
    ) -> Result<Vec<ExpenseSplit>, SplitError> {
        if participants.is_empty() {
            return Err(SplitError::NoParticipants);
        }
        ensure_unique(participants.iter())?;

        let decimal_places = amount.normalize().scale().max(SHARE_DECIMAL_PLACES);
        Ok(Self::allocate_equal(amount, participants, decimal_places))
    }

    fn allocate_equal(
        amount: Decimal,
        participants: &[ParticipantId],
        decimal_places: u32,
    ) -> Vec<ExpenseSplit> {
        let shares = AllocationUtil::allocate_equal(amount, participants.len(), decimal_places);
        participants
            .iter()
            .zip(shares)
            .map(|(id, share)| ExpenseSplit::new(id.clone(), share))
            .collect()
    }

    /// The payer carries the whole expense, so nobody else owes anything.
    #[must_use]
    pub fn single_payer() -> Vec<ExpenseSplit> {
        Vec::new()
    }

    /// Splits `amount` by percentage; the percentages must sum to exactly 100.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list, a negative percentage, a duplicate
    /// participant, or percentages that do not sum to 100.
    pub fn by_percentages(
        amount: Decimal,
        percentages: &[(ParticipantId, Decimal)],
    ) -> Result<Vec<ExpenseSplit>, SplitError> {
        if percentages.is_empty() {
            return Err(SplitError::NoParticipants);
        }
        if let Some((id, _)) = percentages
            .iter()
            .find(|(_, p)| p.is_sign_negative() && !p.is_zero())
        {
            return Err(SplitError::NegativeShare(id.clone()));
        }
        ensure_unique(percentages.iter().map(|(id, _)| id))?;

        let sum: Decimal = percentages.iter().map(|(_, p)| *p).sum();
        if sum != Decimal::ONE_HUNDRED {
            return Err(SplitError::PercentagesDoNotSumTo100(sum));
        }

        let weights: Vec<Decimal> = percentages.iter().map(|(_, p)| *p).collect();
        let shares =
            AllocationUtil::allocate_by_percentages(amount, &weights, SHARE_DECIMAL_PLACES);
        Ok(percentages
            .iter()
            .zip(shares)
            .map(|((id, _), share)| ExpenseSplit::new(id.clone(), share))
            .collect())
    }

    /// Accepts caller-chosen shares. Whatever the shares leave uncovered stays
    /// with the payer.
    ///
    /// # Errors
    ///
    /// Returns an error for negative shares, duplicates, or shares exceeding
    /// the amount.
    pub fn custom(
        amount: Decimal,
        splits: Vec<ExpenseSplit>,
    ) -> Result<Vec<ExpenseSplit>, SplitError> {
        let splits: Vec<ExpenseSplit> = splits
            .into_iter()
            .map(|split| ExpenseSplit {
                share: round_dp(split.share, SHARE_DECIMAL_PLACES),
                ..split
            })
            .collect();
        Self::validate(SplitMode::Custom, amount, &splits)?;
        Ok(splits)
    }

    /// Checks prepared splits against their mode.
    ///
    /// `amount` is the expense amount in ledger currency.
    ///
    /// # Errors
    ///
    /// Returns the first rule the splits violate.
    pub fn validate(
        mode: SplitMode,
        amount: Decimal,
        splits: &[ExpenseSplit],
    ) -> Result<(), SplitError> {
        if let Some(split) = splits
            .iter()
            .find(|s| s.share.is_sign_negative() && !s.share.is_zero())
        {
            return Err(SplitError::NegativeShare(split.participant_id.clone()));
        }
        ensure_unique(splits.iter().map(|s| &s.participant_id))?;

        let total: Decimal = splits.iter().map(|s| s.share).sum();
        match mode {
            SplitMode::SinglePayer if !total.is_zero() => {
                Err(SplitError::SinglePayerNotZeroSum(total))
            }
            SplitMode::Equal | SplitMode::Custom
                if total > amount.max(round_dp(amount, SHARE_DECIMAL_PLACES)) =>
            {
                Err(SplitError::SharesExceedAmount { total, amount })
            }
            _ => Ok(()),
        }
    }
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a ParticipantId>) -> Result<(), SplitError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SplitError::DuplicateParticipant(id.clone()));
        }
    }
    Ok(())
}
