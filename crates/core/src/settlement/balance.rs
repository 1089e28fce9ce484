//! Net balance computation.
//!
//! Every expense credits its payer with the amount converted into the ledger
//! currency and debits each split participant with their share. Ids that are
//! referenced by an expense but missing from the participant list (removed
//! participants, imported history) get an entry of their own, appended after
//! the known participants in first-encounter order.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, trace};
use tripsplit_shared::types::{CurrencyCode, ParticipantId};

use super::types::{Balance, ParticipantLedger};
use crate::currency::CurrencyConverter;
use crate::group::types::{Expense, Participant};

/// Insertion-ordered ledger entries keyed by participant.
struct LedgerBook {
    entries: Vec<ParticipantLedger>,
    index: HashMap<ParticipantId, usize>,
}

impl LedgerBook {
    fn new(participants: &[Participant]) -> Self {
        let mut book = Self {
            entries: Vec::with_capacity(participants.len()),
            index: HashMap::with_capacity(participants.len()),
        };
        for participant in participants {
            book.entry(&participant.id);
        }
        book
    }

    fn entry(&mut self, id: &ParticipantId) -> &mut ParticipantLedger {
        let position = match self.index.get(id) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push(ParticipantLedger::empty(id.clone()));
                self.index.insert(id.clone(), position);
                position
            }
        };
        &mut self.entries[position]
    }

    fn known(&self, id: &ParticipantId) -> bool {
        self.index.contains_key(id)
    }

    fn finish(self) -> Vec<ParticipantLedger> {
        self.entries
            .into_iter()
            .map(|mut ledger| {
                ledger.net = ledger.paid - ledger.owed;
                ledger
            })
            .collect()
    }
}

/// Computes paid, owed, and net totals per participant.
///
/// Expenses whose converted amount is zero or negative are skipped entirely,
/// splits included. The result lists every entry of `participants` (zero when
/// uninvolved, duplicates collapsed) followed by any lazily created ids.
pub fn compute_ledger<C>(
    participants: &[Participant],
    expenses: &[Expense],
    converter: &C,
    ledger_currency: &CurrencyCode,
) -> Vec<ParticipantLedger>
where
    C: CurrencyConverter + ?Sized,
{
    let mut book = LedgerBook::new(participants);

    for expense in expenses {
        let amount = converter.convert(
            expense.amount,
            expense.currency.as_str(),
            ledger_currency.as_str(),
        );
        if amount <= Decimal::ZERO {
            trace!(
                expense_id = %expense.id,
                amount = %expense.money(),
                converted = %amount,
                "Skipping expense with non-positive converted amount"
            );
            continue;
        }

        if !book.known(&expense.paid_by) {
            debug!(
                participant_id = %expense.paid_by,
                expense_id = %expense.id,
                "Payer not in participant list, adding ledger entry"
            );
        }
        book.entry(&expense.paid_by).paid += amount;

        for split in &expense.splits {
            if !book.known(&split.participant_id) {
                debug!(
                    participant_id = %split.participant_id,
                    expense_id = %expense.id,
                    "Split participant not in participant list, adding ledger entry"
                );
            }
            book.entry(&split.participant_id).owed += split.share;
        }
    }

    book.finish()
}

/// Computes each participant's net balance in `ledger_currency`.
///
/// The sum of all nets equals the sum over counted expenses of the converted
/// amount minus the split total, so it is zero when every split covers its
/// expense.
pub fn compute_balances<C>(
    participants: &[Participant],
    expenses: &[Expense],
    converter: &C,
    ledger_currency: &CurrencyCode,
) -> Vec<Balance>
where
    C: CurrencyConverter + ?Sized,
{
    compute_ledger(participants, expenses, converter, ledger_currency)
        .into_iter()
        .map(Balance::from)
        .collect()
}
