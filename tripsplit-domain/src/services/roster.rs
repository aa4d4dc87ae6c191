//! Roster maintenance: the participant-removal cascade.

use fxhash::FxHashSet;

use crate::model::{Expense, Payment, ParticipantId, SplitPolicy};

/// Drops every reference to `removed` from a ledger snapshot in one pass.
///
/// Takes ownership of the records and returns the pruned state: payments
/// touching the removed participant disappear, involved sets and split
/// maps lose their entries, and matching payers are nulled. Applying this
/// together with the roster removal keeps the no-dangling-reference
/// invariant without scattered mutation.
pub fn prune_participant(
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
    removed: &ParticipantId,
) -> (Vec<Expense>, Vec<Payment>) {
    let expenses = expenses
        .into_iter()
        .map(|mut expense| {
            expense.involved.retain(|id| id != removed);
            expense.split = sanitize_split(expense.split, &expense.involved);
            if expense.payer.as_ref() == Some(removed) {
                expense.payer = None;
            }
            expense
        })
        .collect();

    let payments = payments
        .into_iter()
        .filter(|payment| payment.from != *removed && payment.to != *removed)
        .collect();

    (expenses, payments)
}

/// Prunes split-map entries keyed by ids no longer in `involved`.
pub fn sanitize_split(split: SplitPolicy, involved: &[ParticipantId]) -> SplitPolicy {
    let keep: FxHashSet<&ParticipantId> = involved.iter().collect();
    match split {
        SplitPolicy::Equal => SplitPolicy::Equal,
        SplitPolicy::Shares { mut weights } => {
            weights.retain(|id, _| keep.contains(id));
            SplitPolicy::Shares { weights }
        }
        SplitPolicy::Percent { mut percents } => {
            percents.retain(|id, _| keep.contains(id));
            SplitPolicy::Percent { percents }
        }
        SplitPolicy::Exact { mut amounts } => {
            amounts.retain(|id, _| keep.contains(id));
            SplitPolicy::Exact { amounts }
        }
    }
}
