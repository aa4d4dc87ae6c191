//! Per-expense cost allocation across the splitting policies.

use std::collections::BTreeMap;

use fxhash::FxHashSet;
use rust_decimal::Decimal;

use crate::model::{Expense, Money, ParticipantId, SplitPolicy};

/// Shares owed per participant for a single expense.
pub type ShareMap = BTreeMap<ParticipantId, Money>;

/// Declared exact amounts may drift from the expense total by up to this
/// much before rescaling kicks in (currency-scale tolerance).
pub fn exact_rescale_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Computes each involved participant's owed share of `expense`.
///
/// Defined only over the expense's involved set (duplicates collapse to
/// their first occurrence). A non-positive amount or an empty involved set
/// yields an empty map. A zero weight or percent sum yields all-zero
/// shares — an explicitly "unallocated" result, never a silent equal
/// split. Pure and deterministic for a given expense.
pub fn allocate(expense: &Expense) -> ShareMap {
    let involved = dedup_involved(&expense.involved);
    if expense.amount.signum() <= 0 || involved.is_empty() {
        return ShareMap::new();
    }
    let amount = expense.amount.as_decimal();

    match &expense.split {
        SplitPolicy::Equal => equal_shares(&involved, amount),
        SplitPolicy::Shares { weights } => proportional_shares(&involved, amount, weights),
        SplitPolicy::Percent { percents } => proportional_shares(&involved, amount, percents),
        SplitPolicy::Exact { amounts } => exact_shares(expense, &involved, amount, amounts),
    }
}

fn dedup_involved(involved: &[ParticipantId]) -> Vec<&ParticipantId> {
    let mut seen = FxHashSet::default();
    involved.iter().filter(|id| seen.insert(*id)).collect()
}

fn equal_shares(involved: &[&ParticipantId], amount: Decimal) -> ShareMap {
    let share = amount / Decimal::from(involved.len() as u64);
    involved
        .iter()
        .map(|id| ((*id).clone(), Money::from_decimal(share)))
        .collect()
}

// Shares and Percent follow the same rule: owed = amount * value / sum,
// renormalized against whatever the declared values sum to.
fn proportional_shares(
    involved: &[&ParticipantId],
    amount: Decimal,
    values: &BTreeMap<ParticipantId, Decimal>,
) -> ShareMap {
    let value_of = |id: &ParticipantId| values.get(id).copied().unwrap_or(Decimal::ZERO);
    let total: Decimal = involved.iter().map(|id| value_of(id)).sum();
    involved
        .iter()
        .map(|id| {
            let share = if total > Decimal::ZERO {
                amount * value_of(id) / total
            } else {
                Decimal::ZERO
            };
            ((*id).clone(), Money::from_decimal(share))
        })
        .collect()
}

fn exact_shares(
    expense: &Expense,
    involved: &[&ParticipantId],
    amount: Decimal,
    amounts: &BTreeMap<ParticipantId, Money>,
) -> ShareMap {
    let mut shares: ShareMap = involved
        .iter()
        .map(|id| {
            let declared = amounts.get(*id).copied().unwrap_or(Money::ZERO);
            ((*id).clone(), declared)
        })
        .collect();

    let declared_sum: Decimal = shares.values().map(|share| share.as_decimal()).sum();
    if declared_sum > Decimal::ZERO && (declared_sum - amount).abs() > exact_rescale_tolerance() {
        let factor = amount / declared_sum;
        tracing::warn!(
            expense_id = %expense.id,
            expense_total = %amount,
            declared_sum = %declared_sum,
            factor = %factor,
            "Declared exact shares do not foot to the expense total; rescaling"
        );
        for share in shares.values_mut() {
            *share = Money::from_decimal(share.as_decimal() * factor);
        }
    }
    shares
}
