//! Aggregation of expenses and direct repayments into per-participant
//! balances.

use std::collections::BTreeMap;

use fxhash::FxHashSet;

use crate::{
    model::{BalanceSheet, Expense, Money, Participant, ParticipantBalances, ParticipantId, Payment},
    services::allocation::allocate,
};

/// Fallback bucket for expenses carrying no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Balance aggregation service.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Folds every expense and repayment into one [`BalanceSheet`].
    ///
    /// The output is a pure function of the snapshot passed in. Expenses
    /// with a non-positive amount or no involved participants contribute
    /// nothing (not even a payer credit); payments with a non-positive
    /// amount or identical endpoints are skipped. Repayments only move the
    /// `net` view — `raw` stays expense-only so callers can render a
    /// "before payments" balance.
    ///
    /// # Panics
    /// Panics if any expense or payment references a participant missing
    /// from `participants`. Callers own reference pruning and must hand in
    /// a mutually consistent snapshot.
    pub fn calculate(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
        payments: &[Payment],
    ) -> BalanceSheet {
        let roster: FxHashSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();

        let zeroed: ParticipantBalances = participants
            .iter()
            .map(|p| (p.id.clone(), Money::ZERO))
            .collect();
        let mut raw = zeroed.clone();
        let mut paid_total = zeroed.clone();
        let mut owed_total = zeroed.clone();
        let mut incoming = zeroed.clone();
        let mut outgoing = zeroed;

        for expense in expenses {
            if let Some(payer) = &expense.payer {
                assert!(
                    roster.contains(payer),
                    "expense {} references unknown payer {payer}",
                    expense.id
                );
            }
            for id in &expense.involved {
                assert!(
                    roster.contains(id),
                    "expense {} involves unknown participant {id}",
                    expense.id
                );
            }

            if expense.amount.signum() <= 0 {
                continue;
            }
            let shares = allocate(expense);
            if shares.is_empty() {
                continue;
            }

            if let Some(payer) = &expense.payer {
                *raw.entry(payer.clone()).or_insert(Money::ZERO) += expense.amount;
                *paid_total.entry(payer.clone()).or_insert(Money::ZERO) += expense.amount;
            }
            for (id, share) in &shares {
                *raw.entry(id.clone()).or_insert(Money::ZERO) -= *share;
                *owed_total.entry(id.clone()).or_insert(Money::ZERO) += *share;
            }
        }

        for payment in payments {
            assert!(
                roster.contains(&payment.from),
                "payment {} references unknown sender {}",
                payment.id,
                payment.from
            );
            assert!(
                roster.contains(&payment.to),
                "payment {} references unknown recipient {}",
                payment.id,
                payment.to
            );

            if payment.amount.signum() <= 0 || payment.from == payment.to {
                continue;
            }
            *outgoing.entry(payment.from.clone()).or_insert(Money::ZERO) += payment.amount;
            *incoming.entry(payment.to.clone()).or_insert(Money::ZERO) += payment.amount;
        }

        // A repayment made by a debtor pulls their net toward zero, one
        // received by a creditor pulls theirs toward zero.
        let net: ParticipantBalances = participants
            .iter()
            .map(|p| {
                let base = raw.get(&p.id).copied().unwrap_or(Money::ZERO);
                let received = incoming.get(&p.id).copied().unwrap_or(Money::ZERO);
                let sent = outgoing.get(&p.id).copied().unwrap_or(Money::ZERO);
                (p.id.clone(), base - received + sent)
            })
            .collect();

        tracing::debug!(
            participant_count = participants.len(),
            expense_count = expenses.len(),
            payment_count = payments.len(),
            "Aggregated ledger snapshot into balances"
        );

        BalanceSheet {
            raw,
            net,
            paid_total,
            owed_total,
            incoming,
            outgoing,
        }
    }
}

/// Sums positive expense amounts per category. Expenses without a category
/// (or with an empty one) land in the [`UNCATEGORIZED`] bucket.
pub fn totals_by_category(expenses: &[Expense]) -> BTreeMap<String, Money> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        if expense.amount.signum() <= 0 {
            continue;
        }
        let bucket = expense
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED);
        *totals.entry(bucket.to_string()).or_insert(Money::ZERO) += expense.amount;
    }
    totals
}
