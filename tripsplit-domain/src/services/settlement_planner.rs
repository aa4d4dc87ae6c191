//! Greedy settlement planning over net balances.

use rust_decimal::Decimal;

use crate::model::{Money, ParticipantBalances, ParticipantId, Transfer};

/// Balances within this tolerance of zero count as settled.
pub fn balance_epsilon() -> Decimal {
    Decimal::new(1, 8)
}

struct Outstanding<'a> {
    id: &'a ParticipantId,
    remaining: Decimal,
}

/// Settlement planning service.
///
/// Matches the largest debtor against the largest creditor until one side
/// is exhausted. The transfer count is an approximation, not the
/// combinatorial minimum, but the produced transfers always zero every
/// balance exactly and never go backwards or to oneself.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Converts net balances into an ordered list of suggested transfers.
    ///
    /// Deterministic for a given input: ties keep the stable map order of
    /// `net` (an implementation detail, not a contract).
    pub fn plan(&self, net: &ParticipantBalances) -> Vec<Transfer> {
        let epsilon = balance_epsilon();
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();
        for (id, balance) in net {
            let value = balance.as_decimal();
            if value.abs() < epsilon {
                continue;
            }
            if value < Decimal::ZERO {
                debtors.push(Outstanding {
                    id,
                    remaining: -value,
                });
            } else {
                creditors.push(Outstanding {
                    id,
                    remaining: value,
                });
            }
        }
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let amount = debtors[i].remaining.min(creditors[j].remaining);
            transfers.push(Transfer {
                from: debtors[i].id.clone(),
                to: creditors[j].id.clone(),
                amount: Money::from_decimal(amount),
            });
            debtors[i].remaining -= amount;
            creditors[j].remaining -= amount;
            if debtors[i].remaining <= epsilon {
                i += 1;
            }
            if creditors[j].remaining <= epsilon {
                j += 1;
            }
        }

        tracing::debug!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Planned greedy settlement"
        );
        transfers
    }
}
