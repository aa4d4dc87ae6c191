use std::collections::BTreeMap;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use tripsplit_domain::{
    prune_participant, sanitize_split, totals_by_category, BalanceCalculator, BalanceSheet,
    Expense, ExpenseId, Money, Participant, ParticipantId, Payment, PaymentId, SettlementPlanner,
    SplitPolicy, Transfer,
};
use tripsplit_parser::parse_amount;

use crate::{
    error::LedgerError,
    model::{ExpenseDraft, PaymentDraft, SettlementReport, SplitDraft},
};

/// Owned snapshot of one trip's participants, expenses, and repayments.
///
/// Mutations preserve the no-dangling-reference invariant (participant
/// removal cascades through every record in one pass), so reporting can
/// hand the snapshot to the domain services unchecked. The ledger itself
/// performs no I/O; persisting or transmitting it is the caller's concern.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
    #[serde(default)]
    next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from caller-persisted records.
    ///
    /// Rejects duplicate participant ids and dangling references; split
    /// maps are re-sanitized against each expense's involved set so the
    /// keyed-map invariant holds even for hand-edited data.
    pub fn from_parts(
        participants: Vec<Participant>,
        expenses: Vec<Expense>,
        payments: Vec<Payment>,
    ) -> Result<Self, LedgerError> {
        let mut roster: FxHashSet<ParticipantId> = FxHashSet::default();
        for participant in &participants {
            if !roster.insert(participant.id.clone()) {
                return Err(LedgerError::DuplicateParticipant(participant.id.clone()));
            }
        }

        for expense in &expenses {
            if let Some(payer) = &expense.payer {
                require_known(&roster, payer)?;
            }
            for id in &expense.involved {
                require_known(&roster, id)?;
            }
        }
        for payment in &payments {
            require_known(&roster, &payment.from)?;
            require_known(&roster, &payment.to)?;
        }

        let expenses = expenses
            .into_iter()
            .map(|mut expense| {
                expense.split = sanitize_split(expense.split, &expense.involved);
                expense
            })
            .collect();

        Ok(Self {
            participants,
            expenses,
            payments,
            next_id: 0,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn add_participant(&mut self, name: impl Into<String>) -> Result<ParticipantId, LedgerError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let id = self.fresh_participant_id();
        self.participants.push(Participant {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Removes a participant and every reference to them in one atomic
    /// transformation of the snapshot.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<(), LedgerError> {
        let index = self
            .participants
            .iter()
            .position(|participant| &participant.id == id)
            .ok_or_else(|| LedgerError::UnknownParticipant(id.clone()))?;
        self.participants.remove(index);

        let expenses = std::mem::take(&mut self.expenses);
        let payments = std::mem::take(&mut self.payments);
        let (expenses, payments) = prune_participant(expenses, payments, id);
        self.expenses = expenses;
        self.payments = payments;
        Ok(())
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<ExpenseId, LedgerError> {
        let id = self.fresh_expense_id();
        let expense = self.resolve_expense(id.clone(), draft)?;
        self.expenses.push(expense);
        Ok(id)
    }

    pub fn update_expense(
        &mut self,
        id: &ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<(), LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|expense| &expense.id == id)
            .ok_or_else(|| LedgerError::UnknownExpense(id.clone()))?;
        let resolved = self.resolve_expense(id.clone(), draft)?;
        self.expenses[index] = resolved;
        Ok(())
    }

    pub fn remove_expense(&mut self, id: &ExpenseId) -> Result<(), LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|expense| &expense.id == id)
            .ok_or_else(|| LedgerError::UnknownExpense(id.clone()))?;
        self.expenses.remove(index);
        Ok(())
    }

    pub fn add_payment(&mut self, draft: PaymentDraft) -> Result<PaymentId, LedgerError> {
        self.require_participant(&draft.from)?;
        self.require_participant(&draft.to)?;
        if draft.from == draft.to {
            return Err(LedgerError::SelfPayment);
        }
        let amount = Money::from_decimal(parse_amount(&draft.amount));
        if amount.signum() <= 0 {
            return Err(LedgerError::NonPositiveAmount);
        }

        let id = self.fresh_payment_id();
        self.payments.push(Payment {
            id: id.clone(),
            date: draft.date,
            from: draft.from,
            to: draft.to,
            amount,
            note: draft.note,
        });
        Ok(id)
    }

    pub fn remove_payment(&mut self, id: &PaymentId) -> Result<(), LedgerError> {
        let index = self
            .payments
            .iter()
            .position(|payment| &payment.id == id)
            .ok_or_else(|| LedgerError::UnknownPayment(id.clone()))?;
        self.payments.remove(index);
        Ok(())
    }

    /// Aggregates the current snapshot into balance views.
    pub fn balance_sheet(&self) -> BalanceSheet {
        BalanceCalculator.calculate(&self.participants, &self.expenses, &self.payments)
    }

    /// Suggested transfers that settle the current net balances.
    pub fn settlement_plan(&self) -> Vec<Transfer> {
        SettlementPlanner.plan(&self.balance_sheet().net)
    }

    pub fn report(&self) -> SettlementReport {
        let balances = self.balance_sheet();
        let transfers = SettlementPlanner.plan(&balances.net);
        SettlementReport {
            balances,
            transfers,
        }
    }

    pub fn category_totals(&self) -> BTreeMap<String, Money> {
        totals_by_category(&self.expenses)
    }

    fn resolve_expense(
        &self,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Expense, LedgerError> {
        if let Some(payer) = &draft.payer {
            self.require_participant(payer)?;
        }
        for participant in &draft.involved {
            self.require_participant(participant)?;
        }

        let amount = Money::from_decimal(parse_amount(&draft.amount));
        if amount.signum() <= 0 {
            return Err(LedgerError::NonPositiveAmount);
        }

        let mut seen = FxHashSet::default();
        let involved: Vec<ParticipantId> = draft
            .involved
            .into_iter()
            .filter(|participant| seen.insert(participant.clone()))
            .collect();
        let split = resolve_split(draft.split, &involved);

        Ok(Expense {
            id,
            description: draft.description,
            amount,
            date: draft.date,
            payer: draft.payer,
            involved,
            split,
            category: draft.category,
        })
    }

    fn require_participant(&self, id: &ParticipantId) -> Result<(), LedgerError> {
        if self.participants.iter().any(|p| &p.id == id) {
            Ok(())
        } else {
            Err(LedgerError::UnknownParticipant(id.clone()))
        }
    }

    fn fresh_participant_id(&mut self) -> ParticipantId {
        loop {
            self.next_id += 1;
            let candidate = ParticipantId::new(format!("p{}", self.next_id));
            if !self.participants.iter().any(|p| p.id == candidate) {
                return candidate;
            }
        }
    }

    fn fresh_expense_id(&mut self) -> ExpenseId {
        loop {
            self.next_id += 1;
            let candidate = ExpenseId::new(format!("e{}", self.next_id));
            if !self.expenses.iter().any(|e| e.id == candidate) {
                return candidate;
            }
        }
    }

    fn fresh_payment_id(&mut self) -> PaymentId {
        loop {
            self.next_id += 1;
            let candidate = PaymentId::new(format!("pay{}", self.next_id));
            if !self.payments.iter().any(|p| p.id == candidate) {
                return candidate;
            }
        }
    }
}

fn require_known(
    roster: &FxHashSet<ParticipantId>,
    id: &ParticipantId,
) -> Result<(), LedgerError> {
    if roster.contains(id) {
        Ok(())
    } else {
        Err(LedgerError::UnknownParticipant(id.clone()))
    }
}

// Draft split values are free-form text; unparseable entries read as zero,
// and keys outside the involved set are dropped up front.
fn resolve_split(draft: SplitDraft, involved: &[ParticipantId]) -> SplitPolicy {
    let policy = match draft {
        SplitDraft::Equal => SplitPolicy::Equal,
        SplitDraft::Shares(raw) => SplitPolicy::Shares {
            weights: raw
                .iter()
                .map(|(id, text)| (id.clone(), parse_amount(text)))
                .collect(),
        },
        SplitDraft::Percent(raw) => SplitPolicy::Percent {
            percents: raw
                .iter()
                .map(|(id, text)| (id.clone(), parse_amount(text)))
                .collect(),
        },
        SplitDraft::Exact(raw) => SplitPolicy::Exact {
            amounts: raw
                .iter()
                .map(|(id, text)| (id.clone(), Money::from_decimal(parse_amount(text))))
                .collect(),
        },
    };
    sanitize_split(policy, involved)
}
