use thiserror::Error;
use tripsplit_domain::{ExpenseId, ParticipantId, PaymentId};

/// Caller mistakes surfaced by [`Ledger`](crate::Ledger) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("participant '{0}' does not exist")]
    UnknownParticipant(ParticipantId),
    #[error("participant '{0}' is already registered")]
    DuplicateParticipant(ParticipantId),
    #[error("expense '{0}' does not exist")]
    UnknownExpense(ExpenseId),
    #[error("payment '{0}' does not exist")]
    UnknownPayment(PaymentId),
    #[error("participant name must not be empty")]
    EmptyName,
    #[error("a payment needs distinct sender and recipient")]
    SelfPayment,
    #[error("amount must be positive")]
    NonPositiveAmount,
}
