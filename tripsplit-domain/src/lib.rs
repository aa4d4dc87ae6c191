#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceSheet, Expense, ExpenseId, Money, Participant, ParticipantBalances, ParticipantId,
    Payment, PaymentId, SplitPolicy, Transfer,
};
pub use services::{
    allocate, balance_epsilon, exact_rescale_tolerance, prune_participant, sanitize_split,
    totals_by_category, BalanceCalculator, SettlementPlanner, ShareMap,
};
