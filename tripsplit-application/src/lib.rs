#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger;
pub mod model;

pub use error::LedgerError;
pub use ledger::Ledger;
pub use model::{ExpenseDraft, PaymentDraft, SettlementReport, SplitDraft};
