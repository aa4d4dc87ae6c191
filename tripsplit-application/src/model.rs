use std::collections::BTreeMap;

use chrono::NaiveDate;
use tripsplit_domain::{BalanceSheet, ParticipantId, Transfer};

/// Free-form expense input as a UI would capture it.
///
/// The amount and any split values arrive as raw text and are normalized
/// through the amount parser on intake; unparseable values read as zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub date: NaiveDate,
    pub payer: Option<ParticipantId>,
    pub involved: Vec<ParticipantId>,
    pub split: SplitDraft,
    pub category: Option<String>,
}

/// Raw split input: free-form text keyed by participant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitDraft {
    #[default]
    Equal,
    Shares(BTreeMap<ParticipantId, String>),
    Percent(BTreeMap<ParticipantId, String>),
    Exact(BTreeMap<ParticipantId, String>),
}

/// Free-form repayment input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentDraft {
    pub date: NaiveDate,
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: String,
    pub note: String,
}

/// Balances plus the suggested transfer plan for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementReport {
    pub balances: BalanceSheet,
    pub transfers: Vec<Transfer>,
}
