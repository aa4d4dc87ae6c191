use std::collections::BTreeMap;

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use tripsplit_application::{ExpenseDraft, Ledger, PaymentDraft, SplitDraft};
use tripsplit_domain::{Money, ParticipantBalances, ParticipantId, Transfer};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

fn equal_expense(amount: &str, payer: &ParticipantId, involved: &[&ParticipantId]) -> ExpenseDraft {
    ExpenseDraft {
        description: "shared".to_string(),
        amount: amount.to_string(),
        date: date(),
        payer: Some(payer.clone()),
        involved: involved.iter().map(|id| (*id).clone()).collect(),
        split: SplitDraft::Equal,
        category: None,
    }
}

fn split_values(pairs: &[(&ParticipantId, &str)]) -> BTreeMap<ParticipantId, String> {
    pairs
        .iter()
        .map(|(id, value)| ((*id).clone(), value.to_string()))
        .collect()
}

fn assert_balances(balances: &ParticipantBalances, expected: &[(&ParticipantId, i64)]) {
    for (id, cents) in expected {
        assert_eq!(
            balances.get(id).copied(),
            Some(Money::new(*cents, 2)),
            "balance mismatch for {id}"
        );
    }
}

#[fixture]
fn ana_and_juan() -> (Ledger, ParticipantId, ParticipantId) {
    let mut ledger = Ledger::new();
    let ana = ledger.add_participant("Ana").expect("add ana");
    let juan = ledger.add_participant("Juan").expect("add juan");
    (ledger, ana, juan)
}

// One equal expense of 100 paid by Ana: Juan owes her exactly half.
#[rstest]
fn equal_expense_settles_with_one_transfer(
    ana_and_juan: (Ledger, ParticipantId, ParticipantId),
) {
    let (mut ledger, ana, juan) = ana_and_juan;
    ledger
        .add_expense(equal_expense("100", &ana, &[&ana, &juan]))
        .expect("add expense");

    let report = ledger.report();

    assert_balances(&report.balances.net, &[(&ana, 5000), (&juan, -5000)]);
    assert_eq!(
        report.transfers,
        vec![Transfer {
            from: juan,
            to: ana,
            amount: Money::from_i64(50),
        }]
    );
}

// 90 split by unit weights across three people, paid by the first: the two
// debtors each send their 30 straight to the payer.
#[rstest]
fn unit_weight_shares_produce_two_transfers() {
    let mut ledger = Ledger::new();
    let a = ledger.add_participant("A").expect("add");
    let b = ledger.add_participant("B").expect("add");
    let c = ledger.add_participant("C").expect("add");

    let mut draft = equal_expense("90", &a, &[&a, &b, &c]);
    draft.split = SplitDraft::Shares(split_values(&[(&a, "1"), (&b, "1"), (&c, "1")]));
    ledger.add_expense(draft).expect("add expense");

    let report = ledger.report();

    assert_balances(
        &report.balances.net,
        &[(&a, 6000), (&b, -3000), (&c, -3000)],
    );
    assert_eq!(report.transfers.len(), 2);
    let total_to_a: Money = report
        .transfers
        .iter()
        .filter(|transfer| transfer.to == a)
        .map(|transfer| transfer.amount)
        .sum();
    assert_eq!(total_to_a, Money::from_i64(60));
}

// Exact amounts 40+40 with a third participant defaulting to zero: the sum
// misses the 100 total beyond tolerance, so shares rescale by 1.25.
#[rstest]
fn short_exact_amounts_are_rescaled() {
    let mut ledger = Ledger::new();
    let a = ledger.add_participant("A").expect("add");
    let b = ledger.add_participant("B").expect("add");
    let c = ledger.add_participant("C").expect("add");

    let mut draft = equal_expense("100", &a, &[&a, &b, &c]);
    draft.split = SplitDraft::Exact(split_values(&[(&a, "40"), (&b, "40")]));
    ledger.add_expense(draft).expect("add expense");

    let sheet = ledger.balance_sheet();

    assert_balances(
        &sheet.owed_total,
        &[(&a, 5000), (&b, 5000), (&c, 0)],
    );
    assert_balances(&sheet.net, &[(&a, 5000), (&b, -5000), (&c, 0)]);
}

// A repayment covering the whole debt zeroes both nets; nothing remains to
// transfer. The raw view still shows the pre-payment balances.
#[rstest]
fn full_repayment_empties_the_plan(ana_and_juan: (Ledger, ParticipantId, ParticipantId)) {
    let (mut ledger, ana, juan) = ana_and_juan;
    ledger
        .add_expense(equal_expense("100", &ana, &[&ana, &juan]))
        .expect("add expense");
    ledger
        .add_payment(PaymentDraft {
            date: date(),
            from: juan.clone(),
            to: ana.clone(),
            amount: "50".to_string(),
            note: "cash back".to_string(),
        })
        .expect("add payment");

    let report = ledger.report();

    assert_balances(&report.balances.net, &[(&ana, 0), (&juan, 0)]);
    assert_balances(&report.balances.raw, &[(&ana, 5000), (&juan, -5000)]);
    assert!(report.transfers.is_empty());
}

// The plan's transfers, replayed against the net balances, zero every
// participant out.
#[rstest]
fn plan_exactly_offsets_net_balances() {
    let mut ledger = Ledger::new();
    let a = ledger.add_participant("A").expect("add");
    let b = ledger.add_participant("B").expect("add");
    let c = ledger.add_participant("C").expect("add");
    let d = ledger.add_participant("D").expect("add");

    ledger
        .add_expense(equal_expense("97,40", &a, &[&a, &b, &c, &d]))
        .expect("add expense");
    ledger
        .add_expense(equal_expense("12,60", &b, &[&b, &d]))
        .expect("add expense");
    ledger
        .add_payment(PaymentDraft {
            date: date(),
            from: c.clone(),
            to: a.clone(),
            amount: "5".to_string(),
            note: String::new(),
        })
        .expect("add payment");

    let report = ledger.report();

    let mut replay: ParticipantBalances = report
        .balances
        .net
        .keys()
        .map(|id| (id.clone(), Money::ZERO))
        .collect();
    for transfer in &report.transfers {
        assert!(transfer.amount.signum() > 0);
        assert_ne!(transfer.from, transfer.to);
        *replay.entry(transfer.from.clone()).or_insert(Money::ZERO) -= transfer.amount;
        *replay.entry(transfer.to.clone()).or_insert(Money::ZERO) += transfer.amount;
    }
    for (id, net) in &report.balances.net {
        let offset = replay.get(id).copied().unwrap_or(Money::ZERO);
        assert!(
            (offset.as_decimal() + net.as_decimal()).abs() <= rust_decimal::Decimal::new(1, 6),
            "residual balance for {id}"
        );
    }
}

// Removing a participant mid-trip reshapes history and the plan stays
// internally consistent.
#[rstest]
fn participant_removal_keeps_reports_consistent() {
    let mut ledger = Ledger::new();
    let a = ledger.add_participant("A").expect("add");
    let b = ledger.add_participant("B").expect("add");
    let c = ledger.add_participant("C").expect("add");

    ledger
        .add_expense(equal_expense("90", &a, &[&a, &b, &c]))
        .expect("add expense");
    ledger
        .add_payment(PaymentDraft {
            date: date(),
            from: b.clone(),
            to: a.clone(),
            amount: "10".to_string(),
            note: String::new(),
        })
        .expect("add payment");

    ledger.remove_participant(&b).expect("remove");

    let report = ledger.report();
    // The expense now splits 45/45 between the survivors; B's repayment
    // left with them.
    assert_balances(&report.balances.net, &[(&a, 4500), (&c, -4500)]);
    assert_eq!(
        report.transfers,
        vec![Transfer {
            from: c,
            to: a,
            amount: Money::from_i64(45),
        }]
    );
}
