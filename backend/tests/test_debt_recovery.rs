//! Tests for loan repayment, overdue escalation and write-off
//!
//! CRITICAL: All money values are i64 (minor units)

use monetary_core_rs::{
    AccountError, AccountId, Bank, BankConfig, BankError, Event, RateConfig,
};

fn config(rate: f64, premium: f64) -> BankConfig {
    BankConfig {
        rates: RateConfig {
            initial_rate: rate,
            penalty_premium: premium,
            ..RateConfig::default()
        },
        ..BankConfig::default()
    }
}

/// Spend `amount` from `from` into a sink account
fn spend(bank: &mut Bank, from: AccountId, sink: AccountId, amount: i64) {
    let cheque = bank.issue_cheque(from, sink, amount).unwrap();
    bank.deposit(sink, cheque).unwrap();
}

fn next_period(bank: &mut Bank) {
    let period = bank.current_period().unwrap();
    bank.close().unwrap();
    bank.open(period + 1).unwrap();
}

#[test]
fn test_amortizing_loan_schedule() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_200, 2, true).unwrap();

    let mut principal_paid = Vec::new();
    for _ in 0..3 {
        let report = bank.debt_recovery().unwrap();
        principal_paid.push(report.principal);
        next_period(&mut bank);
    }

    assert_eq!(principal_paid, vec![400, 400, 400]);
    assert!(bank.account(firm).unwrap().loans().is_empty());
    assert_eq!(bank.account(firm).unwrap().debt(), 0);
}

#[test]
fn test_bullet_loan_pays_interest_until_maturity() {
    let mut bank = Bank::new("bank", config(0.01, 0.0));
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 10_000, 2, false).unwrap();

    let first = bank.debt_recovery().unwrap();
    assert_eq!((first.interest, first.principal), (100, 0));
    next_period(&mut bank);

    let second = bank.debt_recovery().unwrap();
    assert_eq!((second.interest, second.principal), (100, 0));
    next_period(&mut bank);

    let last = bank.debt_recovery().unwrap();
    assert_eq!((last.interest, last.principal), (100, 10_000));
    // two periods of interest left 9_800 against 10_100 due
    assert_eq!(last.advanced, 300);
    assert_eq!(bank.account(firm).unwrap().overdue_debt(), 300);
    assert!(bank.account(firm).unwrap().loans().is_empty());
}

#[test]
fn test_shortfall_becomes_overdue_and_installment_debited_in_full() {
    let mut bank = Bank::new("bank", config(0.01, 0.01));
    let firm = bank.open_account("firm").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();

    bank.borrow(firm, 1_000, 0, false).unwrap();
    spend(&mut bank, firm, sink, 800);

    let report = bank.debt_recovery().unwrap();
    // installment 1_000 + 10 against a deposit of 200
    assert_eq!(report.interest, 10);
    assert_eq!(report.principal, 1_000);
    assert_eq!(report.advanced, 810);

    let account = bank.account(firm).unwrap();
    assert_eq!(account.amount(), 0);
    assert_eq!(account.overdue_debt(), 810);
    assert!(account.loans().is_empty());

    assert_eq!(bank.event_log().events_of_type("OverdueAdvance").len(), 1);
}

#[test]
fn test_overdue_accrues_penalty_and_leaves_residual() {
    let mut bank = Bank::new("bank", config(0.01, 0.01));
    let firm = bank.open_account("firm").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 0, false).unwrap();
    spend(&mut bank, firm, sink, 800);
    bank.debt_recovery().unwrap();

    // nothing to pay with: penalty capitalizes
    next_period(&mut bank);
    let report = bank.debt_recovery().unwrap();
    assert_eq!(report.overdue_interest, 16);
    assert_eq!(report.overdue_recovered, 0);
    assert_eq!(report.overdue_unpaid, 826);

    // partial recovery from a fresh deposit
    next_period(&mut bank);
    let cheque = bank.issue_unbacked_cheque(firm, 500).unwrap();
    bank.deposit(firm, cheque).unwrap();
    let report = bank.debt_recovery().unwrap();
    assert_eq!(report.overdue_interest, 16);
    assert_eq!(report.overdue_recovered, 500);
    assert_eq!(report.overdue_unpaid, 342);
    assert_eq!(bank.account(firm).unwrap().overdue_debt(), 342);
    assert_eq!(bank.account(firm).unwrap().amount(), 0);
}

#[test]
fn test_overdue_recovered_before_loans() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();

    // period 0: 100 escalates to overdue
    bank.borrow(firm, 100, 0, true).unwrap();
    spend(&mut bank, firm, sink, 100);
    bank.debt_recovery().unwrap();
    assert_eq!(bank.account(firm).unwrap().overdue_debt(), 100);

    // period 1: deposit of 150 against overdue 100 and an installment of 100
    next_period(&mut bank);
    bank.borrow(firm, 200, 1, true).unwrap();
    spend(&mut bank, firm, sink, 50);
    let report = bank.debt_recovery().unwrap();

    assert_eq!(report.overdue_recovered, 100);
    assert_eq!(report.principal, 100);
    assert_eq!(report.advanced, 50);
    assert_eq!(bank.account(firm).unwrap().overdue_debt(), 50);
}

#[test]
fn test_all_overdue_processed_before_any_loan() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let a = bank.open_account("a").unwrap();
    let b = bank.open_account("b").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();
    for id in [a, b] {
        bank.borrow(id, 100, 0, true).unwrap();
        spend(&mut bank, id, sink, 100);
    }
    bank.debt_recovery().unwrap();

    next_period(&mut bank);
    bank.borrow(a, 500, 5, true).unwrap();
    bank.borrow(b, 500, 5, true).unwrap();
    bank.debt_recovery().unwrap();

    let kinds: Vec<&str> = bank
        .event_log()
        .events_in_period(1)
        .into_iter()
        .filter(|e| matches!(e, Event::OverdueRecovered { .. } | Event::InstallmentPaid { .. }))
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        kinds,
        vec!["OverdueRecovered", "OverdueRecovered", "InstallmentPaid", "InstallmentPaid"]
    );
}

#[test]
fn test_write_off_reduces_overdue_then_oldest_loan() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 100, 0, true).unwrap();
    spend(&mut bank, firm, sink, 100);
    bank.debt_recovery().unwrap();

    next_period(&mut bank);
    bank.borrow(firm, 300, 24, false).unwrap();
    bank.borrow(firm, 500, 24, false).unwrap();
    assert_eq!(bank.account(firm).unwrap().debt(), 900);

    let write_off = bank.cancel_debt(firm, 250).unwrap();
    assert_eq!((write_off.from_overdue, write_off.from_loans), (100, 150));
    let principals: Vec<i64> = bank
        .account(firm)
        .unwrap()
        .loans()
        .iter()
        .map(|l| l.principal())
        .collect();
    assert_eq!(principals, vec![150, 500]);
    assert!(bank.account(firm).unwrap().overdue().is_none());

    bank.cancel_debt(firm, 200).unwrap();
    let principals: Vec<i64> = bank
        .account(firm)
        .unwrap()
        .loans()
        .iter()
        .map(|l| l.principal())
        .collect();
    assert_eq!(principals, vec![450]);
}

#[test]
fn test_write_off_beyond_debt_is_refused() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 300, 12, true).unwrap();

    assert_eq!(
        bank.cancel_debt(firm, 301),
        Err(BankError::Account(AccountError::WriteOffExceedsDebt {
            requested: 301,
            outstanding: 300
        }))
    );
    assert_eq!(bank.account(firm).unwrap().debt(), 300);
}

#[test]
fn test_write_off_lowers_bank_capital() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 12, true).unwrap();
    assert_eq!(bank.totals().capital, 0);

    bank.cancel_debt(firm, 400).unwrap();
    assert_eq!(bank.totals().capital, -400);
    assert_eq!(bank.event_log().events_of_type("DebtCancelled").len(), 1);
}

#[test]
fn test_short_and_long_term_classification() {
    let mut bank = Bank::new("bank", config(0.0, 0.0));
    let firm = bank.open_account("firm").unwrap();
    let sink = bank.open_account("sink").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 50, 0, true).unwrap();
    spend(&mut bank, firm, sink, 50);
    bank.debt_recovery().unwrap();

    next_period(&mut bank);
    bank.borrow(firm, 1_000, 6, false).unwrap();
    bank.borrow(firm, 2_000, 36, false).unwrap();

    let account = bank.account(firm).unwrap();
    assert_eq!(account.short_term_debt(), 1_050);
    assert_eq!(account.long_term_debt(), 2_000);

    let totals = bank.totals();
    assert_eq!(totals.short_term_debt + totals.long_term_debt, totals.assets());
    assert_eq!(totals.loan_count, 2);
}
