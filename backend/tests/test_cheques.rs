//! Tests for the cheque protocol
//!
//! Issue → deposit → clear, one outstanding cheque per account.
//! CRITICAL: All money values are i64 (minor units)

use monetary_core_rs::{
    AccountError, AmountError, Bank, BankConfig, BankError, ChequeError, ChequeIssuer, Drawer,
    RateConfig,
};

fn interest_free() -> BankConfig {
    BankConfig {
        rates: RateConfig {
            initial_rate: 0.0,
            penalty_premium: 0.0,
            ..RateConfig::default()
        },
        ..BankConfig::default()
    }
}

#[test]
fn test_deposit_moves_money_between_accounts() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();

    bank.borrow(firm, 10_000, 12, true).unwrap();
    let wage = bank.issue_cheque(firm, household, 2_500).unwrap();

    // nothing moves at issue
    assert_eq!(bank.account(firm).unwrap().amount(), 10_000);
    assert_eq!(wage.drawer(), Drawer::Account(firm));
    assert_eq!(wage.issue_period(), 0);

    bank.deposit(household, wage).unwrap();
    assert_eq!(bank.account(firm).unwrap().amount(), 7_500);
    assert_eq!(bank.account(household).unwrap().amount(), 2_500);
    assert!(bank.account(firm).unwrap().pending_cheque().is_none());
    assert_eq!(bank.deposits_total(), 10_000);
}

#[test]
fn test_cheque_larger_than_deposit_is_refused() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 100, 12, true).unwrap();

    assert_eq!(
        bank.issue_cheque(firm, household, 101),
        Err(BankError::Cheque(ChequeError::InsufficientFunds {
            requested: 101,
            available: 100
        }))
    );
    assert!(bank.account(firm).unwrap().pending_cheque().is_none());
}

#[test]
fn test_non_positive_cheque_is_refused() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();

    assert_eq!(
        bank.issue_cheque(firm, firm, 0),
        Err(BankError::Cheque(ChequeError::NonPositiveAmount(0)))
    );
    assert_eq!(
        bank.issue_cheque(firm, firm, -5),
        Err(BankError::Cheque(ChequeError::NonPositiveAmount(-5)))
    );
}

#[test]
fn test_second_cheque_while_outstanding_is_refused() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 12, true).unwrap();

    let first = bank.issue_cheque(firm, household, 100).unwrap();
    assert_eq!(
        bank.issue_cheque(firm, household, 100),
        Err(BankError::Cheque(ChequeError::AlreadyPending(firm)))
    );

    // clearing the first frees the slot
    bank.deposit(household, first).unwrap();
    assert!(bank.issue_cheque(firm, household, 100).is_ok());
}

#[test]
fn test_cheque_survives_period_boundary() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 12, false).unwrap();
    let cheque = bank.issue_cheque(firm, household, 300).unwrap();
    bank.close().unwrap();

    bank.open(1).unwrap();
    bank.deposit(household, cheque).unwrap();
    assert_eq!(bank.account(household).unwrap().amount(), 300);
}

#[test]
fn test_clearing_fails_when_installments_drained_drawer() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();

    // due in full this period
    bank.borrow(firm, 1_000, 0, true).unwrap();
    let cheque = bank.issue_cheque(firm, household, 500).unwrap();
    bank.debt_recovery().unwrap();
    assert_eq!(bank.account(firm).unwrap().amount(), 0);

    let err = bank.deposit(household, cheque).unwrap_err();
    assert_eq!(
        err,
        BankError::Account(AccountError::Amount(AmountError::Insufficient {
            requested: 500,
            available: 0
        }))
    );
    assert_eq!(bank.account(household).unwrap().amount(), 0);
    assert!(bank.account(firm).unwrap().pending_cheque().is_some());
}

#[test]
fn test_void_returns_slot_without_moving_money() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 12, true).unwrap();

    let cheque = bank.issue_cheque(firm, household, 400).unwrap();
    bank.void_cheque(cheque).unwrap();

    assert_eq!(bank.account(firm).unwrap().amount(), 1_000);
    assert!(bank.account(firm).unwrap().pending_cheque().is_none());
}

#[test]
fn test_void_of_foreign_cheque_is_refused() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let other = bank.open_account("other").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 1_000, 12, true).unwrap();

    let cheque = bank.issue_cheque(firm, other, 400).unwrap();
    assert_eq!(
        bank.account_mut(other).unwrap().void_cheque(cheque),
        Err(ChequeError::NotOutstanding(Drawer::Account(firm)))
    );
}

#[test]
fn test_unbacked_cheque_debits_nothing() {
    let mut bank = Bank::new("bank", interest_free());
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();

    let cheque = bank.issue_unbacked_cheque(household, 700).unwrap();
    assert!(cheque.is_unbacked());
    bank.deposit(household, cheque).unwrap();

    let totals = bank.totals();
    assert_eq!(totals.deposits, 700);
    assert_eq!(totals.capital, -700);
}

#[test]
fn test_account_writes_cheques_through_issuer_trait() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 500, 12, true).unwrap();

    let account = bank.account_mut(firm).unwrap();
    let cheque = account.issue_cheque(household, 200).unwrap();
    assert_eq!(account.pending_cheque().map(|p| p.amount), Some(200));

    bank.deposit(household, cheque).unwrap();
    assert_eq!(bank.account(firm).unwrap().amount(), 300);
}

#[test]
fn test_cheques_refused_while_bank_closed() {
    let mut bank = Bank::new("bank", interest_free());
    let firm = bank.open_account("firm").unwrap();
    let household = bank.open_account("household").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 500, 12, true).unwrap();
    bank.close().unwrap();

    assert_eq!(
        bank.account_mut(firm).unwrap().issue_cheque(household, 100),
        Err(ChequeError::DrawerNotOpen(Drawer::Account(firm)))
    );
    assert!(bank.issue_unbacked_cheque(household, 100).is_err());
}
