//! Account model
//!
//! One account per holder, kept by the bank. Each account has:
//! - a deposit ledger (i64 minor units, never negative)
//! - a debt ledger: loans in the order they were granted, plus at most one
//!   overdue debt
//! - a single pending-cheque slot
//!
//! # Repayment
//!
//! When an installment exceeds the deposit, the bank advances the shortfall
//! and books it as overdue debt at the penalty rate. The installment itself
//! is always debited in full; there is no partial-payment path.
//!
//! CRITICAL: All money values are i64 (minor units)

use crate::core::period::{PeriodError, PeriodGuard};
use crate::models::amount::{checked_sum, Amount, AmountError};
use crate::models::cheque::{Cheque, ChequeError, ChequeIssuer, Drawer, PendingCheque};
use crate::models::loan::{interest_on, Loan, OverdueDebt, Rates};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Index of an account inside its bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub usize);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account#{}", self.0)
    }
}

/// Errors that can occur during account operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Write-off of {requested} exceeds outstanding debt {outstanding}")]
    WriteOffExceedsDebt { requested: i64, outstanding: i64 },

    #[error("Ledger error: {0}")]
    Amount(#[from] AmountError),

    #[error("Cheque error: {0}")]
    Cheque(#[from] ChequeError),

    #[error("Period error: {0}")]
    Period(#[from] PeriodError),
}

/// Result of paying one loan installment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repayment {
    pub interest: i64,
    pub principal: i64,
    /// Shortfall advanced by the bank and booked as overdue debt
    pub advanced: i64,
}

/// Result of one overdue-debt recovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdueRepayment {
    /// Penalty interest capitalized before payment
    pub interest: i64,
    pub paid: i64,
    /// Overdue principal left unpaid
    pub remaining: i64,
}

/// How a write-off was applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOff {
    pub from_overdue: i64,
    pub from_loans: i64,
}

/// A holder's deposit and debt at the bank
///
/// # Example
/// ```
/// use monetary_core_rs::{Bank, BankConfig};
///
/// let mut bank = Bank::new("bank", BankConfig::default());
/// bank.open(0).unwrap();
/// let firm = bank.open_account("firm").unwrap();
///
/// let account = bank.account_mut(firm).unwrap();
/// account.borrow(10_000, 12, true).unwrap();
/// assert_eq!(account.amount(), 10_000);
/// assert_eq!(account.debt(), 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    holder: String,
    deposit: Amount,
    /// Oldest first
    loans: Vec<Loan>,
    overdue: Option<OverdueDebt>,
    pending_cheque: Option<PendingCheque>,
    rates: Rates,
    period: PeriodGuard,
}

impl Account {
    pub(crate) fn new(id: AccountId, holder: String, rates: Rates) -> Self {
        Self {
            id,
            holder,
            deposit: Amount::new(),
            loans: Vec::new(),
            overdue: None,
            pending_cheque: None,
            rates,
            period: PeriodGuard::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Deposit balance
    pub fn amount(&self) -> i64 {
        self.deposit.value()
    }

    /// Total debt: every loan's principal plus overdue debt
    ///
    /// Saturates at `i64::MAX`; operations that grow debt go through
    /// `checked_debt` first, so the cap is never reached through them.
    pub fn debt(&self) -> i64 {
        self.checked_debt().unwrap_or(i64::MAX)
    }

    pub fn checked_debt(&self) -> Result<i64, AmountError> {
        checked_sum(
            self.loans
                .iter()
                .map(Loan::principal)
                .chain(std::iter::once(self.overdue_debt())),
        )
    }

    /// Refuse growth of `extra` if total debt would pass `i64::MAX`
    fn ensure_debt_headroom(&self, extra: i64) -> Result<(), AmountError> {
        checked_sum([self.checked_debt()?, extra])?;
        Ok(())
    }

    pub fn overdue_debt(&self) -> i64 {
        self.overdue.as_ref().map_or(0, OverdueDebt::principal)
    }

    /// Loans maturing within the next 12 periods, plus overdue debt
    pub fn short_term_debt(&self) -> i64 {
        let period = self.period.current().unwrap_or(0);
        self.loans
            .iter()
            .filter(|loan| loan.is_short_term(period))
            .map(Loan::principal)
            .fold(self.overdue_debt(), i64::saturating_add)
    }

    pub fn long_term_debt(&self) -> i64 {
        let period = self.period.current().unwrap_or(0);
        self.loans
            .iter()
            .filter(|loan| !loan.is_short_term(period))
            .map(Loan::principal)
            .fold(0, i64::saturating_add)
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn overdue(&self) -> Option<&OverdueDebt> {
        self.overdue.as_ref()
    }

    pub fn pending_cheque(&self) -> Option<&PendingCheque> {
        self.pending_cheque.as_ref()
    }

    pub fn rates(&self) -> Rates {
        self.rates
    }

    pub fn is_open(&self) -> bool {
        self.period.is_open()
    }

    /// Last opened period
    pub fn current_period(&self) -> Option<usize> {
        self.period.current()
    }

    pub fn open(&mut self, period: usize) -> Result<(), AccountError> {
        self.period.open(period)?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), AccountError> {
        self.period.close()?;
        Ok(())
    }

    pub(crate) fn check_open(&self, period: usize) -> Result<(), PeriodError> {
        self.period.check_open(period)
    }

    pub(crate) fn check_close(&self) -> Result<(), PeriodError> {
        self.period.ensure_open().map(|_| ())
    }

    pub(crate) fn set_rates(&mut self, rates: Rates) {
        self.rates = rates;
    }

    /// Take a new loan at the current normal rate; the deposit is credited
    /// with the full amount
    pub fn borrow(&mut self, amount: i64, term: usize, amortizing: bool) -> Result<(), AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        let period = self.period.ensure_open()?;
        self.ensure_debt_headroom(amount)?;
        self.deposit.plus(amount)?;
        self.loans
            .push(Loan::new(amount, self.rates.normal, period, term, amortizing));
        Ok(())
    }

    /// Return an unused cheque and empty the slot
    pub fn void_cheque(&mut self, cheque: Cheque) -> Result<(), ChequeError> {
        self.match_pending(&cheque)?;
        self.pending_cheque = None;
        Ok(())
    }

    fn match_pending(&self, cheque: &Cheque) -> Result<(), ChequeError> {
        let drawn_here = cheque.drawer() == Drawer::Account(self.id);
        match self.pending_cheque {
            Some(pending) if drawn_here && pending == cheque.pending() => Ok(()),
            _ => Err(ChequeError::NotOutstanding(cheque.drawer())),
        }
    }

    /// Debit the drawer side of a cheque and empty the slot
    ///
    /// On error nothing changes.
    pub(crate) fn clear_cheque(&mut self, cheque: &Cheque) -> Result<(), AccountError> {
        self.match_pending(cheque)?;
        self.deposit.minus(cheque.amount())?;
        self.pending_cheque = None;
        Ok(())
    }

    /// Credit the payee side of a cheque
    pub(crate) fn receive(&mut self, amount: i64) -> Result<(), AccountError> {
        self.period.ensure_open()?;
        self.deposit.plus(amount)?;
        Ok(())
    }

    /// Recover overdue debt: capitalize penalty interest, then pay as much
    /// as the deposit allows. Returns `None` when nothing is overdue.
    pub fn pay_overdue(&mut self) -> Result<Option<OverdueRepayment>, AccountError> {
        self.period.ensure_open()?;
        let Some(principal) = self.overdue.as_ref().map(OverdueDebt::principal) else {
            return Ok(None);
        };
        self.ensure_debt_headroom(interest_on(principal, self.rates.penalty))?;
        let Some(overdue) = self.overdue.as_mut() else {
            return Ok(None);
        };

        let interest = overdue.accrue(self.rates.penalty)?;
        let paid = overdue.principal().min(self.deposit.value());
        self.deposit.minus(paid)?;
        overdue.reduce(paid)?;
        let remaining = overdue.principal();

        if remaining == 0 {
            self.overdue = None;
        }
        Ok(Some(OverdueRepayment {
            interest,
            paid,
            remaining,
        }))
    }

    /// Pay this period's installment on every loan, oldest first
    ///
    /// Loans paid off are removed from the account. Fails without change if
    /// the advances could push debt past `i64::MAX`.
    pub fn pay_loans(&mut self) -> Result<Vec<Repayment>, AccountError> {
        let period = self.period.ensure_open()?;
        // an advance never exceeds the installment's interest plus principal,
        // and the principal leaves the loan as it lands in overdue
        let interest = checked_sum(
            self.loans
                .iter()
                .map(|loan| loan.installment_due(period).interest),
        )?;
        self.ensure_debt_headroom(interest)?;
        let mut repayments = Vec::with_capacity(self.loans.len());

        for loan in self.loans.iter_mut() {
            let due = loan.installment_due(period);
            let total = due.total();
            let available = self.deposit.value();

            let mut advanced = 0;
            if total > available {
                advanced = total - available;
                self.overdue
                    .get_or_insert_with(OverdueDebt::new)
                    .add(advanced)?;
                self.deposit.plus(advanced)?;
            }

            self.deposit.minus(total)?;
            loan.amortize(due.principal)?;
            repayments.push(Repayment {
                interest: due.interest,
                principal: due.principal,
                advanced,
            });
        }

        self.loans.retain(|loan| !loan.is_repaid());
        Ok(repayments)
    }

    /// Cancel `amount` of debt without payment
    ///
    /// Overdue debt is reduced first, then loans in order, oldest first.
    pub fn cancel_debt(&mut self, amount: i64) -> Result<WriteOff, AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        let outstanding = self.debt();
        if amount > outstanding {
            return Err(AccountError::WriteOffExceedsDebt {
                requested: amount,
                outstanding,
            });
        }

        let overdue = self.overdue.get_or_insert_with(OverdueDebt::new);
        let from_overdue = amount.min(overdue.principal());
        overdue.reduce(from_overdue)?;
        if overdue.is_repaid() {
            self.overdue = None;
        }

        let mut remaining = amount - from_overdue;
        for loan in self.loans.iter_mut() {
            if remaining == 0 {
                break;
            }
            remaining -= loan.write_down(remaining)?;
        }
        self.loans.retain(|loan| !loan.is_repaid());

        Ok(WriteOff {
            from_overdue,
            from_loans: amount - from_overdue,
        })
    }
}

impl ChequeIssuer for Account {
    /// Write a deposit-backed cheque
    ///
    /// Fails if the amount is not positive, exceeds the deposit, or another
    /// cheque from this account is still outstanding.
    fn issue_cheque(&mut self, payee: AccountId, amount: i64) -> Result<Cheque, ChequeError> {
        if amount <= 0 {
            return Err(ChequeError::NonPositiveAmount(amount));
        }
        let drawer = Drawer::Account(self.id);
        let period = self
            .period
            .ensure_open()
            .map_err(|_| ChequeError::DrawerNotOpen(drawer))?;
        if self.pending_cheque.is_some() {
            return Err(ChequeError::AlreadyPending(self.id));
        }
        if amount > self.deposit.value() {
            return Err(ChequeError::InsufficientFunds {
                requested: amount,
                available: self.deposit.value(),
            });
        }

        let pending = PendingCheque {
            payee,
            amount,
            issue_period: period,
        };
        self.pending_cheque = Some(pending);
        Ok(Cheque::new(drawer, pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_account(rates: Rates) -> Account {
        let mut account = Account::new(AccountId(0), "firm".to_string(), rates);
        account.open(0).unwrap();
        account
    }

    #[test]
    fn test_borrow_credits_deposit() {
        let mut account = open_account(Rates::new(0.01, 0.01));
        account.borrow(5_000, 10, true).unwrap();
        assert_eq!(account.amount(), 5_000);
        assert_eq!(account.loans().len(), 1);
        assert_eq!(account.loans()[0].rate(), 0.01);
        assert_eq!(account.loans()[0].maturity(), 10);
    }

    #[test]
    fn test_borrow_requires_positive_amount() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        assert_eq!(
            account.borrow(0, 10, true),
            Err(AccountError::NonPositiveAmount(0))
        );
    }

    #[test]
    fn test_borrow_requires_open_period() {
        let mut account = Account::new(AccountId(0), "x".to_string(), Rates::new(0.0, 0.0));
        assert_eq!(
            account.borrow(100, 1, false),
            Err(AccountError::Period(PeriodError::NotOpen))
        );
    }

    #[test]
    fn test_borrow_past_max_debt_is_refused() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        account.borrow(i64::MAX, 12, true).unwrap();
        assert_eq!(
            account.borrow(1, 12, true),
            Err(AccountError::Amount(AmountError::Overflow {
                value: i64::MAX,
                amount: 1
            }))
        );
        assert_eq!(account.amount(), i64::MAX);
        assert_eq!(account.loans().len(), 1);
        assert_eq!(account.checked_debt(), Ok(i64::MAX));
    }

    #[test]
    fn test_penalty_interest_past_max_is_refused() {
        let mut account = open_account(Rates::new(0.0, 0.5));
        account.overdue = Some(OverdueDebt::new());
        account.overdue.as_mut().unwrap().add(i64::MAX - 10).unwrap();

        assert!(matches!(
            account.pay_overdue(),
            Err(AccountError::Amount(AmountError::Overflow { .. }))
        ));
        assert_eq!(account.overdue_debt(), i64::MAX - 10);
    }

    #[test]
    fn test_second_cheque_while_pending_fails() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        account.borrow(1_000, 12, true).unwrap();
        let _first = account.issue_cheque(AccountId(1), 100).unwrap();
        assert_eq!(
            account.issue_cheque(AccountId(1), 100),
            Err(ChequeError::AlreadyPending(AccountId(0)))
        );
    }

    #[test]
    fn test_void_frees_slot() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        account.borrow(1_000, 12, true).unwrap();
        let cheque = account.issue_cheque(AccountId(1), 100).unwrap();
        account.void_cheque(cheque).unwrap();
        assert!(account.pending_cheque().is_none());
        assert_eq!(account.amount(), 1_000);
        assert!(account.issue_cheque(AccountId(1), 100).is_ok());
    }

    #[test]
    fn test_cancel_debt_creates_no_phantom_overdue() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        account.borrow(1_000, 12, true).unwrap();
        let write_off = account.cancel_debt(400).unwrap();
        assert_eq!(
            write_off,
            WriteOff {
                from_overdue: 0,
                from_loans: 400
            }
        );
        assert!(account.overdue().is_none());
        assert_eq!(account.debt(), 600);
    }

    #[test]
    fn test_pay_overdue_leaves_residual_when_deposit_short() {
        let mut account = open_account(Rates::new(0.0, 0.0));
        account.overdue = Some(OverdueDebt::new());
        account.overdue.as_mut().unwrap().add(1_000).unwrap();
        account.deposit.plus(300).unwrap();

        let repayment = account.pay_overdue().unwrap().unwrap();
        assert_eq!(repayment.paid, 300);
        assert_eq!(repayment.remaining, 700);
        assert_eq!(account.amount(), 0);
        assert_eq!(account.overdue_debt(), 700);
    }
}
