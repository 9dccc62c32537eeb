//! Cheque - single-use bearer payment instrument
//!
//! A cheque moves money in two phases:
//!
//! ```text
//! issue:  drawer's slot becomes pending (nothing moves yet)
//! clear:  payee's deposit is credited, drawer's deposit is debited,
//!         drawer's slot returns to empty
//! ```
//!
//! Cheques drawn on the bank itself are *unbacked*: clearing them debits
//! nothing. This is how dividends and other bank-created money enter the
//! system; the matching entry is the bank's reduced equity
//! (`assets − liabilities`), not a tracked balance.
//!
//! `Cheque` is not `Clone`: depositing consumes it, so the
//! same cheque cannot be presented twice.

use crate::models::account::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the cheque protocol
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChequeError {
    #[error("Cheque amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Account {0} already has an outstanding cheque")]
    AlreadyPending(AccountId),

    #[error("Insufficient deposit to issue cheque: requested {requested}, available {available}")]
    InsufficientFunds { requested: i64, available: i64 },

    #[error("Cheque drawn by {0} is not outstanding")]
    NotOutstanding(Drawer),

    #[error("Cheque payable to {payee} presented by {presenter}")]
    WrongPayee {
        payee: AccountId,
        presenter: AccountId,
    },

    #[error("Drawer {0} is not open for the period")]
    DrawerNotOpen(Drawer),
}

/// Who a cheque is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drawer {
    /// Deposit-backed: clearing debits this account
    Account(AccountId),
    /// Bank-originated: clearing debits nothing
    Bank,
}

impl fmt::Display for Drawer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drawer::Account(id) => write!(f, "{}", id),
            Drawer::Bank => write!(f, "bank"),
        }
    }
}

/// Contents of an account's pending-cheque slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheque {
    pub payee: AccountId,
    pub amount: i64,
    pub issue_period: usize,
}

/// An issued, not yet cleared, cheque
#[derive(Debug, PartialEq, Eq)]
pub struct Cheque {
    drawer: Drawer,
    payee: AccountId,
    amount: i64,
    issue_period: usize,
}

impl Cheque {
    /// Only drawers create cheques; the amount has already been validated.
    pub(crate) fn new(drawer: Drawer, pending: PendingCheque) -> Self {
        debug_assert!(pending.amount > 0);
        Self {
            drawer,
            payee: pending.payee,
            amount: pending.amount,
            issue_period: pending.issue_period,
        }
    }

    pub fn drawer(&self) -> Drawer {
        self.drawer
    }

    pub fn payee(&self) -> AccountId {
        self.payee
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn issue_period(&self) -> usize {
        self.issue_period
    }

    /// True for cheques whose clearing debits nothing
    pub fn is_unbacked(&self) -> bool {
        self.drawer == Drawer::Bank
    }

    /// The slot entry this cheque must match when it clears
    pub(crate) fn pending(&self) -> PendingCheque {
        PendingCheque {
            payee: self.payee,
            amount: self.amount,
            issue_period: self.issue_period,
        }
    }
}

/// Anything that can write a cheque to a payee
///
/// Accounts write deposit-backed cheques; the bank writes unbacked ones.
/// The equity layer pays dividends through this trait without knowing
/// which kind of corporation it is paying for.
pub trait ChequeIssuer {
    fn issue_cheque(&mut self, payee: AccountId, amount: i64) -> Result<Cheque, ChequeError>;
}

/// Writes unbacked cheques on behalf of the bank for one period
///
/// Only the bank can build one; outside the crate, unbacked cheques come
/// from `Bank::issue_unbacked_cheque` and `Bank::pay_dividends`.
///
/// ```compile_fail
/// use monetary_core_rs::models::BankDrawer;
///
/// let drawer = BankDrawer::new(0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BankDrawer {
    period: usize,
}

impl BankDrawer {
    pub(crate) fn new(period: usize) -> Self {
        Self { period }
    }
}

impl ChequeIssuer for BankDrawer {
    fn issue_cheque(&mut self, payee: AccountId, amount: i64) -> Result<Cheque, ChequeError> {
        if amount <= 0 {
            return Err(ChequeError::NonPositiveAmount(amount));
        }
        Ok(Cheque::new(
            Drawer::Bank,
            PendingCheque {
                payee,
                amount,
                issue_period: self.period,
            },
        ))
    }
}
