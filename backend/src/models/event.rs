//! Event logging for ledger auditing and replay.
//!
//! Every movement the bank books is captured as an `Event`. The log lets
//! callers:
//! - Audit money creation and destruction period by period
//! - Debug overdue escalation and write-offs
//! - Feed the reporting layer without re-deriving flows from balances
//!
//! # Example
//!
//! ```rust
//! use monetary_core_rs::models::{AccountId, Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::LoanGranted {
//!     period: 3,
//!     account: AccountId(0),
//!     amount: 10_000,
//!     term: 12,
//!     amortizing: true,
//!     rate: 0.004,
//! });
//! assert_eq!(log.events_in_period(3).len(), 1);
//! ```

use crate::bank::BankTotals;
use crate::equity::CertificateId;
use crate::models::account::AccountId;
use crate::models::cheque::Drawer;
use serde::{Deserialize, Serialize};

/// Ledger event capturing a state change.
///
/// All events carry the period in which they were booked and are logged in
/// the order they occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Bank opened a new period
    PeriodOpened { period: usize },

    /// Lending rates set for the period
    RatesUpdated {
        period: usize,
        normal: f64,
        penalty: f64,
        inflation: Option<f64>,
    },

    /// New loan credited to a deposit
    LoanGranted {
        period: usize,
        account: AccountId,
        amount: i64,
        term: usize,
        amortizing: bool,
        rate: f64,
    },

    /// Cheque written (nothing has moved yet)
    ChequeIssued {
        period: usize,
        drawer: Drawer,
        payee: AccountId,
        amount: i64,
    },

    /// Cheque deposited and cleared
    ChequeCleared {
        period: usize,
        drawer: Drawer,
        payee: AccountId,
        amount: i64,
    },

    /// Loan installment paid
    InstallmentPaid {
        period: usize,
        account: AccountId,
        interest: i64,
        principal: i64,
    },

    /// Bank advanced an installment shortfall as overdue debt
    OverdueAdvance {
        period: usize,
        account: AccountId,
        shortfall: i64,
    },

    /// Overdue debt recovery
    OverdueRecovered {
        period: usize,
        account: AccountId,
        interest: i64,
        paid: i64,
        remaining: i64,
    },

    /// Debt written off without payment
    DebtCancelled {
        period: usize,
        account: AccountId,
        amount: i64,
        from_overdue: i64,
    },

    /// Dividend set on the bank's capital stock
    DividendDeclared { period: usize, total: i64 },

    /// Dividend cheque paid to a shareholder
    DividendPaid {
        period: usize,
        certificate: CertificateId,
        holder: AccountId,
        amount: i64,
    },

    /// Bank closed the period
    PeriodClosed { period: usize, totals: BankTotals },
}

impl Event {
    /// Period in which the event was booked
    pub fn period(&self) -> usize {
        match self {
            Event::PeriodOpened { period } => *period,
            Event::RatesUpdated { period, .. } => *period,
            Event::LoanGranted { period, .. } => *period,
            Event::ChequeIssued { period, .. } => *period,
            Event::ChequeCleared { period, .. } => *period,
            Event::InstallmentPaid { period, .. } => *period,
            Event::OverdueAdvance { period, .. } => *period,
            Event::OverdueRecovered { period, .. } => *period,
            Event::DebtCancelled { period, .. } => *period,
            Event::DividendDeclared { period, .. } => *period,
            Event::DividendPaid { period, .. } => *period,
            Event::PeriodClosed { period, .. } => *period,
        }
    }

    /// Short name of the event kind
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PeriodOpened { .. } => "PeriodOpened",
            Event::RatesUpdated { .. } => "RatesUpdated",
            Event::LoanGranted { .. } => "LoanGranted",
            Event::ChequeIssued { .. } => "ChequeIssued",
            Event::ChequeCleared { .. } => "ChequeCleared",
            Event::InstallmentPaid { .. } => "InstallmentPaid",
            Event::OverdueAdvance { .. } => "OverdueAdvance",
            Event::OverdueRecovered { .. } => "OverdueRecovered",
            Event::DebtCancelled { .. } => "DebtCancelled",
            Event::DividendDeclared { .. } => "DividendDeclared",
            Event::DividendPaid { .. } => "DividendPaid",
            Event::PeriodClosed { .. } => "PeriodClosed",
        }
    }

    /// Accounts touched by the event
    pub fn involves(&self, id: AccountId) -> bool {
        match self {
            Event::LoanGranted { account, .. }
            | Event::InstallmentPaid { account, .. }
            | Event::OverdueAdvance { account, .. }
            | Event::OverdueRecovered { account, .. }
            | Event::DebtCancelled { account, .. } => *account == id,
            Event::ChequeIssued { drawer, payee, .. } | Event::ChequeCleared { drawer, payee, .. } => {
                *payee == id || *drawer == Drawer::Account(id)
            }
            Event::DividendPaid { holder, .. } => *holder == id,
            _ => false,
        }
    }
}

/// Event log for storing and querying ledger events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_in_period(&self, period: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.period() == period).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_account(&self, id: AccountId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.involves(id)).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
