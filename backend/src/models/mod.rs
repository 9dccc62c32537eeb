//! Ledger models: amounts, cheques, debt instruments, accounts and events

pub mod account;
pub mod amount;
pub mod cheque;
pub mod event;
pub mod loan;

// Re-exports
pub use account::{Account, AccountError, AccountId, OverdueRepayment, Repayment, WriteOff};
pub use amount::{checked_sum, Amount, AmountError};
pub use cheque::{BankDrawer, Cheque, ChequeError, ChequeIssuer, Drawer, PendingCheque};
pub use event::{Event, EventLog};
pub use loan::{interest_on, Installment, Loan, OverdueDebt, Rates, SHORT_TERM_HORIZON};
