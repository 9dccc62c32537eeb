//! Monetary Core - accounting engine for agent-based economies
//!
//! Money transfer by cheque, bank debt with overdue escalation and
//! write-off, and corporate equity with exact-remainder allocation.
//!
//! # Architecture
//!
//! - **core**: Period lifecycle and clock
//! - **models**: Ledger types (Amount, Cheque, Loan, Account, Event)
//! - **bank**: Accounts, rate setting, debt recovery, dividends, phases
//! - **equity**: Capital stock, certificates, allocation arithmetic
//! - **snapshot**: Reporting snapshots, state hashing, validation
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (minor units) and no ledger goes negative
//! 2. Allocations sum back to their totals exactly
//! 3. Every protocol violation is returned as an error, never absorbed

// Module declarations
pub mod bank;
pub mod core;
pub mod equity;
pub mod models;
pub mod rng;
pub mod snapshot;

// Re-exports for convenience
pub use bank::{
    Bank, BankConfig, BankError, BankPhase, BankSchedule, BankTotals, FixedInflation,
    InflationSeries, InflationSignal, NoInflation, PhaseOutcome, RateConfig, RateController,
    RecoveryReport, ScheduleError,
};
pub use crate::core::{PeriodClock, PeriodError, PeriodGuard, PERIODS_PER_YEAR};
pub use equity::{CapitalStock, CertificateId, EquityError, StockCertificate, SHARES_AUTHORIZED};
pub use models::{
    account::{Account, AccountError, AccountId},
    amount::{Amount, AmountError},
    cheque::{Cheque, ChequeError, ChequeIssuer, Drawer},
    event::{Event, EventLog},
    loan::{Loan, OverdueDebt, Rates},
};
pub use rng::DeterministicRng;
pub use snapshot::{compute_state_hash, validate_snapshot, BankSnapshot, SnapshotError};
