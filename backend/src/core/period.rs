//! Per-period open/close state machine
//!
//! Accounts, the bank and capital stocks all follow the same lifecycle:
//!
//! ```text
//! created → open ⇄ closed → canceled (terminal)
//! ```
//!
//! Every `open()` must name the period immediately following the previous
//! `open()`. Anything else is a time-consistency fault.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle faults shared by every period-driven ledger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Already open in period {period}")]
    AlreadyOpen { period: usize },

    #[error("Not open")]
    NotOpen,

    #[error("Time-consistency fault: expected period {expected}, got {actual}")]
    OutOfSequence { expected: usize, actual: usize },

    #[error("Canceled")]
    Canceled,
}

/// Tracks the open flag, the last opened period and cancellation
///
/// # Example
/// ```
/// use monetary_core_rs::core::period::{PeriodError, PeriodGuard};
///
/// let mut guard = PeriodGuard::new();
/// guard.open(7).unwrap();
/// guard.close().unwrap();
/// assert_eq!(
///     guard.open(9),
///     Err(PeriodError::OutOfSequence { expected: 8, actual: 9 })
/// );
/// guard.open(8).unwrap();
/// assert_eq!(guard.ensure_open(), Ok(8));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodGuard {
    last_period: Option<usize>,
    is_open: bool,
    is_canceled: bool,
}

impl PeriodGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the given period
    ///
    /// The first call accepts any period; later calls require
    /// `period == previous + 1`.
    pub fn open(&mut self, period: usize) -> Result<(), PeriodError> {
        self.check_open(period)?;
        self.last_period = Some(period);
        self.is_open = true;
        Ok(())
    }

    /// The fault `open(period)` would raise, without changing anything
    pub fn check_open(&self, period: usize) -> Result<(), PeriodError> {
        if self.is_canceled {
            return Err(PeriodError::Canceled);
        }
        if self.is_open {
            return Err(PeriodError::AlreadyOpen {
                period: self.last_period.unwrap_or(period),
            });
        }
        match self.last_period {
            Some(last) if period != last + 1 => Err(PeriodError::OutOfSequence {
                expected: last + 1,
                actual: period,
            }),
            _ => Ok(()),
        }
    }

    pub fn close(&mut self) -> Result<(), PeriodError> {
        self.ensure_open()?;
        self.is_open = false;
        Ok(())
    }

    /// Enter the terminal state. Allowed whether open or closed.
    pub fn cancel(&mut self) -> Result<(), PeriodError> {
        if self.is_canceled {
            return Err(PeriodError::Canceled);
        }
        self.is_canceled = true;
        self.is_open = false;
        Ok(())
    }

    /// Current period, or the fault explaining why there is none
    pub fn ensure_open(&self) -> Result<usize, PeriodError> {
        if self.is_canceled {
            return Err(PeriodError::Canceled);
        }
        match (self.is_open, self.last_period) {
            (true, Some(period)) => Ok(period),
            _ => Err(PeriodError::NotOpen),
        }
    }

    /// Last opened period, open or not
    pub fn current(&self) -> Option<usize> {
        self.last_period
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_canceled(&self) -> bool {
        self.is_canceled
    }
}
