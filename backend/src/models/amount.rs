//! Amount - the non-negative ledger cell
//!
//! Every deposit, loan principal, overdue balance and book value is an
//! `Amount`. It only moves through guarded `plus`/`minus`, so a ledger can
//! never be driven below zero.
//!
//! CRITICAL: All money values are i64 (minor units)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by guarded ledger arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount must be non-negative, got {0}")]
    Negative(i64),

    #[error("Insufficient amount: requested {requested}, available {available}")]
    Insufficient { requested: i64, available: i64 },

    #[error("Ledger overflow: {value} + {amount} exceeds i64::MAX")]
    Overflow { value: i64, amount: i64 },
}

/// Non-negative integer ledger cell
///
/// # Example
/// ```
/// use monetary_core_rs::Amount;
///
/// let mut deposit = Amount::new();
/// deposit.plus(500).unwrap();
/// deposit.minus(200).unwrap();
/// assert_eq!(deposit.value(), 300);
///
/// assert!(deposit.minus(301).is_err());
/// assert_eq!(deposit.value(), 300);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount {
    value: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { value: 0 };

    pub fn new() -> Self {
        Self::ZERO
    }

    /// Create a cell holding `value`
    pub fn with_value(value: i64) -> Result<Self, AmountError> {
        if value < 0 {
            return Err(AmountError::Negative(value));
        }
        Ok(Self { value })
    }

    /// For callers that have already checked the sign
    pub(crate) fn from_non_negative(value: i64) -> Self {
        debug_assert!(value >= 0);
        Self {
            value: value.max(0),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Increase by `amount` (must be ≥ 0)
    ///
    /// On error the cell is left untouched.
    pub fn plus(&mut self, amount: i64) -> Result<(), AmountError> {
        if amount < 0 {
            return Err(AmountError::Negative(amount));
        }
        self.value = self
            .value
            .checked_add(amount)
            .ok_or(AmountError::Overflow {
                value: self.value,
                amount,
            })?;
        Ok(())
    }

    /// Decrease by `amount` (must be ≥ 0 and ≤ current value)
    ///
    /// On error the cell is left untouched.
    pub fn minus(&mut self, amount: i64) -> Result<(), AmountError> {
        if amount < 0 {
            return Err(AmountError::Negative(amount));
        }
        if amount > self.value {
            return Err(AmountError::Insufficient {
                requested: amount,
                available: self.value,
            });
        }
        self.value -= amount;
        Ok(())
    }

    /// Reset to zero
    pub fn cancel(&mut self) {
        self.value = 0;
    }
}

/// Sum ledger values, failing instead of wrapping past `i64::MAX`
pub fn checked_sum<I>(values: I) -> Result<i64, AmountError>
where
    I: IntoIterator<Item = i64>,
{
    values.into_iter().try_fold(0i64, |total, value| {
        total.checked_add(value).ok_or(AmountError::Overflow {
            value: total,
            amount: value,
        })
    })
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
