//! Debt instruments: Loan and OverdueDebt
//!
//! A `Loan` carries its own rate and maturity. Each period it asks for an
//! installment of interest plus the principal due:
//!
//! ```text
//! interest      = floor(principal × rate)
//! principal_due = principal                          if remaining term == 0
//!               = floor(principal / (remaining + 1)) if amortizing
//!               = 0                                  otherwise (bullet)
//! ```
//!
//! `OverdueDebt` has no rate or term of its own; it accrues at the bank's
//! penalty rate and is repaid from whatever deposit is available.

use crate::models::amount::{Amount, AmountError};
use serde::{Deserialize, Serialize};

/// Loans maturing within this many periods count as short-term debt
pub const SHORT_TERM_HORIZON: usize = 12;

/// Interest rates applied by the bank for the current period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Rate charged on new loans
    pub normal: f64,
    /// Rate charged on overdue debt (normal + premium)
    pub penalty: f64,
}

impl Rates {
    /// Create the rates for one period
    ///
    /// # Arguments
    /// * `normal` - Per-period rate on new loans
    /// * `penalty_premium` - Added to `normal` for overdue debt
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::Rates;
    ///
    /// let rates = Rates::new(0.01, 0.005);
    /// assert_eq!(rates.normal, 0.01);
    /// assert_eq!(rates.penalty, 0.015);
    /// ```
    pub fn new(normal: f64, penalty_premium: f64) -> Self {
        Self {
            normal,
            penalty: normal + penalty_premium,
        }
    }
}

/// `floor(principal × rate)`, never negative
///
/// # Arguments
/// * `principal` - Balance the rate applies to (minor units)
/// * `rate` - Per-period rate; negative rates yield zero interest
///
/// # Example
/// ```
/// use monetary_core_rs::models::loan::interest_on;
///
/// assert_eq!(interest_on(1000, 0.0125), 12);
/// assert_eq!(interest_on(1000, -0.01), 0);
/// ```
pub fn interest_on(principal: i64, rate: f64) -> i64 {
    ((principal as f64) * rate).floor().max(0.0) as i64
}

/// Interest and principal making up one scheduled payment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub interest: i64,
    pub principal: i64,
}

impl Installment {
    /// Interest plus principal, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.interest.saturating_add(self.principal)
    }
}

/// A bank loan held by one account
///
/// # Example
/// ```
/// use monetary_core_rs::models::loan::{Installment, Loan};
///
/// // 1200 over 2 more periods, amortizing at 1% per period
/// let loan = Loan::new(1200, 0.01, 10, 2, true);
/// assert_eq!(
///     loan.installment_due(10),
///     Installment { interest: 12, principal: 400 }
/// );
/// // at maturity everything left is due
/// assert_eq!(loan.installment_due(12).principal, 1200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    principal: Amount,
    rate: f64,
    start_period: usize,
    maturity: usize,
    amortizing: bool,
}

impl Loan {
    /// Create a loan of `principal` taken in `period`, maturing after `term`
    /// further periods
    ///
    /// # Arguments
    /// * `principal` - Amount lent (minor units)
    /// * `rate` - Per-period rate, fixed for the life of the loan
    /// * `period` - Period the loan is granted in
    /// * `term` - Periods until maturity; 0 means due in `period`
    /// * `amortizing` - Repay principal in equal slices instead of at maturity
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::Loan;
    ///
    /// let loan = Loan::new(5_000, 0.01, 3, 12, false);
    /// assert_eq!(loan.start_period(), 3);
    /// assert_eq!(loan.maturity(), 15);
    /// assert!(!loan.is_amortizing());
    /// ```
    ///
    /// # Panics
    /// Panics if principal <= 0
    pub fn new(principal: i64, rate: f64, period: usize, term: usize, amortizing: bool) -> Self {
        assert!(principal > 0, "principal must be positive");
        Self {
            principal: Amount::from_non_negative(principal),
            rate,
            start_period: period,
            maturity: period + term,
            amortizing,
        }
    }

    pub fn principal(&self) -> i64 {
        self.principal.value()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn start_period(&self) -> usize {
        self.start_period
    }

    pub fn maturity(&self) -> usize {
        self.maturity
    }

    pub fn is_amortizing(&self) -> bool {
        self.amortizing
    }

    /// Periods left before maturity (0 once matured)
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::Loan;
    ///
    /// let loan = Loan::new(100, 0.0, 0, 5, true);
    /// assert_eq!(loan.remaining_term(2), 3);
    /// assert_eq!(loan.remaining_term(9), 0);
    /// ```
    pub fn remaining_term(&self, period: usize) -> usize {
        self.maturity.saturating_sub(period)
    }

    /// Whether the loan matures within `SHORT_TERM_HORIZON` periods
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::Loan;
    ///
    /// let loan = Loan::new(100, 0.0, 0, 24, true);
    /// assert!(!loan.is_short_term(0));
    /// assert!(loan.is_short_term(13));
    /// ```
    pub fn is_short_term(&self, period: usize) -> bool {
        self.remaining_term(period) < SHORT_TERM_HORIZON
    }

    pub fn is_repaid(&self) -> bool {
        self.principal.is_zero()
    }

    /// Installment the borrower owes in `period`
    ///
    /// # Arguments
    /// * `period` - Period being settled; past maturity the whole principal is due
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::Loan;
    ///
    /// // bullet loan: interest only until maturity
    /// let loan = Loan::new(10_000, 0.005, 0, 3, false);
    /// assert_eq!(loan.installment_due(1).interest, 50);
    /// assert_eq!(loan.installment_due(1).principal, 0);
    /// assert_eq!(loan.installment_due(3).total(), 10_050);
    /// ```
    pub fn installment_due(&self, period: usize) -> Installment {
        let principal = self.principal.value();
        let remaining = self.remaining_term(period);
        let principal_due = if remaining == 0 {
            principal
        } else if self.amortizing {
            principal / (remaining as i64 + 1)
        } else {
            0
        };
        Installment {
            interest: interest_on(principal, self.rate),
            principal: principal_due,
        }
    }

    pub(crate) fn amortize(&mut self, amount: i64) -> Result<(), AmountError> {
        self.principal.minus(amount)
    }

    /// Write down up to `amount`; returns how much was written off
    pub(crate) fn write_down(&mut self, amount: i64) -> Result<i64, AmountError> {
        let cut = amount.min(self.principal.value());
        self.principal.minus(cut)?;
        Ok(cut)
    }
}

/// Escalated debt created when an installment cannot be paid in full
///
/// Only the account holding it can add to or reduce it; from outside it is
/// read-only.
///
/// # Example
/// ```
/// use monetary_core_rs::OverdueDebt;
///
/// let overdue = OverdueDebt::new();
/// assert_eq!(overdue.principal(), 0);
/// assert!(overdue.is_repaid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueDebt {
    principal: Amount,
}

impl OverdueDebt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(&self) -> i64 {
        self.principal.value()
    }

    pub fn is_repaid(&self) -> bool {
        self.principal.is_zero()
    }

    pub(crate) fn add(&mut self, amount: i64) -> Result<(), AmountError> {
        self.principal.plus(amount)
    }

    /// Capitalize one period of penalty interest; returns the interest
    pub(crate) fn accrue(&mut self, penalty_rate: f64) -> Result<i64, AmountError> {
        let interest = interest_on(self.principal.value(), penalty_rate);
        self.principal.plus(interest)?;
        Ok(interest)
    }

    pub(crate) fn reduce(&mut self, amount: i64) -> Result<(), AmountError> {
        self.principal.minus(amount)
    }
}
