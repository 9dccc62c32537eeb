//! Bank phases and the per-period schedule
//!
//! The scheduler names phases in its configuration. Names are resolved to
//! `BankPhase` once, when the schedule is built, and each period the bank
//! dispatches on the enum.

use crate::bank::rates::InflationSignal;
use crate::bank::{Bank, BankError, BankTotals, RecoveryReport};
use crate::models::loan::Rates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a schedule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Unknown bank phase: {0}")]
    UnknownPhase(String),

    #[error("Schedule is empty")]
    Empty,

    #[error("Schedule must start with opening, found {0}")]
    MustStartWithOpening(BankPhase),

    #[error("Schedule must end with closure, found {0}")]
    MustEndWithClosure(BankPhase),

    #[error("Phase {0} appears more than once")]
    Duplicate(BankPhase),
}

/// One step of the bank's period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankPhase {
    Opening,
    RateSetting,
    DebtRecovery,
    PayDividends,
    Closure,
}

impl BankPhase {
    pub fn name(&self) -> &'static str {
        match self {
            BankPhase::Opening => "opening",
            BankPhase::RateSetting => "rate_setting",
            BankPhase::DebtRecovery => "debt_recovery",
            BankPhase::PayDividends => "pay_dividends",
            BankPhase::Closure => "closure",
        }
    }
}

impl fmt::Display for BankPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BankPhase {
    type Err = ScheduleError;

    /// Accepts snake_case, camelCase and the short verbs (`open`, `close`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "opening" | "open" => Ok(BankPhase::Opening),
            "ratesetting" | "updaterates" => Ok(BankPhase::RateSetting),
            "debtrecovery" => Ok(BankPhase::DebtRecovery),
            "paydividends" | "dividends" => Ok(BankPhase::PayDividends),
            "closure" | "close" => Ok(BankPhase::Closure),
            _ => Err(ScheduleError::UnknownPhase(s.to_string())),
        }
    }
}

/// Result of executing one phase
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOutcome {
    Opened { period: usize },
    Rates(Rates),
    Recovery(RecoveryReport),
    Dividends { paid: i64 },
    Closed(BankTotals),
}

/// Ordered bank phases for one period
///
/// # Example
/// ```
/// use monetary_core_rs::bank::{BankPhase, BankSchedule};
///
/// let schedule = BankSchedule::parse(["open", "updateRates", "debtRecovery", "close"]).unwrap();
/// assert_eq!(schedule.phases()[1], BankPhase::RateSetting);
///
/// assert!(BankSchedule::parse(["debt_recovery", "closure"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSchedule {
    phases: Vec<BankPhase>,
}

impl BankSchedule {
    /// Opening, rate setting, debt recovery, dividends, closure
    pub fn standard() -> Self {
        Self {
            phases: vec![
                BankPhase::Opening,
                BankPhase::RateSetting,
                BankPhase::DebtRecovery,
                BankPhase::PayDividends,
                BankPhase::Closure,
            ],
        }
    }

    pub fn new(phases: Vec<BankPhase>) -> Result<Self, ScheduleError> {
        let first = *phases.first().ok_or(ScheduleError::Empty)?;
        if first != BankPhase::Opening {
            return Err(ScheduleError::MustStartWithOpening(first));
        }
        let last = *phases.last().ok_or(ScheduleError::Empty)?;
        if last != BankPhase::Closure {
            return Err(ScheduleError::MustEndWithClosure(last));
        }
        for (i, phase) in phases.iter().enumerate() {
            if phases[..i].contains(phase) {
                return Err(ScheduleError::Duplicate(*phase));
            }
        }
        Ok(Self { phases })
    }

    /// Resolve phase names once
    pub fn parse<I, S>(names: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phases = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<BankPhase>, _>>()?;
        Self::new(phases)
    }

    pub fn phases(&self) -> &[BankPhase] {
        &self.phases
    }

    /// Execute every phase for `period`, stopping at the first fault
    pub fn run(
        &self,
        bank: &mut Bank,
        period: usize,
        signal: &dyn InflationSignal,
    ) -> Result<Vec<PhaseOutcome>, BankError> {
        self.phases
            .iter()
            .map(|&phase| bank.execute(phase, period, signal))
            .collect()
    }
}

impl Default for BankSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl Bank {
    /// Execute a single phase
    pub fn execute(
        &mut self,
        phase: BankPhase,
        period: usize,
        signal: &dyn InflationSignal,
    ) -> Result<PhaseOutcome, BankError> {
        match phase {
            BankPhase::Opening => {
                self.open(period)?;
                Ok(PhaseOutcome::Opened { period })
            }
            BankPhase::RateSetting => Ok(PhaseOutcome::Rates(self.update_rates(signal)?)),
            BankPhase::DebtRecovery => Ok(PhaseOutcome::Recovery(self.debt_recovery()?)),
            BankPhase::PayDividends => Ok(PhaseOutcome::Dividends {
                paid: self.pay_dividends()?,
            }),
            BankPhase::Closure => Ok(PhaseOutcome::Closed(self.close()?)),
        }
    }
}
