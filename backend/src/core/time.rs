//! Period clock for the simulation
//!
//! The simulation runs in discrete periods (months by default). Twelve
//! periods form a year, which is also the horizon separating short-term
//! from long-term debt.

use serde::{Deserialize, Serialize};

/// Default number of periods in one year (monthly periods)
pub const PERIODS_PER_YEAR: usize = 12;

/// Counts simulation periods and derives the year position from them
///
/// # Example
/// ```
/// use monetary_core_rs::PeriodClock;
///
/// let mut clock = PeriodClock::new(12);
/// assert_eq!(clock.current_period(), 0);
/// assert_eq!(clock.current_year(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_period(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodClock {
    /// Periods elapsed since simulation start
    current_period: usize,
    /// Number of periods in one year
    periods_per_year: usize,
}

impl PeriodClock {
    /// Create a clock starting at period 0
    ///
    /// # Panics
    /// Panics if `periods_per_year` is zero
    pub fn new(periods_per_year: usize) -> Self {
        assert!(periods_per_year > 0, "periods_per_year must be positive");
        Self {
            current_period: 0,
            periods_per_year,
        }
    }

    /// Create a clock starting at an arbitrary period
    pub fn starting_at(period: usize, periods_per_year: usize) -> Self {
        let mut clock = Self::new(periods_per_year);
        clock.current_period = period;
        clock
    }

    /// Move to the next period
    pub fn advance(&mut self) {
        self.current_period += 1;
    }

    /// Current period number
    pub fn current_period(&self) -> usize {
        self.current_period
    }

    /// Current year (0-indexed)
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::PeriodClock;
    ///
    /// let clock = PeriodClock::starting_at(25, 12);
    /// assert_eq!(clock.current_year(), 2);
    /// assert_eq!(clock.period_within_year(), 1);
    /// ```
    pub fn current_year(&self) -> usize {
        self.current_period / self.periods_per_year
    }

    /// Position of the current period inside its year (0-indexed)
    pub fn period_within_year(&self) -> usize {
        self.current_period % self.periods_per_year
    }

    /// True on the last period of a year
    pub fn is_end_of_year(&self) -> bool {
        self.period_within_year() == self.periods_per_year - 1
    }

    pub fn periods_per_year(&self) -> usize {
        self.periods_per_year
    }
}

impl Default for PeriodClock {
    fn default() -> Self {
        Self::new(PERIODS_PER_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "periods_per_year must be positive")]
    fn test_zero_periods_per_year_panics() {
        PeriodClock::new(0);
    }

    #[test]
    fn test_end_of_year() {
        let mut clock = PeriodClock::default();
        for _ in 0..11 {
            clock.advance();
        }
        assert!(clock.is_end_of_year());
        clock.advance();
        assert!(!clock.is_end_of_year());
        assert_eq!(clock.current_year(), 1);
    }
}
