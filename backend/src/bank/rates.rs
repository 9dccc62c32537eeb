//! Interest-rate setting
//!
//! Until supervision starts the bank lends at a fixed rate. From then on a
//! bounded-step controller chases a Taylor-rule target:
//!
//! ```text
//! target = coefficient × (inflation − inflation_target)
//! rate  += step        toward target
//! rate  += step        again, if the last move went the same way and
//!                      inflation is still moving away in that direction
//! rate   = max(rate, 0)
//! penalty = rate + penalty_premium
//! ```
//!
//! All rates and inflation figures are per period.

use crate::models::loan::Rates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rate-setting parameters
///
/// Deserializes with defaults for any field left out.
///
/// # Example
/// ```
/// use monetary_core_rs::RateConfig;
///
/// let config: RateConfig = serde_json::from_str(r#"{"supervision_start": 6}"#).unwrap();
/// assert_eq!(config.supervision_start, 6);
/// assert_eq!(config.step, RateConfig::default().step);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Fixed rate before supervision starts
    pub initial_rate: f64,
    /// First period in which the controller runs
    pub supervision_start: usize,
    pub taylor_coefficient: f64,
    pub inflation_target: f64,
    /// Size of one controller move
    pub step: f64,
    /// Spread of the penalty rate over the normal rate
    pub penalty_premium: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            initial_rate: 0.05 / 12.0,
            supervision_start: 24,
            taylor_coefficient: 1.5,
            inflation_target: 0.02 / 12.0,
            step: 0.0025 / 12.0,
            penalty_premium: 0.02 / 12.0,
        }
    }
}

/// Read-only source of the published inflation series
pub trait InflationSignal {
    /// Inflation observed for `period`, if published
    fn inflation(&self, period: usize) -> Option<f64>;
}

/// No series published; the controller never moves
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInflation;

impl InflationSignal for NoInflation {
    fn inflation(&self, _period: usize) -> Option<f64> {
        None
    }
}

/// Constant inflation
///
/// # Example
/// ```
/// use monetary_core_rs::{FixedInflation, InflationSignal};
///
/// assert_eq!(FixedInflation(0.002).inflation(99), Some(0.002));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedInflation(pub f64);

impl InflationSignal for FixedInflation {
    fn inflation(&self, _period: usize) -> Option<f64> {
        Some(self.0)
    }
}

/// Published series; a period reads the latest value at or before it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InflationSeries {
    values: BTreeMap<usize, f64>,
}

impl InflationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the inflation observed for a period
    ///
    /// # Arguments
    /// * `period` - Period the observation belongs to; republishing replaces it
    /// * `value` - Per-period inflation
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::{InflationSeries, InflationSignal};
    ///
    /// let mut series = InflationSeries::new();
    /// series.publish(2, 0.01);
    /// assert_eq!(series.inflation(1), None);
    /// assert_eq!(series.inflation(5), Some(0.01));
    /// ```
    pub fn publish(&mut self, period: usize, value: f64) {
        self.values.insert(period, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl InflationSignal for InflationSeries {
    fn inflation(&self, period: usize) -> Option<f64> {
        self.values.range(..=period).next_back().map(|(_, &v)| v)
    }
}

impl FromIterator<(usize, f64)> for InflationSeries {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Bounded-step rate controller
///
/// # Example
/// ```
/// use monetary_core_rs::bank::{RateConfig, RateController};
///
/// let config = RateConfig {
///     supervision_start: 10,
///     ..RateConfig::default()
/// };
/// let mut controller = RateController::new(config.clone());
///
/// // fixed rate before supervision
/// let rates = controller.update(3, Some(0.5));
/// assert_eq!(rates.normal, config.initial_rate);
///
/// // high inflation pushes the rate up by one step
/// let rates = controller.update(10, Some(0.01));
/// assert!((rates.normal - (config.initial_rate + config.step)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateController {
    config: RateConfig,
    rate: f64,
    /// Sign of the last move: -1, 0 or 1
    last_move: i8,
    last_inflation: Option<f64>,
}

impl RateController {
    /// Create a controller lending at `config.initial_rate`
    ///
    /// # Arguments
    /// * `config` - Rate-setting parameters
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::{RateConfig, RateController};
    ///
    /// let controller = RateController::new(RateConfig::default());
    /// assert_eq!(controller.rates().normal, RateConfig::default().initial_rate);
    /// ```
    pub fn new(config: RateConfig) -> Self {
        Self {
            rate: config.initial_rate,
            config,
            last_move: 0,
            last_inflation: None,
        }
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Rates currently in force; the penalty rate carries the premium
    pub fn rates(&self) -> Rates {
        Rates::new(self.rate, self.config.penalty_premium)
    }

    /// Set the rates for `period` from the inflation observed
    ///
    /// A missing observation leaves the rate where it is.
    ///
    /// # Arguments
    /// * `period` - Period being opened
    /// * `inflation` - Latest published inflation, if any
    ///
    /// # Example
    /// ```
    /// use monetary_core_rs::{RateConfig, RateController};
    ///
    /// let config = RateConfig {
    ///     supervision_start: 0,
    ///     ..RateConfig::default()
    /// };
    /// let mut controller = RateController::new(config.clone());
    ///
    /// // nothing published: rate unchanged
    /// assert_eq!(controller.update(0, None).normal, config.initial_rate);
    ///
    /// // deflation pulls the rate down, never below zero
    /// let rates = controller.update(1, Some(-0.5));
    /// assert!(rates.normal < config.initial_rate);
    /// assert!(rates.normal >= 0.0);
    /// ```
    pub fn update(&mut self, period: usize, inflation: Option<f64>) -> Rates {
        if period < self.config.supervision_start {
            self.rate = self.config.initial_rate;
            self.last_move = 0;
            return self.rates();
        }
        let Some(inflation) = inflation else {
            return self.rates();
        };

        let target =
            self.config.taylor_coefficient * (inflation - self.config.inflation_target);
        let direction: i8 = if target > self.rate {
            1
        } else if target < self.rate {
            -1
        } else {
            0
        };

        let mut steps = f64::from(direction);
        if direction != 0 && direction == self.last_move {
            let diverging = self.last_inflation.is_some_and(|last| {
                (direction > 0 && inflation > last) || (direction < 0 && inflation < last)
            });
            if diverging {
                steps *= 2.0;
            }
        }

        self.rate = (self.rate + steps * self.config.step).max(0.0);
        self.last_move = direction;
        self.last_inflation = Some(inflation);
        self.rates()
    }
}
