//! Economy configuration for the demo driver

use anyhow::{ensure, Context, Result};
use monetary_core_rs::BankConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the toy economy driving the bank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub seed: u64,
    pub periods: usize,
    pub firms: usize,
    pub households: usize,
    /// Households holding the bank's shares
    pub bank_shareholders: usize,
    /// Households holding each firm's shares
    pub firm_owners: usize,

    /// Chance a firm borrows in a period
    pub loan_probability: f64,
    pub min_loan: i64,
    pub max_loan: i64,
    pub max_term: usize,
    pub amortizing_share: f64,

    /// Fraction of a firm's deposit paid out as one wage cheque
    pub wage_share: f64,
    /// Fraction of a household's deposit spent at one firm
    pub spend_share: f64,
    /// Fraction of a firm's net worth paid as dividend
    pub payout_ratio: f64,
    /// Overdue debt above which a firm's overdue debt is written off
    pub write_off_threshold: i64,

    /// Mean per-period inflation published to the bank
    pub inflation_mean: f64,
    pub inflation_noise: f64,

    /// Bank phase names, resolved once at start-up
    pub schedule: Vec<String>,
    pub bank: BankConfig,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            periods: 60,
            firms: 4,
            households: 12,
            bank_shareholders: 3,
            firm_owners: 2,
            loan_probability: 0.25,
            min_loan: 5_000,
            max_loan: 50_000,
            max_term: 36,
            amortizing_share: 0.7,
            wage_share: 0.2,
            spend_share: 0.5,
            payout_ratio: 0.1,
            write_off_threshold: 20_000,
            inflation_mean: 0.002,
            inflation_noise: 0.002,
            schedule: ["opening", "rate_setting", "debt_recovery", "pay_dividends", "closure"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bank: BankConfig::default(),
        }
    }
}

impl EconomyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.firms > 0, "at least one firm is required");
        ensure!(self.households > 0, "at least one household is required");
        ensure!(
            self.bank_shareholders <= self.households && self.firm_owners <= self.households,
            "cannot pick more shareholders than households"
        );
        ensure!(self.firm_owners > 0, "every firm needs an owner");
        ensure!(
            self.min_loan > 0 && self.min_loan < self.max_loan,
            "loan bounds must satisfy 0 < min_loan < max_loan"
        );
        ensure!(self.max_term > 0, "max_term must be positive");
        Ok(())
    }
}
