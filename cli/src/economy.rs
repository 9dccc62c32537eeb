//! Toy economy exercising the bank: firms borrow and pay wages, households
//! spend, owners collect dividends.
//!
//! CRITICAL: All money values are i64 (minor units)

use anyhow::{Context, Result};
use monetary_core_rs::{
    compute_state_hash, validate_snapshot, AccountId, Bank, BankPhase, BankSchedule, BankTotals,
    CapitalStock, DeterministicRng, InflationSeries, PeriodClock, PhaseOutcome, Rates,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EconomyConfig;

/// A firm banking with the bank and owned by households
#[derive(Debug)]
pub struct Firm {
    pub account: AccountId,
    pub stock: CapitalStock,
}

/// One line of output per closed period
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub period: usize,
    pub year: usize,
    pub rates: Rates,
    pub inflation: f64,
    pub bank_dividend: i64,
    pub firm_dividends: i64,
    pub written_off: i64,
    pub totals: BankTotals,
    pub state_hash: String,
}

/// Per-period activity outside the bank's phases
#[derive(Debug, Default)]
struct Activity {
    firm_dividends: i64,
    written_off: i64,
}

pub struct Economy {
    config: EconomyConfig,
    bank: Bank,
    firms: Vec<Firm>,
    households: Vec<AccountId>,
    rng: DeterministicRng,
    inflation: InflationSeries,
    schedule: BankSchedule,
    clock: PeriodClock,
}

impl Economy {
    pub fn new(config: EconomyConfig) -> Result<Self> {
        config.validate()?;
        let schedule = BankSchedule::parse(&config.schedule).context("Invalid bank schedule")?;
        let mut rng = DeterministicRng::new(config.seed);
        let mut bank = Bank::new("bank", config.bank.clone());

        let households = (0..config.households)
            .map(|i| bank.open_account(format!("household-{}", i)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut firms = Vec::with_capacity(config.firms);
        for i in 0..config.firms {
            let name = format!("firm-{}", i);
            let account = bank.open_account(name.clone())?;
            let owners = pick(&mut rng, &households, config.firm_owners);
            let mut stock = CapitalStock::new(name);
            stock.share_out_capital(&owners)?;
            firms.push(Firm { account, stock });
        }

        if config.bank_shareholders > 0 {
            let owners = pick(&mut rng, &households, config.bank_shareholders);
            bank.ownership_mut().share_out_capital(&owners)?;
        } else {
            warn!("bank has no shareholders; dividends will not be paid");
        }

        info!(
            "economy ready: {} firms, {} households, schedule {:?}",
            firms.len(),
            households.len(),
            schedule.phases()
        );

        Ok(Self {
            config,
            bank,
            firms,
            households,
            rng,
            inflation: InflationSeries::new(),
            schedule,
            clock: PeriodClock::default(),
        })
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn firms(&self) -> &[Firm] {
        &self.firms
    }

    pub fn current_period(&self) -> usize {
        self.clock.current_period()
    }

    /// Run one period through every scheduled phase
    pub fn step(&mut self) -> Result<PeriodReport> {
        let period = self.clock.current_period();
        let inflation = self.config.inflation_mean
            + self.config.inflation_noise * (2.0 * self.rng.next_f64() - 1.0);
        self.inflation.publish(period, inflation);

        let mut activity = None;
        let mut bank_dividend = 0;
        let phases = self.schedule.phases().to_vec();
        for phase in phases {
            let before_phase = !matches!(phase, BankPhase::Opening | BankPhase::RateSetting);
            if before_phase && activity.is_none() {
                activity = Some(self.run_activity()?);
            }

            let outcome = self
                .bank
                .execute(phase, period, &self.inflation)
                .with_context(|| format!("Phase {} failed in period {}", phase, period))?;
            match outcome {
                PhaseOutcome::Opened { .. } => {
                    for firm in &mut self.firms {
                        firm.stock.open(period)?;
                    }
                }
                PhaseOutcome::Dividends { paid } => bank_dividend = paid,
                PhaseOutcome::Closed(_) => {
                    for firm in &mut self.firms {
                        firm.stock.close()?;
                    }
                }
                PhaseOutcome::Rates(_) | PhaseOutcome::Recovery(_) => {}
            }
        }
        let activity = activity.unwrap_or_default();

        let snapshot = self.bank.snapshot();
        validate_snapshot(&snapshot).context("Ledger failed validation")?;
        let state_hash = compute_state_hash(&snapshot)?;

        let report = PeriodReport {
            period,
            year: self.clock.current_year(),
            rates: self.bank.rates(),
            inflation,
            bank_dividend,
            firm_dividends: activity.firm_dividends,
            written_off: activity.written_off,
            totals: snapshot.totals,
            state_hash,
        };
        self.clock.advance();
        Ok(report)
    }

    // ========================================================================
    // Behaviour
    // ========================================================================

    fn run_activity(&mut self) -> Result<Activity> {
        let mut activity = Activity {
            written_off: self.write_off_bad_debt()?,
            ..Activity::default()
        };
        self.borrow()?;
        self.pay_wages()?;
        self.spend()?;
        activity.firm_dividends = self.pay_firm_dividends()?;
        Ok(activity)
    }

    fn write_off_bad_debt(&mut self) -> Result<i64> {
        let mut total = 0;
        for firm in &self.firms {
            let overdue = self.bank.account(firm.account)?.overdue_debt();
            if overdue > self.config.write_off_threshold {
                let write_off = self.bank.cancel_debt(firm.account, overdue)?;
                debug!("wrote off overdue debt of {}: {:?}", firm.account, write_off);
                total += overdue;
            }
        }
        Ok(total)
    }

    fn borrow(&mut self) -> Result<()> {
        for firm in &self.firms {
            if !self.rng.chance(self.config.loan_probability) {
                continue;
            }
            let amount = self.rng.range(self.config.min_loan, self.config.max_loan + 1);
            let term = self.rng.range(1, self.config.max_term as i64 + 1) as usize;
            let amortizing = self.rng.chance(self.config.amortizing_share);
            self.bank.borrow(firm.account, amount, term, amortizing)?;
        }
        Ok(())
    }

    fn pay_wages(&mut self) -> Result<()> {
        for firm in &self.firms {
            let wage = share_of(self.bank.account(firm.account)?.amount(), self.config.wage_share);
            if wage <= 0 {
                continue;
            }
            let worker = self.households[self.rng.range(0, self.households.len() as i64) as usize];
            let cheque = self.bank.issue_cheque(firm.account, worker, wage)?;
            self.bank.deposit(worker, cheque)?;
        }
        Ok(())
    }

    fn spend(&mut self) -> Result<()> {
        for &household in &self.households {
            let spend = share_of(self.bank.account(household)?.amount(), self.config.spend_share);
            if spend <= 0 {
                continue;
            }
            let firm = &self.firms[self.rng.range(0, self.firms.len() as i64) as usize];
            let cheque = self.bank.issue_cheque(household, firm.account, spend)?;
            self.bank.deposit(firm.account, cheque)?;
        }
        Ok(())
    }

    /// Each firm is valued at its net deposit and pays part of it out
    fn pay_firm_dividends(&mut self) -> Result<i64> {
        let mut total_paid = 0;
        for firm in &mut self.firms {
            let account = self.bank.account(firm.account)?;
            let deposit = account.amount();
            let net_worth = (deposit - account.debt()).max(0);
            firm.stock.set_book_value(net_worth)?;

            let dividend = share_of(net_worth, self.config.payout_ratio).min(deposit);
            firm.stock.set_dividend(dividend)?;

            let ids: Vec<_> = firm.stock.certificates().iter().map(|c| c.id()).collect();
            for id in ids {
                let issuer = self.bank.account_mut(firm.account)?;
                if let Some(cheque) = firm.stock.get_dividend(id, issuer)? {
                    let holder = cheque.payee();
                    total_paid += cheque.amount();
                    self.bank.deposit(holder, cheque)?;
                }
            }
        }
        Ok(total_paid)
    }
}

/// Floor of `value * fraction`, never negative
fn share_of(value: i64, fraction: f64) -> i64 {
    ((value as f64) * fraction).floor().max(0.0) as i64
}

fn pick(rng: &mut DeterministicRng, from: &[AccountId], count: usize) -> Vec<AccountId> {
    let mut picked: Vec<AccountId> = rng
        .sample_distinct(from.len(), count)
        .into_iter()
        .map(|i| from[i])
        .collect();
    picked.sort();
    picked
}
