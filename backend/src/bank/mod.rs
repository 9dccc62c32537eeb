//! Bank - keeper of accounts, lending rates and the bank's own equity
//!
//! The bank holds every account and runs the per-period phases:
//!
//! ```text
//! open → update_rates → (behavioral phases) → debt_recovery → pay_dividends → close
//! ```
//!
//! Account operations that move money are exposed here as well so that each
//! movement lands in the bank's event log.
//!
//! # Capital
//!
//! Loans are the bank's assets and deposits its liabilities:
//!
//! ```text
//! capital = Σ debt − Σ deposits
//! ```
//!
//! Unbacked cheques (dividends) create deposits without a matching debit,
//! which is exactly a reduction of this capital.
//!
//! CRITICAL: All money values are i64 (minor units)

pub mod rates;
pub mod schedule;

pub use rates::{FixedInflation, InflationSeries, InflationSignal, NoInflation, RateConfig, RateController};
pub use schedule::{BankPhase, BankSchedule, PhaseOutcome, ScheduleError};

use crate::core::period::{PeriodError, PeriodGuard};
use crate::equity::{CapitalStock, CertificateId, EquityError};
use crate::models::account::{Account, AccountError, AccountId, WriteOff};
use crate::models::cheque::{BankDrawer, Cheque, ChequeError, ChequeIssuer, Drawer};
use crate::models::event::{Event, EventLog};
use crate::models::amount::checked_sum;
use crate::models::loan::{interest_on, Loan, OverdueDebt, Rates};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration
// ============================================================================

/// Bank configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub rates: RateConfig,
    /// Capital the bank retains, as a fraction of its assets, before paying
    /// dividends
    pub capital_target_ratio: f64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            rates: RateConfig::default(),
            capital_target_ratio: 0.1,
        }
    }
}

// ============================================================================
// Errors and reports
// ============================================================================

/// Errors that can occur during bank operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Cheque error: {0}")]
    Cheque(#[from] ChequeError),

    #[error("Period error: {0}")]
    Period(#[from] PeriodError),

    #[error("Equity error: {0}")]
    Equity(#[from] EquityError),

    #[error("Bank-wide deposits or debt would exceed i64::MAX")]
    TotalsOverflow,
}

/// Aggregate balance sheet of the bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTotals {
    pub deposits: i64,
    /// Principal outstanding on normal loans
    pub outstanding_debt: i64,
    pub overdue_debt: i64,
    /// Loans maturing within 12 periods, plus overdue debt
    pub short_term_debt: i64,
    pub long_term_debt: i64,
    pub loan_count: usize,
    /// Assets minus liabilities; may be negative
    pub capital: i64,
}

impl BankTotals {
    /// Σ debt: the bank's assets
    pub fn assets(&self) -> i64 {
        self.outstanding_debt.saturating_add(self.overdue_debt)
    }

    /// Σ deposits: the bank's liabilities
    pub fn liabilities(&self) -> i64 {
        self.deposits
    }
}

/// What one debt-recovery pass collected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryReport {
    /// Installments that were due
    pub installments: usize,
    pub interest: i64,
    pub principal: i64,
    /// Shortfalls advanced and booked as new overdue debt
    pub advanced: i64,
    /// Penalty interest capitalized on overdue debt
    pub overdue_interest: i64,
    pub overdue_recovered: i64,
    /// Overdue principal left unpaid after recovery
    pub overdue_unpaid: i64,
}

// ============================================================================
// Bank
// ============================================================================

/// The bank and all of its accounts
///
/// # Example
/// ```
/// use monetary_core_rs::{Bank, BankConfig};
///
/// let mut bank = Bank::new("bank", BankConfig::default());
/// let firm = bank.open_account("firm").unwrap();
/// let worker = bank.open_account("worker").unwrap();
///
/// bank.open(0).unwrap();
/// bank.borrow(firm, 5_000, 12, true).unwrap();
/// let wage = bank.issue_cheque(firm, worker, 1_200).unwrap();
/// bank.deposit(worker, wage).unwrap();
///
/// assert_eq!(bank.account(firm).unwrap().amount(), 3_800);
/// assert_eq!(bank.account(worker).unwrap().amount(), 1_200);
///
/// let totals = bank.close().unwrap();
/// assert_eq!(totals.deposits, 5_000);
/// assert_eq!(totals.capital, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Bank {
    name: String,
    config: BankConfig,
    accounts: Vec<Account>,
    rate_controller: RateController,
    rates: Rates,
    ownership: CapitalStock,
    period: PeriodGuard,
    event_log: EventLog,
}

impl Bank {
    pub fn new(name: impl Into<String>, config: BankConfig) -> Self {
        let name = name.into();
        let rate_controller = RateController::new(config.rates.clone());
        let rates = rate_controller.rates();
        Self {
            ownership: CapitalStock::new(name.clone()),
            name,
            config,
            accounts: Vec::new(),
            rate_controller,
            rates,
            period: PeriodGuard::new(),
            event_log: EventLog::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn rates(&self) -> Rates {
        self.rates
    }

    pub fn is_open(&self) -> bool {
        self.period.is_open()
    }

    pub fn current_period(&self) -> Option<usize> {
        self.period.current()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn event_log_mut(&mut self) -> &mut EventLog {
        &mut self.event_log
    }

    /// The bank's own share register
    pub fn ownership(&self) -> &CapitalStock {
        &self.ownership
    }

    pub fn ownership_mut(&mut self) -> &mut CapitalStock {
        &mut self.ownership
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Open an account for `holder`
    ///
    /// An account opened mid-period is open immediately.
    pub fn open_account(&mut self, holder: impl Into<String>) -> Result<AccountId, BankError> {
        let id = AccountId(self.accounts.len());
        let mut account = Account::new(id, holder.into(), self.rates);
        if let (true, Some(period)) = (self.period.is_open(), self.period.current()) {
            account.open(period)?;
        }
        debug!("Opened {} for {}", id, account.holder());
        self.accounts.push(account);
        Ok(id)
    }

    pub fn account(&self, id: AccountId) -> Result<&Account, BankError> {
        self.accounts.get(id.0).ok_or(BankError::AccountNotFound(id))
    }

    pub fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(id.0)
            .ok_or(BankError::AccountNotFound(id))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    /// Flat view of every loan, with the borrowing account
    pub fn loans(&self) -> impl Iterator<Item = (AccountId, &Loan)> {
        self.accounts
            .iter()
            .flat_map(|a| a.loans().iter().map(move |loan| (a.id(), loan)))
    }

    /// Flat view of every overdue debt
    pub fn overdue_debts(&self) -> impl Iterator<Item = (AccountId, &OverdueDebt)> {
        self.accounts
            .iter()
            .filter_map(|a| a.overdue().map(|debt| (a.id(), debt)))
    }

    pub fn deposits_total(&self) -> i64 {
        self.totals().deposits
    }

    pub fn outstanding_debt_total(&self) -> i64 {
        self.totals().outstanding_debt
    }

    pub fn overdue_debt_total(&self) -> i64 {
        self.totals().overdue_debt
    }

    /// Current balance sheet
    ///
    /// Sums saturate at `i64::MAX`. Every bank operation that grows deposits
    /// or debt checks its headroom first, so they only saturate when
    /// accounts were driven past it directly.
    pub fn totals(&self) -> BankTotals {
        self.aggregate(|a, b| Some(a.saturating_add(b)))
            .unwrap_or_default()
    }

    /// Current balance sheet, or `TotalsOverflow` if any sum passes `i64::MAX`
    pub fn checked_totals(&self) -> Result<BankTotals, BankError> {
        self.aggregate(i64::checked_add)
            .ok_or(BankError::TotalsOverflow)
    }

    fn aggregate(&self, add: fn(i64, i64) -> Option<i64>) -> Option<BankTotals> {
        let sum = |mut values: &mut dyn Iterator<Item = i64>| (&mut values).try_fold(0, add);
        let deposits = sum(&mut self.accounts.iter().map(Account::amount))?;
        let outstanding_debt = sum(&mut self.loans().map(|(_, loan)| loan.principal()))?;
        let overdue_debt = sum(&mut self.overdue_debts().map(|(_, debt)| debt.principal()))?;
        let assets = add(outstanding_debt, overdue_debt)?;
        Some(BankTotals {
            deposits,
            outstanding_debt,
            overdue_debt,
            short_term_debt: sum(&mut self.accounts.iter().map(Account::short_term_debt))?,
            long_term_debt: sum(&mut self.accounts.iter().map(Account::long_term_debt))?,
            loan_count: self.loans().count(),
            // both sides are non-negative
            capital: assets - deposits,
        })
    }

    /// Refuse an operation adding `deposits` and `debt` if either bank-wide
    /// total would pass `i64::MAX`
    fn ensure_headroom(&self, deposits: i64, debt: i64) -> Result<(), BankError> {
        let totals = self.checked_totals()?;
        let deposits_fit = totals.deposits.checked_add(deposits).is_some();
        let debt_fits = totals
            .outstanding_debt
            .checked_add(totals.overdue_debt)
            .and_then(|assets| assets.checked_add(debt))
            .is_some();
        if deposits_fit && debt_fits {
            Ok(())
        } else {
            Err(BankError::TotalsOverflow)
        }
    }

    // ========================================================================
    // Period lifecycle
    // ========================================================================

    /// Open `period` for the bank, every account and the bank's stock
    ///
    /// Every lifecycle is checked before any is moved, so on error nothing
    /// is open. A canceled bank stock is left out.
    pub fn open(&mut self, period: usize) -> Result<(), BankError> {
        self.period.check_open(period)?;
        for account in &self.accounts {
            account.check_open(period).map_err(AccountError::from)?;
        }
        let stock_live = !self.ownership.is_canceled();
        if stock_live {
            self.ownership
                .check_open(period)
                .map_err(EquityError::from)?;
        }

        self.period.open(period)?;
        for account in &mut self.accounts {
            account.set_rates(self.rates);
            account.open(period)?;
        }
        if stock_live {
            self.ownership.open(period)?;
        }
        self.event_log.log(Event::PeriodOpened { period });
        debug!("{} opened period {}", self.name, period);
        Ok(())
    }

    /// Close the period and report the balance sheet
    ///
    /// Like `open`, all or nothing.
    pub fn close(&mut self) -> Result<BankTotals, BankError> {
        let period = self.period.ensure_open()?;
        for account in &self.accounts {
            account.check_close().map_err(AccountError::from)?;
        }
        let stock_live = !self.ownership.is_canceled();
        if stock_live {
            self.ownership.check_close().map_err(EquityError::from)?;
        }

        let totals = self.totals();
        for account in &mut self.accounts {
            account.close()?;
        }
        if stock_live {
            self.ownership.close()?;
        }
        self.period.close()?;

        self.event_log.log(Event::PeriodClosed { period, totals });
        info!(
            "{} closed period {}: deposits={} debt={} overdue={} capital={}",
            self.name,
            period,
            totals.deposits,
            totals.outstanding_debt,
            totals.overdue_debt,
            totals.capital
        );
        Ok(totals)
    }

    // ========================================================================
    // Rate setting
    // ========================================================================

    /// Set this period's rates from the published inflation signal
    pub fn update_rates(&mut self, signal: &dyn InflationSignal) -> Result<Rates, BankError> {
        let period = self.period.ensure_open()?;
        let inflation = signal.inflation(period);
        self.rates = self.rate_controller.update(period, inflation);
        for account in &mut self.accounts {
            account.set_rates(self.rates);
        }

        self.event_log.log(Event::RatesUpdated {
            period,
            normal: self.rates.normal,
            penalty: self.rates.penalty,
            inflation,
        });
        debug!(
            "{} rates for period {}: normal={:.6} penalty={:.6}",
            self.name, period, self.rates.normal, self.rates.penalty
        );
        Ok(self.rates)
    }

    // ========================================================================
    // Lending and payments
    // ========================================================================

    /// Grant a loan; the account's deposit is credited with `amount`
    pub fn borrow(
        &mut self,
        id: AccountId,
        amount: i64,
        term: usize,
        amortizing: bool,
    ) -> Result<(), BankError> {
        let period = self.period.ensure_open()?;
        self.account(id)?;
        self.ensure_headroom(amount.max(0), amount.max(0))?;
        let account = self.account_mut(id)?;
        account.borrow(amount, term, amortizing)?;
        let rate = account.rates().normal;

        self.event_log.log(Event::LoanGranted {
            period,
            account: id,
            amount,
            term,
            amortizing,
            rate,
        });
        debug!("Loan of {} to {} over {} periods", amount, id, term);
        Ok(())
    }

    /// Write a deposit-backed cheque from `drawer` to `payee`
    pub fn issue_cheque(
        &mut self,
        drawer: AccountId,
        payee: AccountId,
        amount: i64,
    ) -> Result<Cheque, BankError> {
        let period = self.period.ensure_open()?;
        self.account(payee)?;
        let cheque = self.account_mut(drawer)?.issue_cheque(payee, amount)?;

        self.event_log.log(Event::ChequeIssued {
            period,
            drawer: cheque.drawer(),
            payee,
            amount,
        });
        Ok(cheque)
    }

    /// Write an unbacked cheque drawn on the bank itself
    pub fn issue_unbacked_cheque(
        &mut self,
        payee: AccountId,
        amount: i64,
    ) -> Result<Cheque, BankError> {
        let period = self
            .period
            .ensure_open()
            .map_err(|_| ChequeError::DrawerNotOpen(Drawer::Bank))?;
        self.account(payee)?;
        let cheque = BankDrawer::new(period).issue_cheque(payee, amount)?;

        self.event_log.log(Event::ChequeIssued {
            period,
            drawer: Drawer::Bank,
            payee,
            amount,
        });
        Ok(cheque)
    }

    /// Deposit a cheque into account `id`
    ///
    /// The payee is validated before the drawer is debited, so a refused
    /// deposit moves no money.
    pub fn deposit(&mut self, id: AccountId, cheque: Cheque) -> Result<(), BankError> {
        let period = self.period.ensure_open()?;
        if cheque.payee() != id {
            return Err(ChequeError::WrongPayee {
                payee: cheque.payee(),
                presenter: id,
            }
            .into());
        }
        if !self.account(id)?.is_open() {
            return Err(AccountError::from(PeriodError::NotOpen).into());
        }

        let drawer = cheque.drawer();
        match drawer {
            Drawer::Account(drawer_id) => self.account_mut(drawer_id)?.clear_cheque(&cheque)?,
            Drawer::Bank => self.ensure_headroom(cheque.amount(), 0)?,
        }
        self.account_mut(id)?.receive(cheque.amount())?;

        self.event_log.log(Event::ChequeCleared {
            period,
            drawer,
            payee: id,
            amount: cheque.amount(),
        });
        debug!("Cleared {} from {} to {}", cheque.amount(), drawer, id);
        Ok(())
    }

    /// Hand back an unused cheque, freeing the drawer's slot
    pub fn void_cheque(&mut self, cheque: Cheque) -> Result<(), BankError> {
        match cheque.drawer() {
            Drawer::Account(drawer_id) => self.account_mut(drawer_id)?.void_cheque(cheque)?,
            Drawer::Bank => {}
        }
        Ok(())
    }

    /// Write off `amount` of an account's debt
    pub fn cancel_debt(&mut self, id: AccountId, amount: i64) -> Result<WriteOff, BankError> {
        let period = self.period.ensure_open()?;
        let write_off = self.account_mut(id)?.cancel_debt(amount)?;

        self.event_log.log(Event::DebtCancelled {
            period,
            account: id,
            amount,
            from_overdue: write_off.from_overdue,
        });
        warn!(
            "Wrote off {} of {} debt ({} overdue)",
            amount, id, write_off.from_overdue
        );
        Ok(write_off)
    }

    // ========================================================================
    // Debt recovery
    // ========================================================================

    /// Collect this period's debt service
    ///
    /// Every account's overdue debt is recovered first, then every normal
    /// loan in account order. If the interest due could carry total debt
    /// past `i64::MAX` nothing is collected.
    pub fn debt_recovery(&mut self) -> Result<RecoveryReport, BankError> {
        let period = self.period.ensure_open()?;
        let interest_due = checked_sum(self.accounts.iter().flat_map(|account| {
            let penalty = account
                .overdue()
                .map(|debt| interest_on(debt.principal(), account.rates().penalty));
            let installments = account
                .loans()
                .iter()
                .map(move |loan| loan.installment_due(period).interest);
            penalty.into_iter().chain(installments)
        }))
        .map_err(|_| BankError::TotalsOverflow)?;
        self.ensure_headroom(0, interest_due)?;
        let mut report = RecoveryReport::default();

        for account in &mut self.accounts {
            let Some(repayment) = account.pay_overdue()? else {
                continue;
            };
            report.overdue_interest += repayment.interest;
            report.overdue_recovered += repayment.paid;
            report.overdue_unpaid += repayment.remaining;
            self.event_log.log(Event::OverdueRecovered {
                period,
                account: account.id(),
                interest: repayment.interest,
                paid: repayment.paid,
                remaining: repayment.remaining,
            });
        }

        for account in &mut self.accounts {
            for repayment in account.pay_loans()? {
                report.installments += 1;
                report.interest += repayment.interest;
                report.principal += repayment.principal;
                self.event_log.log(Event::InstallmentPaid {
                    period,
                    account: account.id(),
                    interest: repayment.interest,
                    principal: repayment.principal,
                });

                if repayment.advanced > 0 {
                    report.advanced += repayment.advanced;
                    self.event_log.log(Event::OverdueAdvance {
                        period,
                        account: account.id(),
                        shortfall: repayment.advanced,
                    });
                    warn!(
                        "{} could not cover its installment; {} advanced as overdue debt",
                        account.id(),
                        repayment.advanced
                    );
                }
            }
        }

        debug!(
            "{} recovered interest={} principal={} overdue={} (advanced {})",
            self.name, report.interest, report.principal, report.overdue_recovered, report.advanced
        );
        Ok(report)
    }

    // ========================================================================
    // Dividends
    // ========================================================================

    /// Pay out capital above the target ratio to the bank's shareholders
    ///
    /// The bank's share register is revalued at its current capital. The
    /// dividend is `max(0, capital − ceil(ratio × assets))`, paid with
    /// unbacked cheques deposited straight into the holders' accounts.
    /// Returns the amount paid; nothing is paid until the register is fully
    /// distributed.
    pub fn pay_dividends(&mut self) -> Result<i64, BankError> {
        let period = self.period.ensure_open()?;
        if self.ownership.is_canceled() {
            warn!("{} share register is canceled; no dividend paid", self.name);
            return Ok(0);
        }
        let totals = self.totals();
        self.ownership.set_book_value(totals.capital.max(0))?;
        if !self.ownership.is_fully_distributed() {
            return Ok(0);
        }

        let retained = (self.config.capital_target_ratio * totals.assets() as f64).ceil() as i64;
        let dividend = (totals.capital - retained).max(0);
        self.ownership.set_dividend(dividend)?;
        self.event_log.log(Event::DividendDeclared {
            period,
            total: dividend,
        });

        let mut drawer = BankDrawer::new(period);
        let certificates: Vec<CertificateId> =
            self.ownership.certificates().iter().map(|c| c.id()).collect();
        let mut paid = 0;
        for certificate in certificates {
            let Some(cheque) = self.ownership.get_dividend(certificate, &mut drawer)? else {
                continue;
            };
            let holder = cheque.payee();
            let amount = cheque.amount();
            self.deposit(holder, cheque)?;
            self.event_log.log(Event::DividendPaid {
                period,
                certificate,
                holder,
                amount,
            });
            paid += amount;
        }

        info!("{} paid dividend {} in period {}", self.name, paid, period);
        Ok(paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_bank() -> (Bank, AccountId, AccountId) {
        let mut bank = Bank::new("bank", BankConfig::default());
        let a = bank.open_account("a").unwrap();
        let b = bank.open_account("b").unwrap();
        bank.open(0).unwrap();
        (bank, a, b)
    }

    #[test]
    fn test_account_opened_mid_period_is_open() {
        let (mut bank, _, _) = open_bank();
        let late = bank.open_account("late").unwrap();
        assert!(bank.account(late).unwrap().is_open());
    }

    #[test]
    fn test_unknown_account() {
        let (mut bank, _, _) = open_bank();
        assert_eq!(
            bank.borrow(AccountId(99), 10, 1, true),
            Err(BankError::AccountNotFound(AccountId(99)))
        );
    }

    #[test]
    fn test_deposit_to_wrong_account_moves_nothing() {
        let (mut bank, a, b) = open_bank();
        bank.borrow(a, 1_000, 12, true).unwrap();
        let cheque = bank.issue_cheque(a, b, 400).unwrap();

        let err = bank.deposit(a, cheque).unwrap_err();
        assert_eq!(
            err,
            BankError::Cheque(ChequeError::WrongPayee {
                payee: b,
                presenter: a
            })
        );
        assert_eq!(bank.account(a).unwrap().amount(), 1_000);
        assert!(bank.account(a).unwrap().pending_cheque().is_some());
    }

    #[test]
    fn test_unbacked_cheque_creates_deposit() {
        let (mut bank, a, _) = open_bank();
        let cheque = bank.issue_unbacked_cheque(a, 250).unwrap();
        bank.deposit(a, cheque).unwrap();
        assert_eq!(bank.deposits_total(), 250);
        assert_eq!(bank.totals().capital, -250);
    }

    #[test]
    fn test_operations_require_open_bank() {
        let mut bank = Bank::new("bank", BankConfig::default());
        let a = bank.open_account("a").unwrap();
        assert_eq!(
            bank.borrow(a, 100, 1, true),
            Err(BankError::Period(PeriodError::NotOpen))
        );
        assert_eq!(
            bank.debt_recovery(),
            Err(BankError::Period(PeriodError::NotOpen))
        );
    }

    #[test]
    fn test_events_logged() {
        let (mut bank, a, b) = open_bank();
        bank.borrow(a, 1_000, 12, true).unwrap();
        let cheque = bank.issue_cheque(a, b, 100).unwrap();
        bank.deposit(b, cheque).unwrap();
        bank.close().unwrap();

        let log = bank.event_log();
        assert_eq!(log.events_of_type("LoanGranted").len(), 1);
        assert_eq!(log.events_of_type("ChequeIssued").len(), 1);
        assert_eq!(log.events_of_type("ChequeCleared").len(), 1);
        assert_eq!(log.events_of_type("PeriodClosed").len(), 1);
        assert_eq!(log.events_for_account(b).len(), 2);
    }

    #[test]
    fn test_borrow_past_bank_wide_max_is_refused() {
        let (mut bank, a, b) = open_bank();
        bank.borrow(a, i64::MAX - 5, 12, true).unwrap();
        let before = bank.totals();

        assert_eq!(bank.borrow(b, 10, 12, true), Err(BankError::TotalsOverflow));
        assert_eq!(bank.totals(), before);
        assert!(bank.account(b).unwrap().loans().is_empty());
        assert_eq!(bank.event_log().events_of_type("LoanGranted").len(), 1);
        assert!(bank.checked_totals().is_ok());
    }

    #[test]
    fn test_unbacked_cheque_past_max_deposits_is_refused() {
        let (mut bank, a, b) = open_bank();
        bank.borrow(a, i64::MAX, 12, true).unwrap();
        let cheque = bank.issue_unbacked_cheque(b, 1).unwrap();

        assert_eq!(bank.deposit(b, cheque), Err(BankError::TotalsOverflow));
        assert_eq!(bank.account(b).unwrap().amount(), 0);
        assert_eq!(bank.deposits_total(), i64::MAX);
    }

    #[test]
    fn test_recovery_refused_when_interest_would_overflow() {
        let config = BankConfig {
            rates: RateConfig {
                initial_rate: 0.01,
                ..RateConfig::default()
            },
            ..BankConfig::default()
        };
        let mut bank = Bank::new("bank", config);
        let a = bank.open_account("a").unwrap();
        bank.open(0).unwrap();
        bank.borrow(a, i64::MAX, 12, false).unwrap();
        let before = bank.totals();

        assert_eq!(bank.debt_recovery(), Err(BankError::TotalsOverflow));
        assert_eq!(bank.totals(), before);
        assert!(bank.event_log().events_of_type("InstallmentPaid").is_empty());
    }

    #[test]
    fn test_dividend_skipped_without_shareholders() {
        let (mut bank, a, _) = open_bank();
        bank.borrow(a, 1_000, 12, true).unwrap();
        assert_eq!(bank.pay_dividends(), Ok(0));
    }
}
