//! CapitalStock and StockCertificate
//!
//! A corporation's capital stock is a register of certificates over a fixed
//! pool of authorized shares. The stock is the only mutator of its
//! certificates; holders read them through the stock.
//!
//! # Valuation
//!
//! The corporation pushes its book value with `set_book_value`, which marks
//! the register dirty. Certificate book values are recomputed by
//! `revalue()`, run lazily on the next read.
//!
//! # Dividends
//!
//! `set_dividend` allocates a total over the register once per open period.
//! Each certificate then yields at most one cheque through `get_dividend`.
//! Anything not claimed by `close()` lapses.

use crate::core::period::{PeriodError, PeriodGuard};
use crate::equity::allocation::{allocate_book_value, allocate_dividend, share_out, SHARES_AUTHORIZED};
use crate::models::account::AccountId;
use crate::models::amount::{Amount, AmountError};
use crate::models::cheque::{Cheque, ChequeError, ChequeIssuer};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Index of a certificate inside its capital stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub usize);

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "certificate#{}", self.0)
    }
}

/// Errors that can occur on a capital stock
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquityError {
    #[error("Capital already shared out ({issued} shares issued)")]
    AlreadyDistributed { issued: u32 },

    #[error("Cannot share out {authorized} shares over {holders} holders")]
    InvalidHolderCount { holders: usize, authorized: u32 },

    #[error("Issuing {requested} shares exceeds the {available} still authorized")]
    ExceedsAuthorized { requested: u32, available: u32 },

    #[error("Share count must be positive")]
    NoShares,

    #[error("Shares not fully distributed: {issued} of {authorized}")]
    NotFullyDistributed { issued: u32, authorized: u32 },

    #[error("Dividend already set for period {period}")]
    DividendAlreadySet { period: usize },

    #[error("Certificate not found: {0}")]
    CertificateNotFound(CertificateId),

    #[error("Ledger error: {0}")]
    Amount(#[from] AmountError),

    #[error("Cheque error: {0}")]
    Cheque(#[from] ChequeError),

    #[error("Period error: {0}")]
    Period(#[from] PeriodError),
}

/// A block of shares held by one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCertificate {
    id: CertificateId,
    holder: AccountId,
    shares: u32,
    book_value: Amount,
    pending_dividend: Option<i64>,
    canceled: bool,
}

impl StockCertificate {
    fn new(id: CertificateId, holder: AccountId, shares: u32) -> Self {
        Self {
            id,
            holder,
            shares,
            book_value: Amount::new(),
            pending_dividend: None,
            canceled: false,
        }
    }

    pub fn id(&self) -> CertificateId {
        self.id
    }

    pub fn holder(&self) -> AccountId {
        self.holder
    }

    pub fn shares(&self) -> u32 {
        self.shares
    }

    /// Book value as of the last revaluation
    pub fn book_value(&self) -> i64 {
        self.book_value.value()
    }

    /// Dividend allocated and not yet claimed
    pub fn pending_dividend(&self) -> Option<i64> {
        self.pending_dividend
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

/// Fixed pool of authorized shares representing ownership of a corporation
///
/// # Example
/// ```
/// use monetary_core_rs::equity::CapitalStock;
/// use monetary_core_rs::models::AccountId;
///
/// let mut stock = CapitalStock::new("firm");
/// let ids = stock
///     .share_out_capital(&[AccountId(1), AccountId(2), AccountId(3)])
///     .unwrap();
/// stock.set_book_value(4099).unwrap();
///
/// let values: Vec<i64> = ids.iter().map(|&id| stock.book_value(id).unwrap()).collect();
/// assert_eq!(values, vec![1394, 1353, 1352]);
/// ```
#[derive(Debug, Clone)]
pub struct CapitalStock {
    corporation: String,
    shares_authorized: u32,
    /// Creation order
    certificates: Vec<StockCertificate>,
    corporation_value: Amount,
    dirty: bool,
    dividend_this_period: Option<i64>,
    period: PeriodGuard,
}

impl CapitalStock {
    pub fn new(corporation: impl Into<String>) -> Self {
        Self {
            corporation: corporation.into(),
            shares_authorized: SHARES_AUTHORIZED,
            certificates: Vec::new(),
            corporation_value: Amount::new(),
            dirty: false,
            dividend_this_period: None,
            period: PeriodGuard::new(),
        }
    }

    pub fn corporation(&self) -> &str {
        &self.corporation
    }

    pub fn shares_authorized(&self) -> u32 {
        self.shares_authorized
    }

    pub fn shares_issued(&self) -> u32 {
        self.certificates.iter().map(|c| c.shares).sum()
    }

    pub fn is_fully_distributed(&self) -> bool {
        self.shares_issued() == self.shares_authorized
    }

    pub fn certificates(&self) -> &[StockCertificate] {
        &self.certificates
    }

    pub fn certificate(&self, id: CertificateId) -> Option<&StockCertificate> {
        self.certificates.get(id.0)
    }

    /// Certificates held by `holder`
    pub fn holdings(&self, holder: AccountId) -> impl Iterator<Item = &StockCertificate> {
        self.certificates.iter().filter(move |c| c.holder == holder)
    }

    pub fn corporation_book_value(&self) -> i64 {
        self.corporation_value.value()
    }

    pub fn dividend_this_period(&self) -> Option<i64> {
        self.dividend_this_period
    }

    pub fn is_open(&self) -> bool {
        self.period.is_open()
    }

    pub fn is_canceled(&self) -> bool {
        self.period.is_canceled()
    }

    pub fn current_period(&self) -> Option<usize> {
        self.period.current()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn open(&mut self, period: usize) -> Result<(), EquityError> {
        self.period.open(period)?;
        self.dividend_this_period = None;
        Ok(())
    }

    pub(crate) fn check_open(&self, period: usize) -> Result<(), PeriodError> {
        self.period.check_open(period)
    }

    pub(crate) fn check_close(&self) -> Result<(), PeriodError> {
        self.period.ensure_open().map(|_| ())
    }

    /// Close the period; unclaimed dividends lapse
    pub fn close(&mut self) -> Result<(), EquityError> {
        self.period.close()?;
        for certificate in &mut self.certificates {
            certificate.pending_dividend = None;
        }
        Ok(())
    }

    /// Dissolve the stock; every later mutation fails
    pub fn cancel(&mut self) -> Result<(), EquityError> {
        self.period.cancel()?;
        self.corporation_value.cancel();
        self.dividend_this_period = None;
        self.dirty = false;
        for certificate in &mut self.certificates {
            certificate.book_value.cancel();
            certificate.pending_dividend = None;
            certificate.canceled = true;
        }
        Ok(())
    }

    fn ensure_not_canceled(&self) -> Result<(), EquityError> {
        if self.period.is_canceled() {
            return Err(PeriodError::Canceled.into());
        }
        Ok(())
    }

    // ========================================================================
    // Issuance
    // ========================================================================

    /// Split the whole authorized pool over `holders`, in the given order
    pub fn share_out_capital(
        &mut self,
        holders: &[AccountId],
    ) -> Result<Vec<CertificateId>, EquityError> {
        self.ensure_not_canceled()?;
        if !self.certificates.is_empty() {
            return Err(EquityError::AlreadyDistributed {
                issued: self.shares_issued(),
            });
        }
        if holders.is_empty() || holders.len() > self.shares_authorized as usize {
            return Err(EquityError::InvalidHolderCount {
                holders: holders.len(),
                authorized: self.shares_authorized,
            });
        }

        let counts = share_out(self.shares_authorized, holders.len());
        let ids = holders
            .iter()
            .zip(counts)
            .map(|(&holder, shares)| self.mint(holder, shares))
            .collect();
        Ok(ids)
    }

    /// Issue `shares` new shares to `holder`
    pub fn issue_shares(&mut self, holder: AccountId, shares: u32) -> Result<CertificateId, EquityError> {
        self.ensure_not_canceled()?;
        if shares == 0 {
            return Err(EquityError::NoShares);
        }
        let available = self.shares_authorized - self.shares_issued();
        if shares > available {
            return Err(EquityError::ExceedsAuthorized {
                requested: shares,
                available,
            });
        }
        Ok(self.mint(holder, shares))
    }

    fn mint(&mut self, holder: AccountId, shares: u32) -> CertificateId {
        let id = CertificateId(self.certificates.len());
        self.certificates.push(StockCertificate::new(id, holder, shares));
        self.dirty = true;
        id
    }

    // ========================================================================
    // Valuation
    // ========================================================================

    /// Record the corporation's current book value
    pub fn set_book_value(&mut self, value: i64) -> Result<(), EquityError> {
        self.ensure_not_canceled()?;
        self.corporation_value = Amount::with_value(value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute certificate book values if the register is dirty
    pub fn revalue(&mut self) {
        if !self.dirty {
            return;
        }
        let shares: Vec<u32> = self.certificates.iter().map(|c| c.shares).collect();
        let values = allocate_book_value(
            self.corporation_value.value(),
            &shares,
            self.shares_authorized,
        );
        for (certificate, value) in self.certificates.iter_mut().zip(values) {
            certificate.book_value = Amount::from_non_negative(value);
        }
        self.dirty = false;
    }

    /// Current book value of one certificate
    pub fn book_value(&mut self, id: CertificateId) -> Result<i64, EquityError> {
        self.revalue();
        self.certificate(id)
            .map(StockCertificate::book_value)
            .ok_or(EquityError::CertificateNotFound(id))
    }

    // ========================================================================
    // Dividends
    // ========================================================================

    /// Allocate `total` over the register for this period
    pub fn set_dividend(&mut self, total: i64) -> Result<(), EquityError> {
        let period = self.period.ensure_open()?;
        if total < 0 {
            return Err(AmountError::Negative(total).into());
        }
        if !self.is_fully_distributed() {
            return Err(EquityError::NotFullyDistributed {
                issued: self.shares_issued(),
                authorized: self.shares_authorized,
            });
        }
        if self.dividend_this_period.is_some() {
            return Err(EquityError::DividendAlreadySet { period });
        }

        let shares: Vec<u32> = self.certificates.iter().map(|c| c.shares).collect();
        let parts = allocate_dividend(total, &shares, self.shares_authorized);
        for (certificate, part) in self.certificates.iter_mut().zip(parts) {
            certificate.pending_dividend = (part > 0).then_some(part);
        }
        self.dividend_this_period = Some(total);
        Ok(())
    }

    /// Claim a certificate's dividend as a cheque written by `issuer`
    ///
    /// Returns `None` when nothing is pending, including a second claim in
    /// the same period. If the issuer refuses, the dividend stays pending.
    pub fn get_dividend<I>(
        &mut self,
        id: CertificateId,
        issuer: &mut I,
    ) -> Result<Option<Cheque>, EquityError>
    where
        I: ChequeIssuer + ?Sized,
    {
        self.period.ensure_open()?;
        let certificate = self
            .certificates
            .get_mut(id.0)
            .ok_or(EquityError::CertificateNotFound(id))?;
        let Some(amount) = certificate.pending_dividend.take() else {
            return Ok(None);
        };

        match issuer.issue_cheque(certificate.holder, amount) {
            Ok(cheque) => Ok(Some(cheque)),
            Err(err) => {
                certificate.pending_dividend = Some(amount);
                Err(err.into())
            }
        }
    }
}
