//! Per-period snapshots of the bank for reporting and reproducibility
//!
//! A snapshot is a plain serde tree of the whole ledger. Two runs with the
//! same seed and configuration must produce the same state hash in every
//! period.

use crate::bank::{Bank, BankTotals};
use crate::equity::{CapitalStock, CertificateId, StockCertificate};
use crate::models::account::{Account, AccountId};
use crate::models::amount::checked_sum;
use crate::models::cheque::PendingCheque;
use crate::models::loan::{Loan, Rates};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    ValidationError(String),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete ledger state at the end of a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub bank: String,
    pub period: Option<usize>,
    pub rates: Rates,
    pub accounts: Vec<AccountSnapshot>,
    pub totals: BankTotals,
    pub ownership: OwnershipSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub holder: String,
    pub deposit: i64,
    pub loans: Vec<Loan>,
    pub overdue_debt: i64,
    pub pending_cheque: Option<PendingCheque>,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            holder: account.holder().to_string(),
            deposit: account.amount(),
            loans: account.loans().to_vec(),
            overdue_debt: account.overdue_debt(),
            pending_cheque: account.pending_cheque().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipSnapshot {
    pub shares_authorized: u32,
    pub book_value: i64,
    pub certificates: Vec<CertificateSnapshot>,
}

impl From<&CapitalStock> for OwnershipSnapshot {
    fn from(stock: &CapitalStock) -> Self {
        Self {
            shares_authorized: stock.shares_authorized(),
            book_value: stock.corporation_book_value(),
            certificates: stock.certificates().iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSnapshot {
    pub id: CertificateId,
    pub holder: AccountId,
    pub shares: u32,
    pub book_value: i64,
    pub canceled: bool,
}

impl From<&StockCertificate> for CertificateSnapshot {
    fn from(certificate: &StockCertificate) -> Self {
        Self {
            id: certificate.id(),
            holder: certificate.holder(),
            shares: certificate.shares(),
            book_value: certificate.book_value(),
            canceled: certificate.is_canceled(),
        }
    }
}

impl BankSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::SerializationError(e.to_string()))
    }
}

impl Bank {
    /// Capture the ledger; certificate book values are brought up to date
    /// first
    pub fn snapshot(&mut self) -> BankSnapshot {
        self.ownership_mut().revalue();
        BankSnapshot {
            bank: self.name().to_string(),
            period: self.current_period(),
            rates: self.rates(),
            accounts: self.accounts().iter().map(Into::into).collect(),
            totals: self.totals(),
            ownership: self.ownership().into(),
        }
    }
}

// ============================================================================
// State Hashing
// ============================================================================

/// Deterministic SHA256 hash of any serializable state
///
/// Object keys are sorted before hashing so the digest does not depend on
/// map iteration order.
pub fn compute_state_hash<T: Serialize>(state: &T) -> Result<String, SnapshotError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(state)
        .map_err(|e| SnapshotError::SerializationError(format!("State serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SnapshotError::SerializationError(format!("State serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - Deposit and debt totals match the per-account ledgers and fit in an i64
/// - No ledger cell is negative and no repaid loan is still held
/// - Pending cheques carry a positive amount
/// - The share register does not exceed the authorized pool
/// - Certificate book values sum to the corporation's book value once the
///   register is fully distributed
pub fn validate_snapshot(snapshot: &BankSnapshot) -> Result<(), SnapshotError> {
    let invalid = |msg: String| Err(SnapshotError::ValidationError(msg));

    for account in &snapshot.accounts {
        if account.deposit < 0 || account.overdue_debt < 0 {
            return invalid(format!("Negative ledger in {}", account.id));
        }
        if account.loans.iter().any(|loan| loan.principal() <= 0) {
            return invalid(format!("Repaid loan still held by {}", account.id));
        }
        if account.pending_cheque.is_some_and(|c| c.amount <= 0) {
            return invalid(format!("Empty pending cheque in {}", account.id));
        }
    }

    let overflow = |what: &str| SnapshotError::ValidationError(format!("{} overflow i64", what));
    let deposits = checked_sum(snapshot.accounts.iter().map(|a| a.deposit))
        .map_err(|_| overflow("Deposits"))?;
    if deposits != snapshot.totals.deposits {
        return invalid(format!(
            "Deposit total mismatch: ledgers {}, total {}",
            deposits, snapshot.totals.deposits
        ));
    }

    let debt = checked_sum(snapshot.accounts.iter().flat_map(|a| {
        a.loans
            .iter()
            .map(Loan::principal)
            .chain(std::iter::once(a.overdue_debt))
    }))
    .map_err(|_| overflow("Debts"))?;
    let assets = snapshot
        .totals
        .outstanding_debt
        .checked_add(snapshot.totals.overdue_debt)
        .ok_or_else(|| overflow("Assets"))?;
    if debt != assets {
        return invalid(format!(
            "Debt total mismatch: ledgers {}, outstanding + overdue {}",
            debt, assets
        ));
    }

    let ownership = &snapshot.ownership;
    let issued: u32 = ownership.certificates.iter().map(|c| c.shares).sum();
    if issued > ownership.shares_authorized {
        return invalid(format!(
            "Share register over-issued: {} of {}",
            issued, ownership.shares_authorized
        ));
    }
    if issued == ownership.shares_authorized {
        let book = checked_sum(ownership.certificates.iter().map(|c| c.book_value))
            .map_err(|_| overflow("Book values"))?;
        if book != ownership.book_value {
            return invalid(format!(
                "Book value mismatch: certificates {}, corporation {}",
                book, ownership.book_value
            ));
        }
    }

    Ok(())
}
