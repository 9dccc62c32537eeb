//! Corporate equity: share registers, book value and dividends

pub mod allocation;
pub mod capital_stock;

pub use allocation::{allocate_book_value, allocate_dividend, share_out, SHARES_AUTHORIZED};
pub use capital_stock::{CapitalStock, CertificateId, EquityError, StockCertificate};
