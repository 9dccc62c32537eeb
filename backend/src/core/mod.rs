//! Time and lifecycle primitives shared by every ledger

pub mod period;
pub mod time;

pub use period::{PeriodError, PeriodGuard};
pub use time::{PeriodClock, PERIODS_PER_YEAR};
