//! Exact-remainder allocation over a share register
//!
//! Every function here splits an integer total so the parts sum back to the
//! total exactly. Nothing is lost to rounding and nothing is created.
//!
//! Intermediate products go through i128 so `value × shares` cannot
//! overflow for any i64 value.

/// Number of shares every capital stock is divided into
pub const SHARES_AUTHORIZED: u32 = 100;

/// Split `authorized` shares over `holders` holders
///
/// The first `authorized % holders` holders get one share more than the
/// rest, so the counts always sum to `authorized`.
///
/// # Panics
/// Panics if `holders` is 0 or exceeds `authorized`
///
/// # Example
/// ```
/// use monetary_core_rs::equity::allocation::share_out;
///
/// assert_eq!(share_out(100, 3), vec![34, 33, 33]);
/// assert_eq!(share_out(100, 100).iter().sum::<u32>(), 100);
/// ```
pub fn share_out(authorized: u32, holders: usize) -> Vec<u32> {
    assert!(
        holders > 0 && holders <= authorized as usize,
        "holder count must be in 1..=authorized"
    );
    let n = holders as u32;
    let base = authorized / n;
    let remainder = (authorized - base * n) as usize;
    (0..holders)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Allocate a corporation's book value over certificates in creation order
///
/// Walks the register with a residual value and a residual share count.
/// A certificate holding all residual shares takes the residual value in
/// full; any other receives its proportional part of the residual, rounded
/// half up. With a fully distributed register the last certificate always
/// absorbs the remainder, so the parts sum to `value` exactly.
///
/// # Example
/// ```
/// use monetary_core_rs::equity::allocation::allocate_book_value;
///
/// assert_eq!(allocate_book_value(4099, &[34, 33, 33], 100), vec![1394, 1353, 1352]);
/// ```
pub fn allocate_book_value(value: i64, shares: &[u32], authorized: u32) -> Vec<i64> {
    let mut residual_value = i128::from(value.max(0));
    let mut residual_shares = i128::from(authorized);
    let mut allocation = Vec::with_capacity(shares.len());

    for &count in shares {
        let count = i128::from(count);
        let part = if count >= residual_shares {
            residual_value
        } else {
            (2 * count * residual_value + residual_shares) / (2 * residual_shares)
        };
        residual_value -= part;
        residual_shares -= count;
        allocation.push(part as i64);
    }
    allocation
}

/// Allocate a dividend over certificates by share count
///
/// Each certificate first gets `floor(total × shares / authorized)`. The
/// leftover units are then handed out one at a time in certificate order.
///
/// # Example
/// ```
/// use monetary_core_rs::equity::allocation::allocate_dividend;
///
/// assert_eq!(allocate_dividend(700, &[34, 33, 33], 100), vec![238, 231, 231]);
/// assert_eq!(allocate_dividend(708, &[34, 33, 33], 100), vec![241, 234, 233]);
/// ```
pub fn allocate_dividend(total: i64, shares: &[u32], authorized: u32) -> Vec<i64> {
    if shares.is_empty() || authorized == 0 {
        return Vec::new();
    }
    let total_wide = i128::from(total.max(0));
    let mut allocation: Vec<i64> = shares
        .iter()
        .map(|&count| (total_wide * i128::from(count) / i128::from(authorized)) as i64)
        .collect();

    let mut remainder = total.max(0) - allocation.iter().sum::<i64>();
    let mut i = 0;
    while remainder > 0 {
        allocation[i % shares.len()] += 1;
        remainder -= 1;
        i += 1;
    }
    allocation
}
