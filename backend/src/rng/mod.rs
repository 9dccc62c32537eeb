//! Deterministic random number generation
//!
//! CRITICAL: All randomness in a run MUST go through this module.

mod xorshift;

pub use xorshift::DeterministicRng;
