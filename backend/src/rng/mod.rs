//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every random choice the simulator makes
//! (today only the uniform selection policy) draws from one `RngManager`, so
//! a seed fully determines an autonomous run.

mod xorshift;

pub use xorshift::RngManager;
