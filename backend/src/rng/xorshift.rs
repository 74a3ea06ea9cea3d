//! xorshift64* random number generator
//!
//! Small, fast and deterministic: 64 bits of state, 64 bits of output per
//! call. Same seed, same sequence, which is what makes seeded policy tests
//! and checkpoint restores reproducible.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use token_flow_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let pick = rng.index(4).unwrap(); // one of 0..4
/// assert!(pick < 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 because xorshift never leaves the zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Rebuild a generator from a state captured with [`RngManager::get_state`]
    ///
    /// # Example
    /// ```
    /// use token_flow_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// rng.next();
    /// let mut copy = RngManager::from_state(rng.get_state());
    /// assert_eq!(rng.next(), copy.next());
    /// ```
    pub fn from_state(state: u64) -> Self {
        Self::new(state)
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform index in `[0, len)`, `None` when `len == 0`
    ///
    /// Uses rejection sampling so every index is exactly equally likely.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let len = len as u64;
        // Largest multiple of len that fits in u64; values above it are redrawn.
        let zone = u64::MAX - (u64::MAX % len);
        loop {
            let value = self.next();
            if value < zone {
                return Some((value % len) as usize);
            }
        }
    }

    /// Current internal state (for checkpointing)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
