//! Step counting and wall-clock stamps for the simulation
//!
//! The simulator advances in discrete steps. A step is one attempt to fire a
//! transition (manual or scheduled); whether rejected attempts count is
//! decided by the caller (see `StepCounting`). Event records additionally
//! carry a wall-clock timestamp in milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
///
/// A clock set before 1970 yields 0 rather than failing.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Counts simulation steps and hands out event timestamps
///
/// # Example
/// ```
/// use token_flow_core_rs::StepClock;
///
/// let mut clock = StepClock::new();
/// assert_eq!(clock.steps(), 0);
///
/// clock.advance_step();
/// assert_eq!(clock.steps(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepClock {
    /// Steps counted since the last reset
    steps: u64,

    /// Fixed timestamp returned instead of the system time (tests, replays)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frozen_at: Option<u64>,
}

impl StepClock {
    /// Create a clock at step 0 reading the system time
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock whose timestamps never move
    ///
    /// # Example
    /// ```
    /// use token_flow_core_rs::StepClock;
    ///
    /// let clock = StepClock::frozen(1_700_000_000_000);
    /// assert_eq!(clock.timestamp(), 1_700_000_000_000);
    /// ```
    pub fn frozen(timestamp_ms: u64) -> Self {
        Self {
            steps: 0,
            frozen_at: Some(timestamp_ms),
        }
    }

    /// Count one more step
    pub fn advance_step(&mut self) {
        self.steps += 1;
    }

    /// Steps counted since the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Restore a step count (checkpoint restore)
    pub(crate) fn set_steps(&mut self, steps: u64) {
        self.steps = steps;
    }

    /// Back to step 0; a frozen clock stays frozen
    pub fn reset(&mut self) {
        self.steps = 0;
    }

    /// Timestamp for a new event record
    pub fn timestamp(&self) -> u64 {
        self.frozen_at.unwrap_or_else(now_millis)
    }
}
