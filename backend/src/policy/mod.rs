//! Selection Policy Module
//!
//! Decides which enabled transition fires on an autonomous step.
//!
//! # Overview
//!
//! The scheduler computes the enabled set, hands it to the configured policy
//! and fires whatever the policy returns. The policy never fires anything
//! itself and never sees the marking, only the enabled set, so swapping
//! policies cannot break the firing invariants.
//!
//! # Policy Interface
//!
//! All policies implement the `SelectionPolicy` trait:
//! ```rust
//! use token_flow_core_rs::policy::{SelectionContext, SelectionPolicy};
//! use token_flow_core_rs::RngManager;
//!
//! /// Always fires the last enabled transition
//! struct LastPolicy;
//!
//! impl SelectionPolicy for LastPolicy {
//!     fn select(&mut self, ctx: &SelectionContext<'_>, _rng: &mut RngManager) -> Option<usize> {
//!         ctx.enabled.last().copied()
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "last"
//!     }
//! }
//! ```
//!
//! # Available policies
//!
//! 1. **UniformRandom**: every enabled transition equally likely (default)
//! 2. **RoundRobin**: next enabled transition after the last one fired, in
//!    declared order, wrapping around
//! 3. **PriorityOrdered**: first enabled transition in a caller-supplied order
//!
//! Policies keep no state of their own: randomness comes from the simulator's
//! seeded RNG and the round-robin cursor from the event log. A checkpoint of
//! RNG state plus log is therefore enough to resume a run exactly.

use crate::models::network::Network;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod priority;
pub mod round_robin;
pub mod uniform;

pub use priority::PriorityOrderedPolicy;
pub use round_robin::RoundRobinPolicy;
pub use uniform::UniformRandomPolicy;

/// Everything a policy may look at when choosing
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// The network being simulated
    pub network: &'a Network,

    /// Indices of enabled transitions, in declared order; never empty
    pub enabled: &'a [usize],

    /// Index of the transition that fired most recently, if any
    pub last_fired: Option<usize>,
}

/// Chooses one transition out of the enabled set
pub trait SelectionPolicy: Send + Sync {
    /// Pick a member of `ctx.enabled`
    ///
    /// Returning `None` or an index outside the enabled set stalls the run.
    fn select(&mut self, ctx: &SelectionContext<'_>, rng: &mut RngManager) -> Option<usize>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Errors building a policy from configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Priority order names unknown transition {0}")]
    UnknownTransition(String),

    #[error("Priority order lists transition {0} more than once")]
    DuplicateEntry(String),
}

/// Policy selection for autonomous stepping
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::policy::PolicyConfig;
///
/// let config: PolicyConfig =
///     serde_json::from_str(r#"{"type": "PriorityOrdered", "order": ["T4", "T3"]}"#).unwrap();
/// assert_eq!(
///     config,
///     PolicyConfig::PriorityOrdered { order: vec!["T4".to_string(), "T3".to_string()] }
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PolicyConfig {
    /// Uniformly random among enabled transitions
    #[default]
    UniformRandom,

    /// Cycle through transitions in declared order
    RoundRobin,

    /// Prefer transitions in this order; unlisted ones come last, in declared order
    PriorityOrdered { order: Vec<String> },
}

impl PolicyConfig {
    /// Instantiate the policy for `network`
    pub fn build(&self, network: &Network) -> Result<Box<dyn SelectionPolicy>, PolicyError> {
        let policy: Box<dyn SelectionPolicy> = match self {
            PolicyConfig::UniformRandom => Box::new(UniformRandomPolicy::new()),
            PolicyConfig::RoundRobin => Box::new(RoundRobinPolicy::new()),
            PolicyConfig::PriorityOrdered { order } => {
                Box::new(PriorityOrderedPolicy::from_ids(network, order)?)
            }
        };
        Ok(policy)
    }
}
