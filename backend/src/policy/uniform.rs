//! Uniform random selection
//!
//! Every enabled transition is equally likely. This is the simulator's
//! default and matches an unattended run where any ready operation may
//! happen next.

use super::{SelectionContext, SelectionPolicy};
use crate::rng::RngManager;

/// Uniformly random among enabled transitions
///
/// # Example
///
/// ```
/// use token_flow_core_rs::policy::{SelectionContext, SelectionPolicy, UniformRandomPolicy};
/// use token_flow_core_rs::presets::airport_network;
/// use token_flow_core_rs::RngManager;
///
/// let network = airport_network().unwrap();
/// let enabled = [0, 2];
/// let ctx = SelectionContext { network: &network, enabled: &enabled, last_fired: None };
///
/// let mut policy = UniformRandomPolicy::new();
/// let mut rng = RngManager::new(7);
/// let pick = policy.select(&ctx, &mut rng).unwrap();
/// assert!(enabled.contains(&pick));
/// ```
#[derive(Debug, Default)]
pub struct UniformRandomPolicy;

impl UniformRandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionPolicy for UniformRandomPolicy {
    fn select(&mut self, ctx: &SelectionContext<'_>, rng: &mut RngManager) -> Option<usize> {
        rng.index(ctx.enabled.len()).map(|i| ctx.enabled[i])
    }

    fn name(&self) -> &'static str {
        "uniform-random"
    }
}
