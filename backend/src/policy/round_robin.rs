//! Round-robin selection
//!
//! Walks the transitions in declared order, starting just after the one that
//! fired last and wrapping around, and picks the first enabled one. The
//! cursor is the last fired transition, which the simulator derives from
//! its event log.

use super::{SelectionContext, SelectionPolicy};
use crate::rng::RngManager;

#[derive(Debug, Default)]
pub struct RoundRobinPolicy;

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionPolicy for RoundRobinPolicy {
    fn select(&mut self, ctx: &SelectionContext<'_>, _rng: &mut RngManager) -> Option<usize> {
        let after = match ctx.last_fired {
            Some(last) => ctx.enabled.iter().copied().find(|&i| i > last),
            None => None,
        };
        after.or_else(|| ctx.enabled.first().copied())
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::airport_network;

    fn pick(enabled: &[usize], last_fired: Option<usize>) -> Option<usize> {
        let network = airport_network().unwrap();
        let ctx = SelectionContext {
            network: &network,
            enabled,
            last_fired,
        };
        RoundRobinPolicy::new().select(&ctx, &mut RngManager::new(1))
    }

    #[test]
    fn test_starts_with_first_enabled() {
        assert_eq!(pick(&[1, 3], None), Some(1));
    }

    #[test]
    fn test_advances_past_last_fired() {
        assert_eq!(pick(&[0, 1, 3], Some(1)), Some(3));
        assert_eq!(pick(&[0, 1, 3], Some(0)), Some(1));
    }

    #[test]
    fn test_wraps_around() {
        assert_eq!(pick(&[0, 2], Some(3)), Some(0));
        assert_eq!(pick(&[0, 2], Some(2)), Some(0));
    }

    #[test]
    fn test_nothing_enabled() {
        assert_eq!(pick(&[], Some(1)), None);
    }
}
