//! Priority-ordered selection
//!
//! Fires the first enabled transition in a caller-supplied preference order.
//! Transitions the order does not mention rank below every listed one and
//! keep their declared order among themselves. The preference lives in the
//! policy, not in the network: the network model itself has no priorities.

use super::{PolicyError, SelectionContext, SelectionPolicy};
use crate::models::network::Network;
use crate::rng::RngManager;

#[derive(Debug, Clone)]
pub struct PriorityOrderedPolicy {
    /// rank[transition index], lower fires first
    rank: Vec<usize>,
}

impl PriorityOrderedPolicy {
    /// Resolve a preference order of transition ids against `network`
    ///
    /// # Example
    ///
    /// ```
    /// use token_flow_core_rs::policy::PriorityOrderedPolicy;
    /// use token_flow_core_rs::presets::airport_network;
    ///
    /// let network = airport_network().unwrap();
    /// let order = vec!["T4".to_string(), "T2".to_string()];
    /// assert!(PriorityOrderedPolicy::from_ids(&network, &order).is_ok());
    ///
    /// let bad = vec!["T9".to_string()];
    /// assert!(PriorityOrderedPolicy::from_ids(&network, &bad).is_err());
    /// ```
    pub fn from_ids(network: &Network, order: &[String]) -> Result<Self, PolicyError> {
        let listed = order.len();
        let mut rank: Vec<Option<usize>> = vec![None; network.num_transitions()];

        for (position, id) in order.iter().enumerate() {
            let index = network
                .transition_index(id)
                .ok_or_else(|| PolicyError::UnknownTransition(id.clone()))?;
            if rank[index].is_some() {
                return Err(PolicyError::DuplicateEntry(id.clone()));
            }
            rank[index] = Some(position);
        }

        let rank = rank
            .into_iter()
            .enumerate()
            .map(|(index, r)| r.unwrap_or(listed + index))
            .collect();

        Ok(Self { rank })
    }
}

impl SelectionPolicy for PriorityOrderedPolicy {
    fn select(&mut self, ctx: &SelectionContext<'_>, _rng: &mut RngManager) -> Option<usize> {
        ctx.enabled
            .iter()
            .copied()
            .min_by_key(|&i| self.rank.get(i).copied().unwrap_or(usize::MAX))
    }

    fn name(&self) -> &'static str {
        "priority-ordered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::airport_network;

    fn policy(order: &[&str]) -> Result<PriorityOrderedPolicy, PolicyError> {
        let order: Vec<String> = order.iter().map(|s| s.to_string()).collect();
        PriorityOrderedPolicy::from_ids(&airport_network().unwrap(), &order)
    }

    fn pick(policy: &mut PriorityOrderedPolicy, enabled: &[usize]) -> Option<usize> {
        let network = airport_network().unwrap();
        let ctx = SelectionContext {
            network: &network,
            enabled,
            last_fired: None,
        };
        policy.select(&ctx, &mut RngManager::new(1))
    }

    #[test]
    fn test_listed_transition_wins() {
        let mut p = policy(&["T4", "T2"]).unwrap();
        // T1, T2, T4 enabled -> T4 first
        assert_eq!(pick(&mut p, &[0, 1, 3]), Some(3));
        // T1, T2 enabled -> T2
        assert_eq!(pick(&mut p, &[0, 1]), Some(1));
    }

    #[test]
    fn test_unlisted_fall_back_to_declared_order() {
        let mut p = policy(&["T4"]).unwrap();
        assert_eq!(pick(&mut p, &[1, 2]), Some(1));
    }

    #[test]
    fn test_unknown_and_duplicate_entries_rejected() {
        assert_eq!(
            policy(&["T1", "TX"]).unwrap_err(),
            PolicyError::UnknownTransition("TX".to_string())
        );
        assert_eq!(
            policy(&["T1", "T1"]).unwrap_err(),
            PolicyError::DuplicateEntry("T1".to_string())
        );
    }
}
