//! Enablement Evaluator
//!
//! A transition is enabled iff every input place holds at least the weight of
//! its arc. Output places and capacities play no part here; a capacity
//! conflict is only detected when the transition actually fires.

use crate::firing::engine::FireError;
use crate::models::marking::Marking;
use crate::models::network::{Network, Transition};

/// Whether `transition` may fire under `marking`
///
/// Expects a marking compatible with the transition's network.
pub(crate) fn transition_enabled(transition: &Transition, marking: &Marking) -> bool {
    transition
        .inputs()
        .iter()
        .all(|arc| marking.tokens_at(arc.place()).unwrap_or(0) >= arc.weight())
}

/// Check whether a transition is enabled
///
/// # Returns
///
/// - `Ok(true)` / `Ok(false)` for known transitions
/// - `Err(FireError::UnknownTransition)` if the id is not in the network
/// - `Err(FireError::IncompatibleMarking)` if the marking belongs to another network
pub fn is_enabled(
    network: &Network,
    marking: &Marking,
    transition_id: &str,
) -> Result<bool, FireError> {
    let transition = network
        .transition(transition_id)
        .ok_or_else(|| FireError::UnknownTransition(transition_id.to_string()))?;
    if !marking.is_compatible_with(network) {
        return Err(FireError::IncompatibleMarking);
    }
    Ok(transition_enabled(transition, marking))
}

/// Indices of enabled transitions, in declared order
pub fn enabled_indices(network: &Network, marking: &Marking) -> Vec<usize> {
    network
        .transitions()
        .enumerate()
        .filter(|(_, t)| transition_enabled(t, marking))
        .map(|(index, _)| index)
        .collect()
}

/// Ids of enabled transitions, in declared order
///
/// The order is the network's declaration order, never hash order, so two
/// calls on equal markings always agree.
pub fn enabled_set(network: &Network, marking: &Marking) -> Vec<String> {
    network
        .transitions()
        .filter(|t| transition_enabled(t, marking))
        .map(|t| t.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::network::NetworkDefinition;

    fn weighted() -> Network {
        NetworkDefinition::new("weighted")
            .place("A", "", 2)
            .place("B", "", 0)
            .transition("NEEDS_TWO", "", &[("A", 2)], &[("B", 1)])
            .transition("NEEDS_THREE", "", &[("A", 3)], &[("B", 1)])
            .transition("FROM_B", "", &[("B", 1)], &[("A", 1)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_weight_threshold_is_inclusive() {
        let net = weighted();
        let marking = Marking::initial(&net);
        assert_eq!(is_enabled(&net, &marking, "NEEDS_TWO"), Ok(true));
        assert_eq!(is_enabled(&net, &marking, "NEEDS_THREE"), Ok(false));
    }

    #[test]
    fn test_unknown_transition() {
        let net = weighted();
        let marking = Marking::initial(&net);
        assert_eq!(
            is_enabled(&net, &marking, "NOPE"),
            Err(FireError::UnknownTransition("NOPE".to_string()))
        );
    }

    #[test]
    fn test_enabled_set_in_declared_order() {
        let net = weighted();
        let marking = Marking::from_counts(&net, [("A", 3), ("B", 1)]).unwrap();
        assert_eq!(
            enabled_set(&net, &marking),
            vec!["NEEDS_TWO", "NEEDS_THREE", "FROM_B"]
        );
        assert_eq!(enabled_indices(&net, &marking), vec![0, 1, 2]);
    }

    #[test]
    fn test_enabled_set_empty_when_nothing_fires() {
        let net = weighted();
        let marking = Marking::from_counts(&net, [("A", 1)]).unwrap();
        assert!(enabled_set(&net, &marking).is_empty());
    }

    #[test]
    fn test_incompatible_marking_rejected() {
        let net = weighted();
        let other = NetworkDefinition::new("other")
            .place("X", "", 5)
            .place("Y", "", 0)
            .transition("T", "", &[("X", 1)], &[("Y", 1)])
            .build()
            .unwrap();
        assert_eq!(
            is_enabled(&net, &Marking::initial(&other), "NEEDS_TWO"),
            Err(FireError::IncompatibleMarking)
        );
    }
}
