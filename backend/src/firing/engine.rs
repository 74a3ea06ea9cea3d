//! Firing Engine
//!
//! Applies one transition to a marking.
//!
//! # Firing Flow
//!
//! ```text
//! transition id ──► known? ──► enabled? ──► stage every touched place ──► capacity ok? ──► commit
//!                     │           │                                          │
//!              UnknownTransition  NotEnabled                          CapacityExceeded
//! ```
//!
//! Every place a transition touches is staged first: its input and output
//! weights are folded into one net effect, the resulting count is computed
//! and checked against the place's capacity. The marking is written only
//! after every staged count passed, so a rejected firing never leaves a
//! partial update behind.

use crate::firing::enablement::transition_enabled;
use crate::models::marking::Marking;
use crate::models::network::Network;
use thiserror::Error;

/// Reasons a firing does not happen
///
/// `NotEnabled` and `CapacityExceeded` are ordinary negative answers that
/// callers are expected to probe for; `UnknownTransition` and
/// `IncompatibleMarking` indicate an integration bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FireError {
    #[error("Unknown transition: {0}")]
    UnknownTransition(String),

    #[error("Transition {0} is not enabled")]
    NotEnabled(String),

    #[error("Firing {transition} would exceed the capacity {capacity} of place {place}")]
    CapacityExceeded {
        transition: String,
        place: String,
        capacity: u64,
    },

    #[error("Marking does not match the network's places")]
    IncompatibleMarking,
}

impl FireError {
    /// True for the expected, recoverable rejections
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FireError::NotEnabled(_) | FireError::CapacityExceeded { .. }
        )
    }
}

/// Fire a transition, returning the next marking
///
/// The input marking is left untouched whatever the outcome.
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::firing::fire;
/// use token_flow_core_rs::presets::airport_network;
/// use token_flow_core_rs::Marking;
///
/// let network = airport_network().unwrap();
/// let start = Marking::initial(&network);
///
/// let landed = fire(&network, &start, "T1").unwrap();
/// assert_eq!(landed.get("P1"), Some(2));
/// assert_eq!(landed.get("P2"), Some(1));
/// assert_eq!(start.get("P1"), Some(3));
/// ```
pub fn fire(
    network: &Network,
    marking: &Marking,
    transition_id: &str,
) -> Result<Marking, FireError> {
    let mut next = marking.clone();
    fire_in_place(network, &mut next, transition_id)?;
    Ok(next)
}

/// Fire a transition by mutating `marking`
///
/// On `Err` the marking is exactly as it was before the call.
pub fn fire_in_place(
    network: &Network,
    marking: &mut Marking,
    transition_id: &str,
) -> Result<(), FireError> {
    let index = network
        .transition_index(transition_id)
        .ok_or_else(|| FireError::UnknownTransition(transition_id.to_string()))?;
    fire_index(network, marking, index)
}

/// Fire the transition at `index` (declared order)
pub(crate) fn fire_index(
    network: &Network,
    marking: &mut Marking,
    index: usize,
) -> Result<(), FireError> {
    let transition = network
        .transition_at(index)
        .ok_or_else(|| FireError::UnknownTransition(format!("#{}", index)))?;

    if !marking.is_compatible_with(network) {
        return Err(FireError::IncompatibleMarking);
    }

    if !transition_enabled(transition, marking) {
        return Err(FireError::NotEnabled(transition.id().to_string()));
    }

    // Stage: compute every touched place's final count before writing any.
    let mut staged = Vec::with_capacity(transition.effects().len());
    for effect in transition.effects() {
        let current = marking.tokens_at(effect.place).unwrap_or(0);
        let remaining = current
            .checked_sub(effect.consume)
            .ok_or_else(|| FireError::NotEnabled(transition.id().to_string()))?;

        let place = network
            .place_at(effect.place)
            .ok_or(FireError::IncompatibleMarking)?;
        let capacity = place.capacity().unwrap_or(u64::MAX);

        match remaining.checked_add(effect.produce) {
            Some(after) if after <= capacity => staged.push((effect.place, after)),
            _ => {
                return Err(FireError::CapacityExceeded {
                    transition: transition.id().to_string(),
                    place: place.id().to_string(),
                    capacity,
                })
            }
        }
    }

    // Commit
    for (place, after) in staged {
        marking.set_at(place, after);
    }

    Ok(())
}
