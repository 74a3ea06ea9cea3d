//! Marking
//!
//! The complete dynamic state of a simulation: one token count per place,
//! stored in the network's declared place order.
//!
//! # Critical Invariants
//!
//! 1. **Shape**: a marking built for a network has exactly one entry per place,
//!    in network order
//! 2. **Non-negativity**: counts are `u64`, so no place can hold fewer than
//!    zero tokens
//! 3. **Single mutation path**: outside construction, only the firing engine
//!    changes counts

use crate::models::network::{Network, NetworkError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Token distribution over a network's places
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::{Marking, NetworkDefinition};
///
/// let network = NetworkDefinition::new("pair")
///     .place("A", "", 3)
///     .place("B", "", 0)
///     .transition("T", "", &[("A", 1)], &[("B", 1)])
///     .build()
///     .unwrap();
///
/// let marking = Marking::initial(&network);
/// assert_eq!(marking.get("A"), Some(3));
/// assert_eq!(marking.total_tokens(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking {
    tokens: IndexMap<String, u64>,
}

impl Marking {
    /// The network's declared initial marking
    pub fn initial(network: &Network) -> Self {
        let tokens = network
            .places()
            .map(|place| (place.id().to_string(), place.initial_tokens()))
            .collect();
        Self { tokens }
    }

    /// Build a marking from explicit counts
    ///
    /// Places missing from `counts` get zero tokens. Unknown place ids and
    /// counts above a place's capacity are rejected.
    pub fn from_counts<'a>(
        network: &Network,
        counts: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Result<Self, NetworkError> {
        let mut marking = Self {
            tokens: network
                .places()
                .map(|place| (place.id().to_string(), 0))
                .collect(),
        };
        for (id, count) in counts {
            let place = network
                .place(id)
                .ok_or_else(|| NetworkError::UnknownMarkingPlace(id.to_string()))?;
            if let Some(capacity) = place.capacity() {
                if count > capacity {
                    return Err(NetworkError::InitialExceedsCapacity {
                        place: id.to_string(),
                        tokens: count,
                        capacity,
                    });
                }
            }
            if let Some(slot) = marking.tokens.get_mut(id) {
                *slot = count;
            }
        }
        Ok(marking)
    }

    /// Token count of a place, `None` for unknown ids
    pub fn get(&self, place_id: &str) -> Option<u64> {
        self.tokens.get(place_id).copied()
    }

    /// Token count by place index (network order)
    pub fn tokens_at(&self, index: usize) -> Option<u64> {
        self.tokens.get_index(index).map(|(_, count)| *count)
    }

    pub(crate) fn set_at(&mut self, index: usize, count: u64) {
        if let Some((_, slot)) = self.tokens.get_index_mut(index) {
            *slot = count;
        }
    }

    /// Number of places covered
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether this marking has the shape of `network`'s markings
    pub fn is_compatible_with(&self, network: &Network) -> bool {
        self.tokens.len() == network.num_places()
            && self
                .tokens
                .keys()
                .zip(network.places())
                .all(|(id, place)| id == place.id())
    }

    /// `(place id, count)` pairs in network order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.tokens.iter().map(|(id, count)| (id.as_str(), *count))
    }

    /// Sum of tokens over all places, saturating at `u64::MAX`
    pub fn total_tokens(&self) -> u64 {
        self.tokens
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    /// Counts in network order
    pub fn counts(&self) -> Vec<u64> {
        self.tokens.values().copied().collect()
    }
}
