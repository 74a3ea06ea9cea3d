//! Replay
//!
//! Re-applies logged firings to an initial marking. Because firing is a pure,
//! deterministic function of `(network, marking, transition)`, replaying a
//! log from the initial marking reproduces every intermediate marking.

use crate::firing::engine::{fire_in_place, FireError};
use crate::models::event::EventRecord;
use crate::models::marking::Marking;
use crate::models::network::Network;
use thiserror::Error;

/// A logged firing that does not apply during replay
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Replay diverged at step {step}: {source}")]
    Diverged { step: u64, source: FireError },
}

/// Replay `records` in order starting from `initial`
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::firing::replay;
/// use token_flow_core_rs::presets::airport_network;
/// use token_flow_core_rs::{EventRecord, Marking};
///
/// let network = airport_network().unwrap();
/// let initial = Marking::initial(&network);
/// let cycle: Vec<EventRecord> = ["T1", "T2", "T3", "T4"]
///     .iter()
///     .enumerate()
///     .map(|(i, id)| EventRecord {
///         step: i as u64 + 1,
///         transition_id: id.to_string(),
///         timestamp_ms: 0,
///     })
///     .collect();
///
/// let end = replay(&network, &initial, &cycle).unwrap();
/// assert_eq!(end, initial);
/// ```
pub fn replay(
    network: &Network,
    initial: &Marking,
    records: &[EventRecord],
) -> Result<Marking, ReplayError> {
    let mut marking = initial.clone();
    for record in records {
        fire_in_place(network, &mut marking, &record.transition_id).map_err(|source| {
            ReplayError::Diverged {
                step: record.step,
                source,
            }
        })?;
    }
    Ok(marking)
}
