//! Checkpoint - Save/Restore Simulation State
//!
//! A [`SimulationSnapshot`] holds everything a run needs to continue exactly
//! where it stopped. It does not carry the network itself; restoring takes the
//! configuration again and checks it against the recorded network hash.
//!
//! # Critical Invariants
//!
//! - **Network Matching**: a snapshot only restores onto the network it was
//!   taken from (SHA-256 over canonical JSON of the definition)
//! - **Log Integrity**: event steps run exactly `1..=n`
//! - **Replay Consistency**: replaying the log from the initial marking gives
//!   the recorded marking
//! - **Determinism**: the RNG resumes from its recorded state

use crate::firing::replay;
use crate::models::event::EventLog;
use crate::models::marking::Marking;
use crate::models::network::{Network, NetworkDefinition};
use crate::orchestrator::engine::{RunState, SimulationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Complete simulator state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub run_id: String,

    /// SHA-256 of the network definition (hex)
    pub network_hash: String,

    pub marking: Marking,

    pub event_log: EventLog,

    /// Step counter at the time of the snapshot
    pub total_steps: u64,

    /// Seed the run started from; a reset after restore reseeds with it
    pub rng_seed: u64,

    /// RNG state at the time of the snapshot
    pub rng_state: u64,

    pub run_state: RunState,
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::Serialization(e.to_string()))
    }

    /// Check this snapshot against the network it is being restored onto
    pub fn validate(
        &self,
        network: &Network,
        initial: &Marking,
        expected_hash: &str,
    ) -> Result<(), SimulationError> {
        // 1. Same network
        if self.network_hash != expected_hash {
            return Err(SimulationError::NetworkMismatch {
                expected: expected_hash.to_string(),
                actual: self.network_hash.clone(),
            });
        }

        // 2. Marking shape
        if !self.marking.is_compatible_with(network) {
            return Err(SimulationError::StateValidation(
                "marking does not cover the network's places".to_string(),
            ));
        }

        // 3. Log steps contiguous
        let records = self.event_log.records().to_vec();
        if let Err(position) = EventLog::from_records(records) {
            return Err(SimulationError::StateValidation(format!(
                "event log out of sequence at position {}",
                position
            )));
        }

        // 4. Every logged event was counted as a step
        if self.total_steps < self.event_log.len() as u64 {
            return Err(SimulationError::StateValidation(format!(
                "{} events recorded but only {} steps",
                self.event_log.len(),
                self.total_steps
            )));
        }

        // 5. Replay reproduces the marking
        let replayed = replay(network, initial, self.event_log.records())?;
        if replayed != self.marking {
            return Err(SimulationError::StateValidation(
                "replaying the event log does not reproduce the recorded marking".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Network Hashing
// ============================================================================

/// Deterministic SHA-256 hash of a network definition
///
/// Object keys are sorted before hashing, so the hash depends on content and
/// declaration order of places and transitions only.
pub fn compute_network_hash(definition: &NetworkDefinition) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(definition).map_err(|e| {
        SimulationError::Serialization(format!("Network serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Network serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
