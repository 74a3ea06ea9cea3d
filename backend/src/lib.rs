//! Token Flow Core - Rust Engine
//!
//! Discrete-event simulation of place/transition networks with deterministic
//! execution.
//!
//! # Architecture
//!
//! - **core**: Step counting and timestamps
//! - **models**: Network definition, marking, event log
//! - **firing**: Enablement, atomic firing and replay
//! - **policy**: Selection among enabled transitions
//! - **stats**: Derived metrics over a run
//! - **orchestrator**: Simulator, run states, checkpoints
//! - **presets**: Built-in networks (airport)
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Token counts are never negative and never exceed a place's capacity
//! 2. A firing applies completely or not at all
//! 3. Replaying the event log from the initial marking reproduces the marking
//! 4. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod core;
pub mod firing;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod presets;
pub mod rng;
pub mod stats;

// Re-exports for convenience
pub use core::time::StepClock;
pub use firing::{FireError, ReplayError};
pub use models::{
    event::{EventLog, EventRecord},
    marking::Marking,
    network::{Network, NetworkDefinition, NetworkError},
};
pub use orchestrator::{
    RunState, SharedSimulator, SimulationError, SimulationSnapshot, Simulator, SimulatorConfig,
    StepCounting, TickOutcome,
};
pub use policy::{PolicyConfig, SelectionPolicy};
pub use rng::RngManager;
pub use stats::{Statistics, StatisticsConfig};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn token_flow_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulator::PySimulator>()?;
    Ok(())
}
