//! Orchestrator - simulation run control
//!
//! - `engine`: the [`Simulator`] and its configuration
//! - `checkpoint`: snapshots and network hashing
//! - `shared`: thread-safe handle

pub mod checkpoint;
pub mod engine;
pub mod shared;

pub use engine::{
    RunState, SimulationError, Simulator, SimulatorConfig, StepCounting, TickOutcome,
};

pub use checkpoint::{compute_network_hash, SimulationSnapshot};
pub use shared::SharedSimulator;
