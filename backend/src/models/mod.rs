//! Domain models for the token-flow simulator

pub mod event;
pub mod marking;
pub mod network;

// Re-exports
pub use event::{EventLog, EventRecord};
pub use marking::Marking;
pub use network::{
    Arc, ArcDefinition, ArcDirection, Network, NetworkDefinition, NetworkError, Place,
    PlaceDefinition, PlaceEffect, Transition, TransitionDefinition,
};
