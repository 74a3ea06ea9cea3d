//! Firing Module
//!
//! Enablement checks, atomic firing and log replay. Everything here is a pure
//! function of `(network, marking)`; nothing holds state between calls.
//!
//! # Critical Invariants
//!
//! 1. **Atomicity**: a firing applies all of its arc effects or none of them
//! 2. **Conservation**: a firing of `T` changes the token total by exactly
//!    `produced(T) - consumed(T)`
//! 3. **Non-negativity**: a transition only fires when every input place holds
//!    at least its arc weight
//! 4. **Capacity**: no firing leaves a bounded place above its capacity
//!
//! # Example
//!
//! ```rust
//! use token_flow_core_rs::firing::{enabled_set, fire, FireError};
//! use token_flow_core_rs::{Marking, NetworkDefinition};
//!
//! let network = NetworkDefinition::new("relay")
//!     .place("IN", "", 1)
//!     .place("OUT", "", 0)
//!     .transition("MOVE", "", &[("IN", 1)], &[("OUT", 1)])
//!     .build()
//!     .unwrap();
//!
//! let start = Marking::initial(&network);
//! assert_eq!(enabled_set(&network, &start), vec!["MOVE".to_string()]);
//!
//! let next = fire(&network, &start, "MOVE").unwrap();
//! assert_eq!(next.get("OUT"), Some(1));
//!
//! // Nothing left to move
//! let again = fire(&network, &next, "MOVE");
//! assert_eq!(again, Err(FireError::NotEnabled("MOVE".to_string())));
//! ```

pub mod enablement;
pub mod engine;
pub mod replay;

// Re-export public API
pub use enablement::{enabled_indices, enabled_set, is_enabled};
pub use engine::{fire, fire_in_place, FireError};
pub use replay::{replay, ReplayError};
