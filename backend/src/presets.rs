//! Built-in networks
//!
//! The airport network models planes moving through a single boarding gate:
//!
//! ```text
//! P1 (in flight) --T1--> P2 (waiting) --T2--> P3 (boarding) --T3--> P5 (ready) --T4--> P1
//!                                       ^                      |
//!                                       +------ P4 (gate) <----+
//! ```
//!
//! `T2` needs a waiting plane and the free gate; `T3` hands the gate back.
//! Scenarios vary the initial marking only.

use crate::models::network::{Network, NetworkDefinition, NetworkError};
use crate::stats::{BottleneckRule, StatisticsConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default per-place cap when the airport is built bounded
pub const DEFAULT_MAX_TOKENS_PER_PLACE: u64 = 10;

/// Initial markings for the airport network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirportScenario {
    /// Three planes in flight, gate free
    #[default]
    Default,

    /// One plane in flight, three waiting, gate occupied elsewhere
    Bottleneck,

    /// Five in flight, two waiting, one boarding
    HighTraffic,

    /// No planes, gate free
    Empty,
}

impl AirportScenario {
    pub const ALL: [AirportScenario; 4] = [
        AirportScenario::Default,
        AirportScenario::Bottleneck,
        AirportScenario::HighTraffic,
        AirportScenario::Empty,
    ];

    /// Initial tokens for P1..P5
    pub fn initial_tokens(self) -> [(&'static str, u64); 5] {
        match self {
            AirportScenario::Default => [("P1", 3), ("P2", 0), ("P3", 0), ("P4", 1), ("P5", 0)],
            AirportScenario::Bottleneck => {
                [("P1", 1), ("P2", 3), ("P3", 0), ("P4", 0), ("P5", 0)]
            }
            AirportScenario::HighTraffic => {
                [("P1", 5), ("P2", 2), ("P3", 1), ("P4", 1), ("P5", 0)]
            }
            AirportScenario::Empty => [("P1", 0), ("P2", 0), ("P3", 0), ("P4", 1), ("P5", 0)],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AirportScenario::Default => "default",
            AirportScenario::Bottleneck => "bottleneck",
            AirportScenario::HighTraffic => "high-traffic",
            AirportScenario::Empty => "empty",
        }
    }
}

impl fmt::Display for AirportScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AirportScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AirportScenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| format!("unknown airport scenario: {}", s))
    }
}

/// Airport network definition for a scenario
///
/// With `capacity`, every place holds at most that many tokens.
pub fn airport_definition(scenario: AirportScenario, capacity: Option<u64>) -> NetworkDefinition {
    let labels = [
        ("P1", "Planes in flight"),
        ("P2", "Planes waiting to board"),
        ("P3", "Planes boarding"),
        ("P4", "Gate free"),
        ("P5", "Planes ready for takeoff"),
    ];

    let mut definition = NetworkDefinition::new("airport");
    for ((id, label), (_, tokens)) in labels.iter().zip(scenario.initial_tokens()) {
        definition = match capacity {
            Some(cap) => definition.bounded_place(id, label, tokens, cap),
            None => definition.place(id, label, tokens),
        };
    }

    definition
        .transition("T1", "Landing", &[("P1", 1)], &[("P2", 1)])
        .transition("T2", "Start boarding", &[("P2", 1), ("P4", 1)], &[("P3", 1)])
        .transition("T3", "Finish boarding", &[("P3", 1)], &[("P5", 1), ("P4", 1)])
        .transition("T4", "Takeoff", &[("P5", 1)], &[("P1", 1)])
}

/// The airport network with its default marking, unbounded
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::presets::airport_network;
///
/// let network = airport_network().unwrap();
/// assert_eq!(network.name(), "airport");
/// assert_eq!(network.num_places(), 5);
/// assert_eq!(network.num_transitions(), 4);
/// ```
pub fn airport_network() -> Result<Network, NetworkError> {
    airport_definition(AirportScenario::Default, None).build()
}

/// Statistics designations for the airport: utilization of `T2`,
/// bottleneck when more than two planes wait and nobody is boarding
pub fn airport_statistics_config() -> StatisticsConfig {
    StatisticsConfig {
        utilization_transition: Some("T2".to_string()),
        bottleneck: Some(BottleneckRule {
            queue_place: "P2".to_string(),
            threshold: 2,
            downstream_place: "P3".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marking::Marking;

    #[test]
    fn test_default_marking() {
        let network = airport_network().unwrap();
        assert_eq!(Marking::initial(&network).counts(), vec![3, 0, 0, 1, 0]);
    }

    #[test]
    fn test_every_scenario_builds() {
        for scenario in AirportScenario::ALL {
            let network = airport_definition(scenario, Some(DEFAULT_MAX_TOKENS_PER_PLACE))
                .build()
                .unwrap();
            let marking = Marking::initial(&network);
            for (id, tokens) in scenario.initial_tokens() {
                assert_eq!(marking.get(id), Some(tokens), "{} in {}", id, scenario);
            }
        }
    }

    #[test]
    fn test_bounded_places_carry_capacity() {
        let network = airport_definition(AirportScenario::Default, Some(4))
            .build()
            .unwrap();
        assert!(network.places().all(|p| p.capacity() == Some(4)));
    }

    #[test]
    fn test_capacity_below_scenario_tokens_rejected() {
        let result = airport_definition(AirportScenario::HighTraffic, Some(3)).build();
        assert!(matches!(
            result,
            Err(NetworkError::InitialExceedsCapacity { tokens: 5, .. })
        ));
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for scenario in AirportScenario::ALL {
            assert_eq!(scenario.as_str().parse::<AirportScenario>(), Ok(scenario));
        }
        assert!("rush-hour".parse::<AirportScenario>().is_err());
    }
}
