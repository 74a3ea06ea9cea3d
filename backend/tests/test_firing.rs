//! Enablement and Firing Engine Tests
//!
//! Exercises the pure firing functions directly, without a simulator:
//! weighted arcs, capacity rollback, self-loops and network validation.

use token_flow_core_rs::firing::{enabled_set, fire, fire_in_place, is_enabled, replay, ReplayError};
use token_flow_core_rs::models::ArcDirection;
use token_flow_core_rs::{EventRecord, FireError, Marking, Network, NetworkDefinition, NetworkError};

// ============================================================================
// Test Helpers
// ============================================================================

/// A -2-> ASSEMBLE -1-> B, B -1-> SHIP -1-> A (bounded C collects a by-product)
fn create_assembly_network() -> Network {
    NetworkDefinition::new("assembly")
        .place("A", "Parts", 5)
        .place("B", "Assemblies", 0)
        .bounded_place("C", "Scrap bin", 0, 1)
        .transition("ASSEMBLE", "", &[("A", 2)], &[("B", 1), ("C", 1)])
        .transition("SHIP", "", &[("B", 1)], &[("A", 1)])
        .build()
        .unwrap()
}

fn record(step: u64, id: &str) -> EventRecord {
    EventRecord {
        step,
        transition_id: id.to_string(),
        timestamp_ms: 0,
    }
}

// ============================================================================
// Enablement
// ============================================================================

#[test]
fn test_weighted_input_requires_full_weight() {
    let network = create_assembly_network();
    let one_part = Marking::from_counts(&network, [("A", 1)]).unwrap();
    let two_parts = Marking::from_counts(&network, [("A", 2)]).unwrap();

    assert_eq!(is_enabled(&network, &one_part, "ASSEMBLE"), Ok(false));
    assert_eq!(is_enabled(&network, &two_parts, "ASSEMBLE"), Ok(true));
}

#[test]
fn test_enablement_ignores_output_capacity() {
    let network = create_assembly_network();
    let full_bin = Marking::from_counts(&network, [("A", 2), ("C", 1)]).unwrap();

    // Enabled looks at inputs only; the capacity check happens on firing
    assert_eq!(enabled_set(&network, &full_bin), vec!["ASSEMBLE".to_string()]);
}

#[test]
fn test_unknown_transition_is_an_error_not_false() {
    let network = create_assembly_network();
    let marking = Marking::initial(&network);
    assert_eq!(
        is_enabled(&network, &marking, "PAINT"),
        Err(FireError::UnknownTransition("PAINT".to_string()))
    );
}

#[test]
fn test_marking_from_other_network_rejected() {
    let network = create_assembly_network();
    let other = NetworkDefinition::new("other")
        .place("X", "", 1)
        .place("Y", "", 0)
        .transition("T", "", &[("X", 1)], &[("Y", 1)])
        .build()
        .unwrap();
    let foreign = Marking::initial(&other);

    assert_eq!(
        is_enabled(&network, &foreign, "SHIP"),
        Err(FireError::IncompatibleMarking)
    );
    assert_eq!(
        fire(&network, &foreign, "SHIP"),
        Err(FireError::IncompatibleMarking)
    );
}

// ============================================================================
// Firing
// ============================================================================

#[test]
fn test_fire_applies_weights() {
    let network = create_assembly_network();
    let start = Marking::initial(&network);
    let next = fire(&network, &start, "ASSEMBLE").unwrap();
    assert_eq!(next.counts(), vec![3, 1, 1]);
    assert_eq!(start.counts(), vec![5, 0, 0], "input marking untouched");
}

#[test]
fn test_capacity_failure_rolls_back_every_place() {
    let network = create_assembly_network();
    let mut marking = Marking::from_counts(&network, [("A", 4), ("C", 1)]).unwrap();
    let before = marking.clone();

    let err = fire_in_place(&network, &mut marking, "ASSEMBLE").unwrap_err();
    assert_eq!(
        err,
        FireError::CapacityExceeded {
            transition: "ASSEMBLE".to_string(),
            place: "C".to_string(),
            capacity: 1,
        }
    );
    assert!(err.is_rejection());
    assert_eq!(marking, before, "A and B must not be touched");
}

#[test]
fn test_not_enabled_leaves_marking_unchanged() {
    let network = create_assembly_network();
    let mut marking = Marking::initial(&network);
    let before = marking.clone();
    assert_eq!(
        fire_in_place(&network, &mut marking, "SHIP"),
        Err(FireError::NotEnabled("SHIP".to_string()))
    );
    assert_eq!(marking, before);
}

#[test]
fn test_self_loop_on_full_place_fires() {
    // CHECK reads one token from the bounded place and puts it straight back
    let network = NetworkDefinition::new("loop")
        .bounded_place("FULL", "", 2, 2)
        .place("OUT", "", 0)
        .transition("CHECK", "", &[("FULL", 1)], &[("FULL", 1), ("OUT", 1)])
        .build()
        .unwrap();
    let next = fire(&network, &Marking::initial(&network), "CHECK").unwrap();
    assert_eq!(next.counts(), vec![2, 1]);
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_replay_reports_divergent_step() {
    let network = create_assembly_network();
    let initial = Marking::initial(&network);
    let log = vec![record(1, "ASSEMBLE"), record(2, "SHIP"), record(3, "SHIP")];

    assert_eq!(
        replay(&network, &initial, &log),
        Err(ReplayError::Diverged {
            step: 3,
            source: FireError::NotEnabled("SHIP".to_string()),
        })
    );
}

#[test]
fn test_replay_of_empty_log_is_initial_marking() {
    let network = create_assembly_network();
    let initial = Marking::initial(&network);
    assert_eq!(replay(&network, &initial, &[]).unwrap(), initial);
}

// ============================================================================
// Network Validation
// ============================================================================

#[test]
fn test_validation_errors() {
    let duplicate_place = NetworkDefinition::new("n")
        .place("A", "", 0)
        .place("A", "", 0)
        .build();
    assert_eq!(
        duplicate_place.unwrap_err(),
        NetworkError::DuplicatePlace("A".to_string())
    );

    let unknown_place = NetworkDefinition::new("n")
        .place("A", "", 0)
        .transition("T", "", &[("A", 1)], &[("Z", 1)])
        .build();
    assert_eq!(
        unknown_place.unwrap_err(),
        NetworkError::UnknownPlace {
            transition: "T".to_string(),
            place: "Z".to_string(),
        }
    );

    let zero_weight = NetworkDefinition::new("n")
        .place("A", "", 0)
        .place("B", "", 0)
        .transition("T", "", &[("A", 0)], &[("B", 1)])
        .build();
    assert!(matches!(
        zero_weight.unwrap_err(),
        NetworkError::ZeroWeight { .. }
    ));

    let no_outputs = NetworkDefinition::new("n")
        .place("A", "", 0)
        .transition("T", "", &[("A", 1)], &[])
        .build();
    assert_eq!(
        no_outputs.unwrap_err(),
        NetworkError::MissingOutputs("T".to_string())
    );

    let doubled = NetworkDefinition::new("n")
        .place("A", "", 0)
        .place("B", "", 0)
        .transition("T", "", &[("A", 1), ("A", 1)], &[("B", 1)])
        .build();
    assert_eq!(
        doubled.unwrap_err(),
        NetworkError::DuplicateArc {
            transition: "T".to_string(),
            place: "A".to_string(),
            direction: ArcDirection::Input,
        }
    );
}

#[test]
fn test_network_from_json() {
    let json = r#"{
        "name": "relay",
        "places": [
            {"id": "IN", "label": "Inbox", "tokens": 2},
            {"id": "OUT", "capacity": 1}
        ],
        "transitions": [
            {"id": "MOVE", "inputs": [{"place": "IN"}], "outputs": [{"place": "OUT", "weight": 1}]}
        ]
    }"#;
    let network = NetworkDefinition::from_json(json).unwrap().build().unwrap();
    let mut marking = Marking::initial(&network);

    fire_in_place(&network, &mut marking, "MOVE").unwrap();
    assert!(matches!(
        fire_in_place(&network, &mut marking, "MOVE"),
        Err(FireError::CapacityExceeded { capacity: 1, .. })
    ));
    assert_eq!(marking.counts(), vec![1, 1]);
}
