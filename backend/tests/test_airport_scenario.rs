//! Airport Network Walkthrough
//!
//! One full plane cycle through the default airport network, checked
//! marking by marking, plus the preset scenarios.

use token_flow_core_rs::orchestrator::{RunState, Simulator, SimulatorConfig};
use token_flow_core_rs::presets::{
    airport_definition, airport_statistics_config, AirportScenario, DEFAULT_MAX_TOKENS_PER_PLACE,
};
use token_flow_core_rs::FireError;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_airport(scenario: AirportScenario) -> Simulator {
    let config = SimulatorConfig::new(airport_definition(scenario, None))
        .with_seed(12345)
        .with_statistics(airport_statistics_config());
    Simulator::new(config).unwrap()
}

fn counts(sim: &Simulator) -> Vec<u64> {
    sim.marking().counts()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Full Cycle
// ============================================================================

#[test]
fn test_initial_enabled_set_is_landing_only() {
    let sim = create_airport(AirportScenario::Default);
    assert_eq!(counts(&sim), vec![3, 0, 0, 1, 0]);
    assert_eq!(sim.enabled_transitions(), ids(&["T1"]));
}

#[test]
fn test_full_plane_cycle() {
    let mut sim = create_airport(AirportScenario::Default);

    // Landing
    assert!(sim.fire_transition("T1"));
    assert_eq!(counts(&sim), vec![2, 1, 0, 1, 0]);
    assert_eq!(sim.enabled_transitions(), ids(&["T1", "T2"]));

    // Start boarding takes the gate
    assert!(sim.fire_transition("T2"));
    assert_eq!(counts(&sim), vec![2, 0, 1, 0, 0]);
    assert_eq!(sim.enabled_transitions(), ids(&["T1", "T3"]));

    // Finish boarding frees the gate
    assert!(sim.fire_transition("T3"));
    assert_eq!(counts(&sim), vec![2, 0, 0, 1, 1]);
    // gate is free again but nobody is waiting for it
    assert_eq!(sim.enabled_transitions(), ids(&["T1", "T4"]));

    // Takeoff closes the cycle
    assert!(sim.fire_transition("T4"));
    assert_eq!(sim.marking(), sim.initial_marking());

    let steps: Vec<u64> = sim.event_log().records().iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4]);
}

#[test]
fn test_finish_boarding_without_boarding_plane_is_not_enabled() {
    let mut sim = create_airport(AirportScenario::Default);
    let before = sim.marking().clone();

    assert_eq!(
        sim.try_fire("T3"),
        Err(FireError::NotEnabled("T3".to_string()))
    );
    assert_eq!(sim.marking(), &before);
    assert!(sim.event_log().is_empty());
}

#[test]
fn test_cycle_statistics() {
    let mut sim = create_airport(AirportScenario::Default);
    for id in ["T1", "T2", "T3", "T4"] {
        assert!(sim.fire_transition(id));
    }
    assert!(!sim.fire_transition("T3"));

    let stats = sim.statistics();
    assert_eq!(stats.total_events, 4);
    assert_eq!(stats.total_steps, 5);
    assert!((stats.efficiency - 80.0).abs() < 1e-9);
    assert!((stats.utilization - 0.25).abs() < 1e-12);
    assert!(!stats.bottleneck);
    assert_eq!(stats.total_tokens, 4);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_bottleneck_scenario_flags_bottleneck() {
    let sim = create_airport(AirportScenario::Bottleneck);
    assert!(sim.statistics().bottleneck);
    // gate taken, nothing can board
    assert_eq!(sim.enabled_transitions(), ids(&["T1"]));
}

#[test]
fn test_high_traffic_scenario_enabled_set() {
    let sim = create_airport(AirportScenario::HighTraffic);
    assert_eq!(counts(&sim), vec![5, 2, 1, 1, 0]);
    assert_eq!(sim.enabled_transitions(), ids(&["T1", "T2", "T3"]));
    assert!(!sim.statistics().bottleneck);
}

#[test]
fn test_empty_scenario_stalls_immediately() {
    let mut sim = create_airport(AirportScenario::Empty);
    assert!(sim.enabled_transitions().is_empty());
    sim.start();
    sim.tick();
    assert_eq!(sim.run_state(), RunState::Stalled);
}

#[test]
fn test_bounded_airport_rejects_overflowing_landing() {
    let definition = airport_definition(AirportScenario::HighTraffic, Some(2));
    assert!(definition.build().is_err(), "five planes do not fit in two slots");

    let config = SimulatorConfig::new(airport_definition(AirportScenario::Bottleneck, Some(3)));
    let mut sim = Simulator::new(config).unwrap();
    // P2 already holds 3 of 3
    let before = sim.marking().clone();
    assert!(matches!(
        sim.try_fire("T1"),
        Err(FireError::CapacityExceeded { capacity: 3, .. })
    ));
    assert_eq!(sim.marking(), &before);

    let roomy = SimulatorConfig::new(airport_definition(
        AirportScenario::Bottleneck,
        Some(DEFAULT_MAX_TOKENS_PER_PLACE),
    ));
    assert!(Simulator::new(roomy).unwrap().fire_transition("T1"));
}
