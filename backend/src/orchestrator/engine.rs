//! Simulator Engine
//!
//! Owns one run of a network: the marking, the event log, the step counter,
//! the RNG and the selection policy, and drives them through the run-state
//! machine.
//!
//! # Architecture
//!
//! Every firing, manual or scheduled, goes through the same path:
//!
//! ```text
//! 1. Count the attempt (StepCounting::Attempts)
//! 2. Resolve and fire via the firing engine (check, then commit)
//! 3. On success append an EventRecord
//! 4. On success with StepCounting::Firings, count the step
//! ```
//!
//! A scheduled tick adds selection in front of that:
//!
//! ```text
//! Running ──tick──► enabled set empty? ──yes──► Stalled
//!                          │no
//!                          ▼
//!                  policy picks one ──► fire ──► Fired / Rejected
//! ```
//!
//! # Run states
//!
//! - `Idle`: not scheduling; manual firing allowed
//! - `Running`: each `tick()` fires one policy-selected transition
//! - `Stalled`: a tick found nothing enabled; `start()` resumes only once a
//!   manual firing (or reset) has enabled something again
//!
//! # Example
//!
//! ```rust
//! use token_flow_core_rs::orchestrator::{Simulator, SimulatorConfig, TickOutcome};
//! use token_flow_core_rs::presets::{airport_definition, AirportScenario};
//!
//! let config = SimulatorConfig::new(airport_definition(AirportScenario::Default, None))
//!     .with_seed(12345);
//! let mut simulator = Simulator::new(config).unwrap();
//!
//! assert_eq!(simulator.enabled_transitions(), vec!["T1".to_string()]);
//! assert!(simulator.fire_transition("T1"));
//! assert!(!simulator.fire_transition("T3"));
//!
//! simulator.start();
//! for _ in 0..10 {
//!     if let TickOutcome::Fired(record) = simulator.tick() {
//!         println!("step {}: {}", record.step, record.transition_id);
//!     }
//! }
//!
//! let stats = simulator.statistics();
//! assert_eq!(stats.total_events, simulator.event_log().len());
//! ```

use crate::core::time::StepClock;
use crate::firing::engine::fire_index;
use crate::firing::{enabled_indices, is_enabled, replay, FireError, ReplayError};
use crate::models::event::{EventLog, EventRecord};
use crate::models::marking::Marking;
use crate::models::network::{Network, NetworkDefinition, NetworkError};
use crate::orchestrator::checkpoint::{compute_network_hash, SimulationSnapshot};
use crate::policy::{PolicyConfig, PolicyError, SelectionContext, SelectionPolicy};
use crate::rng::RngManager;
use crate::stats::{compute_statistics, Statistics, StatisticsConfig};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Configuration Types
// ============================================================================

/// What the step counter counts
///
/// Efficiency is `events / steps`, so this decides whether rejected attempts
/// lower it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCounting {
    /// Every firing attempt, accepted or rejected
    #[default]
    Attempts,

    /// Successful firings only
    Firings,
}

/// Complete simulator configuration
///
/// # Fields
///
/// * `network` - Places, transitions and initial marking
/// * `rng_seed` - Seed for the selection RNG
/// * `policy` - How a tick picks among enabled transitions
/// * `statistics` - Utilization and bottleneck designations
/// * `step_counting` - What counts as a step for efficiency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub network: NetworkDefinition,

    #[serde(default)]
    pub rng_seed: u64,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub statistics: StatisticsConfig,

    #[serde(default)]
    pub step_counting: StepCounting,
}

impl SimulatorConfig {
    /// Defaults everywhere except the network
    pub fn new(network: NetworkDefinition) -> Self {
        Self {
            network,
            rng_seed: 0,
            policy: PolicyConfig::default(),
            statistics: StatisticsConfig::default(),
            step_counting: StepCounting::default(),
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_statistics(mut self, statistics: StatisticsConfig) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_step_counting(mut self, step_counting: StepCounting) -> Self {
        self.step_counting = step_counting;
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::Serialization(e.to_string()))
    }
}

// ============================================================================
// Run state and outcomes
// ============================================================================

/// Scheduler state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Stalled,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stalled => "stalled",
        };
        f.write_str(name)
    }
}

/// Result of one scheduled tick or manual step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A transition fired and was logged
    Fired(EventRecord),

    /// Nothing was enabled; the simulator is now `Stalled`
    Stalled,

    /// The simulator was not `Running`; nothing happened
    Paused,

    /// The selected transition was refused (capacity); still `Running`
    Rejected { transition: String, error: FireError },
}

impl TickOutcome {
    pub fn fired(&self) -> Option<&EventRecord> {
        match self {
            TickOutcome::Fired(record) => Some(record),
            _ => None,
        }
    }
}

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("Prefix of {requested} events requested but the log holds {available}")]
    PrefixOutOfRange { requested: usize, available: usize },

    #[error("Checkpoint was taken on a different network (expected {expected}, got {actual})")]
    NetworkMismatch { expected: String, actual: String },

    #[error("State validation error: {0}")]
    StateValidation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Simulator
// ============================================================================

/// One simulation run
///
/// # Determinism
///
/// All randomness is drawn from `rng` (seeded xorshift64*). The same
/// configuration and the same sequence of calls produce the same event log,
/// timestamps aside.
pub struct Simulator {
    /// Identifies this run in logs and checkpoints
    run_id: Uuid,

    network: Network,

    /// Marking restored by `reset()`
    initial_marking: Marking,

    marking: Marking,

    event_log: EventLog,

    /// Attempt counter and timestamp source
    clock: StepClock,

    rng_seed: u64,
    rng: RngManager,

    policy: Box<dyn SelectionPolicy>,

    statistics_config: StatisticsConfig,
    step_counting: StepCounting,

    run_state: RunState,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("run_id", &self.run_id)
            .field("network", &self.network.name())
            .field("marking", &self.marking)
            .field("events", &self.event_log.len())
            .field("steps", &self.clock.steps())
            .field("policy", &self.policy.name())
            .field("run_state", &self.run_state)
            .finish()
    }
}

impl Simulator {
    /// Create a simulator from configuration
    ///
    /// Validates the network, the policy and the statistics designations.
    ///
    /// # Returns
    ///
    /// * `Ok(Simulator)` - `Idle`, at the initial marking, empty log
    /// * `Err(SimulationError)` - the configuration is invalid
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        let network = config.network.build()?;

        let unknown = config.statistics.unknown_references(&network);
        if !unknown.is_empty() {
            return Err(SimulationError::InvalidConfig(format!(
                "statistics refer to unknown {}",
                unknown.join(", ")
            )));
        }

        let policy = config.policy.build(&network)?;
        let initial_marking = Marking::initial(&network);
        let run_id = Uuid::new_v4();

        info!(
            "simulator {} created: network {} ({} places, {} transitions), policy {}, seed {}",
            run_id,
            network.name(),
            network.num_places(),
            network.num_transitions(),
            policy.name(),
            config.rng_seed
        );

        Ok(Self {
            run_id,
            marking: initial_marking.clone(),
            initial_marking,
            network,
            event_log: EventLog::new(),
            clock: StepClock::new(),
            rng_seed: config.rng_seed,
            rng: RngManager::new(config.rng_seed),
            policy,
            statistics_config: config.statistics,
            step_counting: config.step_counting,
            run_state: RunState::Idle,
        })
    }

    /// Stamp every event with `timestamp_ms` instead of the system time
    pub fn with_frozen_clock(mut self, timestamp_ms: u64) -> Self {
        let steps = self.clock.steps();
        self.clock = StepClock::frozen(timestamp_ms);
        self.clock.set_steps(steps);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    pub fn initial_marking(&self) -> &Marking {
        &self.initial_marking
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Up to `n` most recent events, newest first
    pub fn recent_events(&self, n: usize) -> Vec<&EventRecord> {
        self.event_log.recent(n).collect()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Step counter (see [`StepCounting`])
    pub fn total_steps(&self) -> u64 {
        self.clock.steps()
    }

    pub fn step_counting(&self) -> StepCounting {
        self.step_counting
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    pub fn statistics_config(&self) -> &StatisticsConfig {
        &self.statistics_config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Ids of all enabled transitions, in declared order
    pub fn enabled_transitions(&self) -> Vec<String> {
        enabled_indices(&self.network, &self.marking)
            .into_iter()
            .filter_map(|i| self.network.transition_at(i))
            .map(|t| t.id().to_string())
            .collect()
    }

    /// Whether one transition is enabled right now
    pub fn is_enabled(&self, transition_id: &str) -> Result<bool, FireError> {
        is_enabled(&self.network, &self.marking, transition_id)
    }

    /// Statistics for the current state of the run
    pub fn statistics(&self) -> Statistics {
        compute_statistics(
            &self.network,
            &self.event_log,
            &self.marking,
            self.clock.steps(),
            &self.statistics_config,
        )
    }

    /// Marking after the first `k` logged events
    ///
    /// `k == 0` gives the initial marking, `k == log length` the current one.
    pub fn replay_to(&self, k: usize) -> Result<Marking, SimulationError> {
        let records = self.event_log.records();
        if k > records.len() {
            return Err(SimulationError::PrefixOutOfRange {
                requested: k,
                available: records.len(),
            });
        }
        Ok(replay(&self.network, &self.initial_marking, &records[..k])?)
    }

    // ========================================================================
    // Manual firing
    // ========================================================================

    /// Fire a named transition, reporting why it did not fire
    ///
    /// Allowed in every run state. On `Err` the marking and the log are
    /// unchanged; only the step counter may have moved.
    pub fn try_fire(&mut self, transition_id: &str) -> Result<EventRecord, FireError> {
        if self.step_counting == StepCounting::Attempts {
            self.clock.advance_step();
        }

        let index = match self.network.transition_index(transition_id) {
            Some(index) => index,
            None => {
                warn!("fire request for unknown transition {}", transition_id);
                return Err(FireError::UnknownTransition(transition_id.to_string()));
            }
        };

        self.fire_at(index)
    }

    /// Fire a named transition; `true` if it fired
    pub fn fire_transition(&mut self, transition_id: &str) -> bool {
        self.try_fire(transition_id).is_ok()
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Begin (or resume) scheduled firing
    ///
    /// From `Stalled` the simulator only resumes if something is enabled
    /// again; otherwise it stays `Stalled`. Returns the resulting state.
    pub fn start(&mut self) -> RunState {
        let next = match self.run_state {
            RunState::Idle | RunState::Running => RunState::Running,
            RunState::Stalled => {
                if enabled_indices(&self.network, &self.marking).is_empty() {
                    RunState::Stalled
                } else {
                    RunState::Running
                }
            }
        };
        self.transition_to(next);
        self.run_state
    }

    /// Stop scheduled firing at the next tick boundary
    ///
    /// A stalled simulator stays `Stalled`.
    pub fn pause(&mut self) -> RunState {
        if self.run_state == RunState::Running {
            self.transition_to(RunState::Idle);
        }
        self.run_state
    }

    /// One scheduled step; does nothing unless `Running`
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            return TickOutcome::Paused;
        }
        self.select_and_fire()
    }

    /// One policy-driven firing regardless of the run state
    ///
    /// With nothing enabled the simulator enters `Stalled`.
    pub fn step(&mut self) -> TickOutcome {
        self.select_and_fire()
    }

    /// Tick up to `max_ticks` times, stopping early once a tick stalls or
    /// finds the simulator not running
    pub fn run_for(&mut self, max_ticks: usize) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..max_ticks {
            let outcome = self.tick();
            let stop = matches!(outcome, TickOutcome::Stalled | TickOutcome::Paused);
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    /// Back to the initial marking with an empty log, step 0 and `Idle`
    ///
    /// The RNG is reseeded, so a reset simulator repeats its first run.
    pub fn reset(&mut self) {
        self.marking = self.initial_marking.clone();
        self.event_log.clear();
        self.clock.reset();
        self.rng = RngManager::new(self.rng_seed);
        self.run_state = RunState::Idle;
        info!("simulator {} reset", self.run_id);
    }

    // ========================================================================
    // Checkpointing
    // ========================================================================

    /// Capture everything needed to resume this run
    pub fn snapshot(&self) -> Result<SimulationSnapshot, SimulationError> {
        Ok(SimulationSnapshot {
            run_id: self.run_id.to_string(),
            network_hash: compute_network_hash(self.network.definition())?,
            marking: self.marking.clone(),
            event_log: self.event_log.clone(),
            total_steps: self.clock.steps(),
            rng_seed: self.rng_seed,
            rng_state: self.rng.get_state(),
            run_state: self.run_state,
        })
    }

    /// Rebuild a simulator from `config` and a snapshot taken on the same network
    ///
    /// The marking is re-derived by replaying the snapshot's log and must
    /// match the recorded one.
    pub fn restore(
        config: SimulatorConfig,
        snapshot: SimulationSnapshot,
    ) -> Result<Self, SimulationError> {
        let mut simulator = Self::new(config)?;

        let expected = compute_network_hash(simulator.network.definition())?;
        snapshot.validate(&simulator.network, &simulator.initial_marking, &expected)?;

        simulator.run_id = Uuid::parse_str(&snapshot.run_id)
            .map_err(|e| SimulationError::StateValidation(format!("bad run id: {}", e)))?;
        simulator.marking = snapshot.marking;
        simulator.event_log = snapshot.event_log;
        simulator.clock.set_steps(snapshot.total_steps);
        simulator.rng_seed = snapshot.rng_seed;
        simulator.rng = RngManager::from_state(snapshot.rng_state);
        simulator.run_state = snapshot.run_state;

        info!(
            "simulator {} restored at {} events, {} steps, {}",
            simulator.run_id,
            simulator.event_log.len(),
            simulator.clock.steps(),
            simulator.run_state
        );
        Ok(simulator)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn transition_to(&mut self, next: RunState) {
        if self.run_state != next {
            info!("simulator {}: {} -> {}", self.run_id, self.run_state, next);
            self.run_state = next;
        }
    }

    fn select_and_fire(&mut self) -> TickOutcome {
        let enabled = enabled_indices(&self.network, &self.marking);
        let last_fired = self
            .event_log
            .last()
            .and_then(|record| self.network.transition_index(&record.transition_id));

        let ctx = SelectionContext {
            network: &self.network,
            enabled: &enabled,
            last_fired,
        };
        let choice = self
            .policy
            .select(&ctx, &mut self.rng)
            .filter(|index| enabled.contains(index));

        let index = match choice {
            Some(index) => index,
            None => {
                info!("simulator {}: no enabled transitions", self.run_id);
                self.transition_to(RunState::Stalled);
                return TickOutcome::Stalled;
            }
        };

        if self.step_counting == StepCounting::Attempts {
            self.clock.advance_step();
        }

        match self.fire_at(index) {
            Ok(record) => TickOutcome::Fired(record),
            Err(error) => TickOutcome::Rejected {
                transition: self
                    .network
                    .transition_at(index)
                    .map(|t| t.id().to_string())
                    .unwrap_or_default(),
                error,
            },
        }
    }

    /// Shared firing path; the attempt has already been counted
    fn fire_at(&mut self, index: usize) -> Result<EventRecord, FireError> {
        match fire_index(&self.network, &mut self.marking, index) {
            Ok(()) => {
                if self.step_counting == StepCounting::Firings {
                    self.clock.advance_step();
                }
                let id = self
                    .network
                    .transition_at(index)
                    .map(|t| t.id())
                    .unwrap_or_default();
                let record = self.event_log.append(id, self.clock.timestamp()).clone();
                debug!(
                    "step {}: fired {} -> {:?}",
                    record.step,
                    record.transition_id,
                    self.marking.counts()
                );
                Ok(record)
            }
            Err(error) => {
                match &error {
                    FireError::CapacityExceeded { .. } => warn!("{}", error),
                    _ => debug!("{}", error),
                }
                Err(error)
            }
        }
    }
}
