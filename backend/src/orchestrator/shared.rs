//! Shared simulator handle
//!
//! The simulator itself is single-threaded. Callers that need to reach one
//! run from several threads (a UI timer plus user clicks, for instance) share
//! a [`SharedSimulator`]: every operation takes the one lock, so the marking,
//! the log and the step counter are always observed and changed together.

use crate::firing::FireError;
use crate::models::event::EventRecord;
use crate::models::marking::Marking;
use crate::orchestrator::checkpoint::SimulationSnapshot;
use crate::orchestrator::engine::{RunState, SimulationError, Simulator, TickOutcome};
use crate::stats::Statistics;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, thread-safe handle to one [`Simulator`]
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use token_flow_core_rs::orchestrator::{SharedSimulator, Simulator, SimulatorConfig};
/// use token_flow_core_rs::presets::{airport_definition, AirportScenario};
///
/// let config = SimulatorConfig::new(airport_definition(AirportScenario::Default, None));
/// let shared = SharedSimulator::new(Simulator::new(config).unwrap());
///
/// let worker = shared.clone();
/// thread::spawn(move || {
///     worker.fire_transition("T1");
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared.statistics().total_events, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SharedSimulator {
    inner: Arc<Mutex<Simulator>>,
}

impl SharedSimulator {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulator)),
        }
    }

    /// Lock the simulator
    ///
    /// A panic while holding the lock cannot leave a half-applied firing
    /// behind (firing commits all at once), so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, Simulator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulator) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn enabled_transitions(&self) -> Vec<String> {
        self.lock().enabled_transitions()
    }

    pub fn fire_transition(&self, transition_id: &str) -> bool {
        self.lock().fire_transition(transition_id)
    }

    pub fn try_fire(&self, transition_id: &str) -> Result<EventRecord, FireError> {
        self.lock().try_fire(transition_id)
    }

    pub fn start(&self) -> RunState {
        self.lock().start()
    }

    pub fn pause(&self) -> RunState {
        self.lock().pause()
    }

    pub fn tick(&self) -> TickOutcome {
        self.lock().tick()
    }

    pub fn step(&self) -> TickOutcome {
        self.lock().step()
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    pub fn statistics(&self) -> Statistics {
        self.lock().statistics()
    }

    pub fn marking(&self) -> Marking {
        self.lock().marking().clone()
    }

    pub fn run_state(&self) -> RunState {
        self.lock().run_state()
    }

    pub fn snapshot(&self) -> Result<SimulationSnapshot, SimulationError> {
        self.lock().snapshot()
    }
}
