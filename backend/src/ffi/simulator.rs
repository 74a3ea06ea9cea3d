//! PyO3 wrapper for Simulator

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{
    event_to_py, marking_to_py, outcome_to_py, parse_policy_config, statistics_to_py,
};
use crate::orchestrator::{Simulator as RustSimulator, SimulatorConfig};
use crate::policy::PolicyConfig;
use crate::presets::{airport_definition, airport_statistics_config, AirportScenario};

fn runtime_error(msg: String) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(msg)
}

/// Python wrapper for the Rust simulator
///
/// # Example (from Python)
///
/// ```python
/// from token_flow_core_rs import Simulator
///
/// sim = Simulator.airport("default", 12345)
/// print(sim.get_enabled_transitions())   # ['T1']
/// sim.fire_transition("T1")
/// sim.start()
/// for _ in range(10):
///     sim.tick()
/// print(sim.get_statistics()["efficiency"])
/// ```
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    inner: RustSimulator,
}

#[pymethods]
impl PySimulator {
    /// Create a simulator from a JSON configuration string
    ///
    /// # Errors
    ///
    /// Raises RuntimeError if the JSON does not parse or the network is invalid.
    #[staticmethod]
    fn from_json(config_json: &str) -> PyResult<Self> {
        let config = SimulatorConfig::from_json(config_json)
            .map_err(|e| runtime_error(format!("Failed to parse config: {}", e)))?;
        let inner = RustSimulator::new(config)
            .map_err(|e| runtime_error(format!("Failed to create simulator: {}", e)))?;
        Ok(PySimulator { inner })
    }

    /// Create the airport simulator
    ///
    /// `scenario` is one of "default", "bottleneck", "high-traffic", "empty";
    /// `policy` is an optional dict like `{"type": "RoundRobin"}`.
    #[staticmethod]
    #[pyo3(signature = (scenario="default", seed=0, policy=None, capacity=None))]
    fn airport(
        scenario: &str,
        seed: u64,
        policy: Option<&Bound<'_, PyDict>>,
        capacity: Option<u64>,
    ) -> PyResult<Self> {
        let scenario: AirportScenario = scenario
            .parse()
            .map_err(|e: String| PyErr::new::<pyo3::exceptions::PyValueError, _>(e))?;
        let policy = match policy {
            Some(dict) => parse_policy_config(dict)?,
            None => PolicyConfig::default(),
        };

        let config = SimulatorConfig::new(airport_definition(scenario, capacity))
            .with_seed(seed)
            .with_policy(policy)
            .with_statistics(airport_statistics_config());
        let inner = RustSimulator::new(config)
            .map_err(|e| runtime_error(format!("Failed to create simulator: {}", e)))?;
        Ok(PySimulator { inner })
    }

    /// Enabled transition ids, declared order
    fn get_enabled_transitions(&self) -> Vec<String> {
        self.inner.enabled_transitions()
    }

    /// Fire a transition; returns False if it was unknown, disabled or over capacity
    fn fire_transition(&mut self, transition_id: &str) -> bool {
        self.inner.fire_transition(transition_id)
    }

    /// Initial marking, empty log, step 0, idle
    fn reset(&mut self) {
        self.inner.reset()
    }

    fn get_statistics(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        statistics_to_py(py, &self.inner.statistics())
    }

    fn start(&mut self) -> String {
        self.inner.start().to_string()
    }

    fn pause(&mut self) -> String {
        self.inner.pause().to_string()
    }

    fn tick(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        outcome_to_py(py, &self.inner.tick())
    }

    fn step(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        outcome_to_py(py, &self.inner.step())
    }

    fn run_state(&self) -> String {
        self.inner.run_state().to_string()
    }

    fn get_marking(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        marking_to_py(py, self.inner.marking())
    }

    /// Up to `n` most recent events, newest first
    #[pyo3(signature = (n=10))]
    fn get_recent_events(&self, py: Python<'_>, n: usize) -> PyResult<Vec<Py<PyDict>>> {
        self.inner
            .recent_events(n)
            .into_iter()
            .map(|record| event_to_py(py, record))
            .collect()
    }

    /// Snapshot as a JSON string
    fn save_state(&self) -> PyResult<String> {
        self.inner
            .snapshot()
            .and_then(|snapshot| snapshot.to_json())
            .map_err(|e| runtime_error(format!("Failed to save state: {}", e)))
    }
}
