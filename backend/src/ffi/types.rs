//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, lists).

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::models::event::EventRecord;
use crate::models::marking::Marking;
use crate::orchestrator::TickOutcome;
use crate::policy::PolicyConfig;
use crate::stats::Statistics;

fn value_error(msg: String) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(msg)
}

/// Extract a required field from a Python dict
fn extract_required<'py, T: FromPyObject<'py>>(
    dict: &Bound<'py, PyDict>,
    key: &str,
) -> PyResult<T> {
    dict.get_item(key)?
        .ok_or_else(|| value_error(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Parse a policy dict
///
/// ```text
/// {"type": "UniformRandom"}
/// {"type": "RoundRobin"}
/// {"type": "PriorityOrdered", "order": ["T4", "T3"]}
/// ```
pub fn parse_policy_config(dict: &Bound<'_, PyDict>) -> PyResult<PolicyConfig> {
    let policy_type: String = extract_required(dict, "type")?;
    match policy_type.as_str() {
        "UniformRandom" => Ok(PolicyConfig::UniformRandom),
        "RoundRobin" => Ok(PolicyConfig::RoundRobin),
        "PriorityOrdered" => Ok(PolicyConfig::PriorityOrdered {
            order: extract_required(dict, "order")?,
        }),
        other => Err(value_error(format!("Unknown policy type: {}", other))),
    }
}

pub fn event_to_py(py: Python<'_>, record: &EventRecord) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("step", record.step)?;
    dict.set_item("transition_id", &record.transition_id)?;
    dict.set_item("timestamp_ms", record.timestamp_ms)?;
    Ok(dict.unbind())
}

pub fn marking_to_py(py: Python<'_>, marking: &Marking) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    for (place, tokens) in marking.iter() {
        dict.set_item(place, tokens)?;
    }
    Ok(dict.unbind())
}

/// Statistics as a flat dict; `firing_counts` and `place_tokens` are nested dicts
pub fn statistics_to_py(py: Python<'_>, stats: &Statistics) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("total_events", stats.total_events)?;
    dict.set_item("total_steps", stats.total_steps)?;
    dict.set_item("utilization", stats.utilization)?;
    dict.set_item("bottleneck", stats.bottleneck)?;
    dict.set_item("efficiency", stats.efficiency)?;
    dict.set_item("total_tokens", stats.total_tokens)?;

    let counts = PyDict::new(py);
    for (id, count) in &stats.firing_counts {
        counts.set_item(id, count)?;
    }
    dict.set_item("firing_counts", counts)?;

    let places = PyDict::new(py);
    for (id, tokens) in &stats.place_tokens {
        places.set_item(id, tokens)?;
    }
    dict.set_item("place_tokens", places)?;

    Ok(dict.unbind())
}

/// `{"outcome": "fired" | "stalled" | "paused" | "rejected", ...}`
pub fn outcome_to_py(py: Python<'_>, outcome: &TickOutcome) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    match outcome {
        TickOutcome::Fired(record) => {
            dict.set_item("outcome", "fired")?;
            dict.set_item("event", event_to_py(py, record)?)?;
        }
        TickOutcome::Stalled => dict.set_item("outcome", "stalled")?,
        TickOutcome::Paused => dict.set_item("outcome", "paused")?,
        TickOutcome::Rejected { transition, error } => {
            dict.set_item("outcome", "rejected")?;
            dict.set_item("transition_id", transition)?;
            dict.set_item("reason", error.to_string())?;
        }
    }
    Ok(dict.unbind())
}
