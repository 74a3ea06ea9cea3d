//! Statistics Aggregator
//!
//! Derived metrics over a run, recomputed on demand from the network, the
//! event log, the current marking and the attempt counter. Nothing here is
//! cached and nothing here can fail: degenerate inputs (no events, no steps,
//! no designated transition) produce zeros.
//!
//! # Metrics
//!
//! - **firing_counts**: histogram over the log, one entry per declared
//!   transition (zeros included), in declared order
//! - **utilization**: share of events that fired the designated transition,
//!   as a fraction in `[0, 1]`
//! - **bottleneck**: predicate over the current marking only
//! - **efficiency**: `total_events / total_steps * 100`

use crate::models::event::EventLog;
use crate::models::marking::Marking;
use crate::models::network::Network;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// "queue place holds more than `threshold` tokens while downstream is empty"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleneckRule {
    pub queue_place: String,
    pub threshold: u64,
    pub downstream_place: String,
}

impl BottleneckRule {
    /// Evaluate against a marking; unknown places read as zero tokens
    pub fn holds(&self, marking: &Marking) -> bool {
        let queued = marking.get(&self.queue_place).unwrap_or(0);
        let downstream = marking.get(&self.downstream_place).unwrap_or(0);
        queued > self.threshold && downstream == 0
    }
}

/// Which transition and places the derived metrics refer to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Transition whose share of events is reported as utilization
    pub utilization_transition: Option<String>,

    /// Bottleneck predicate; without one the flag is always false
    pub bottleneck: Option<BottleneckRule>,
}

impl StatisticsConfig {
    /// Names of places and transitions that `network` lacks
    pub(crate) fn unknown_references(&self, network: &Network) -> Vec<String> {
        let mut unknown = Vec::new();
        if let Some(id) = &self.utilization_transition {
            if !network.has_transition(id) {
                unknown.push(format!("transition {}", id));
            }
        }
        if let Some(rule) = &self.bottleneck {
            for place in [&rule.queue_place, &rule.downstream_place] {
                if network.place(place).is_none() {
                    unknown.push(format!("place {}", place));
                }
            }
        }
        unknown
    }
}

/// Point-in-time statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Successful firings in the log
    pub total_events: usize,

    /// Attempt counter at the time of the snapshot
    pub total_steps: u64,

    /// Firings per transition, declared order
    pub firing_counts: IndexMap<String, usize>,

    /// Fraction of events that fired the designated transition
    pub utilization: f64,

    pub bottleneck: bool,

    /// Percent of steps that produced a firing
    pub efficiency: f64,

    /// Current tokens per place, declared order
    pub place_tokens: IndexMap<String, u64>,

    pub total_tokens: u64,
}

/// Compute statistics for the current state of a run
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::presets::{airport_network, airport_statistics_config};
/// use token_flow_core_rs::stats::compute_statistics;
/// use token_flow_core_rs::{EventLog, Marking};
///
/// let network = airport_network().unwrap();
/// let marking = Marking::initial(&network);
/// let stats = compute_statistics(
///     &network,
///     &EventLog::new(),
///     &marking,
///     0,
///     &airport_statistics_config(),
/// );
///
/// assert_eq!(stats.total_events, 0);
/// assert_eq!(stats.utilization, 0.0);
/// assert_eq!(stats.efficiency, 0.0);
/// assert_eq!(stats.total_tokens, 4);
/// ```
pub fn compute_statistics(
    network: &Network,
    log: &EventLog,
    marking: &Marking,
    total_steps: u64,
    config: &StatisticsConfig,
) -> Statistics {
    let mut firing_counts: IndexMap<String, usize> = network
        .transitions()
        .map(|t| (t.id().to_string(), 0))
        .collect();
    for record in log.records() {
        *firing_counts
            .entry(record.transition_id.clone())
            .or_insert(0) += 1;
    }

    let total_events = log.len();

    let utilization = match &config.utilization_transition {
        Some(id) if total_events > 0 => {
            firing_counts.get(id).copied().unwrap_or(0) as f64 / total_events as f64
        }
        _ => 0.0,
    };

    let efficiency = if total_steps == 0 {
        0.0
    } else {
        total_events as f64 / total_steps as f64 * 100.0
    };

    let bottleneck = config
        .bottleneck
        .as_ref()
        .map(|rule| rule.holds(marking))
        .unwrap_or(false);

    let place_tokens = marking
        .iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();

    Statistics {
        total_events,
        total_steps,
        firing_counts,
        utilization,
        bottleneck,
        efficiency,
        place_tokens,
        total_tokens: marking.total_tokens(),
    }
}
