//! Event logging for replay and auditing.
//!
//! Every successful firing appends one [`EventRecord`]. The log enables:
//! - Deterministic replay (re-apply the records to the initial marking)
//! - Statistics (firing histograms, utilization, efficiency)
//! - Auditing (which transition fired at which step, and when)
//!
//! The log is append-only. Records are never reordered or removed; the only
//! way to shrink a log is a full simulator reset, which starts a new log.
//!
//! # Example
//!
//! ```rust
//! use token_flow_core_rs::EventLog;
//!
//! let log = EventLog::new();
//! assert!(log.is_empty());
//! assert_eq!(log.recent(10).count(), 0);
//! ```

use serde::{Deserialize, Serialize};

/// One fired transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 1
    pub step: u64,

    /// Transition that fired
    pub transition_id: String,

    /// Wall-clock time of the firing, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// Append-only ordered sequence of [`EventRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Rebuild a log from stored records
    ///
    /// Fails with the offending position when steps are not exactly `1..=n`.
    pub(crate) fn from_records(records: Vec<EventRecord>) -> Result<Self, usize> {
        for (position, record) in records.iter().enumerate() {
            if record.step != position as u64 + 1 {
                return Err(position);
            }
        }
        Ok(Self { records })
    }

    /// Append a record for a firing and return it
    pub(crate) fn append(&mut self, transition_id: &str, timestamp_ms: u64) -> &EventRecord {
        let step = self.records.len() as u64 + 1;
        self.records.push(EventRecord {
            step,
            transition_id: transition_id.to_string(),
            timestamp_ms,
        });
        &self.records[self.records.len() - 1]
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest first
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Most recent record
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Up to `n` most recent records, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().rev().take(n)
    }

    /// Records for one transition, oldest first
    pub fn records_for<'a>(
        &'a self,
        transition_id: &'a str,
    ) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.transition_id == transition_id)
    }

    /// How many times a transition fired
    pub fn count_for(&self, transition_id: &str) -> usize {
        self.records_for(transition_id).count()
    }

    /// Start over with no records (simulator reset only)
    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(ids: &[&str]) -> EventLog {
        let mut log = EventLog::new();
        for (i, id) in ids.iter().enumerate() {
            log.append(id, 1_000 + i as u64);
        }
        log
    }

    #[test]
    fn test_steps_start_at_one_and_increase() {
        let log = log_of(&["T1", "T2", "T1"]);
        let steps: Vec<u64> = log.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn test_append_returns_new_record() {
        let mut log = EventLog::new();
        let record = log.append("T4", 55).clone();
        assert_eq!(record.step, 1);
        assert_eq!(record.transition_id, "T4");
        assert_eq!(record.timestamp_ms, 55);
        assert_eq!(log.last(), Some(&record));
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let log = log_of(&["T1", "T2", "T3", "T4"]);
        let recent: Vec<&str> = log.recent(2).map(|r| r.transition_id.as_str()).collect();
        assert_eq!(recent, vec!["T4", "T3"]);
        assert_eq!(log.recent(10).count(), 4);
    }

    #[test]
    fn test_count_for_transition() {
        let log = log_of(&["T1", "T2", "T1"]);
        assert_eq!(log.count_for("T1"), 2);
        assert_eq!(log.count_for("T2"), 1);
        assert_eq!(log.count_for("T9"), 0);
    }

    #[test]
    fn test_from_records_rejects_gap() {
        let mut records = log_of(&["T1", "T2"]).records().to_vec();
        records[1].step = 3;
        assert_eq!(EventLog::from_records(records), Err(1));
    }

    #[test]
    fn test_clear() {
        let mut log = log_of(&["T1"]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.append("T2", 0).step, 1);
    }
}
