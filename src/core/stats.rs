//! Aggregate service counters and their snapshot form.

use serde::{Deserialize, Serialize};

use super::role_queue::WaitingCounts;

/// Counters advanced by workers on completion. Guarded by the engine lock.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Parties whose dungeon clear completed.
    pub parties_served: u64,
    /// Sum of drawn clear durations, in time units.
    pub total_service_units: u64,
}

impl ServiceStats {
    /// Record one finished party.
    pub fn record_completion(&mut self, duration_units: u64) {
        self.parties_served += 1;
        self.total_service_units += duration_units;
    }
}

/// Consistent read of engine state, taken under the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Parties whose dungeon clear completed.
    pub parties_served: u64,
    /// Sum of clear durations, in time units (seconds by default).
    pub total_service_units: u64,
    /// Parties served per instance, by index.
    pub per_instance_served: Vec<u64>,
    /// Groups the matcher has formed.
    pub groups_formed: u64,
    /// Workers still running.
    pub in_flight: usize,
    /// Players still waiting per role.
    pub waiting: WaitingCounts,
}

impl StatsSnapshot {
    /// Mean clear duration, or `None` before the first completion.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_service_units(&self) -> Option<f64> {
        (self.parties_served > 0)
            .then(|| self.total_service_units as f64 / self.parties_served as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completion() {
        let mut stats = ServiceStats::default();
        stats.record_completion(3);
        stats.record_completion(5);
        assert_eq!(stats.parties_served, 2);
        assert_eq!(stats.total_service_units, 8);
    }

    #[test]
    fn test_mean_service_units() {
        let mut snapshot = StatsSnapshot {
            parties_served: 0,
            total_service_units: 0,
            per_instance_served: vec![0],
            groups_formed: 0,
            in_flight: 0,
            waiting: WaitingCounts::default(),
        };
        assert!(snapshot.mean_service_units().is_none());
        snapshot.parties_served = 2;
        snapshot.total_service_units = 5;
        assert_eq!(snapshot.mean_service_units(), Some(2.5));
    }
}
