//! Group lifecycle events and the sinks that observe them.
//!
//! Events are recorded while the engine lock is held, so a sink sees them in
//! the same order as the slot transitions they describe.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use super::matchmaker::{Group, GroupId};
use super::role_queue::{PlayerId, DPS_PER_GROUP};

/// Observable group lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Worker took its slot from reserved to active.
    GroupActivated {
        /// Group identifier.
        group_id: GroupId,
        /// Zero-based instance index.
        instance: usize,
        /// Tank id.
        tank: PlayerId,
        /// Healer id.
        healer: PlayerId,
        /// DPS ids.
        dps: [PlayerId; DPS_PER_GROUP],
    },
    /// Worker finished and released its slot.
    GroupCompleted {
        /// Group identifier.
        group_id: GroupId,
        /// Zero-based instance index.
        instance: usize,
        /// Clear duration in time units.
        duration: u64,
    },
}

impl MatchEvent {
    /// Build the activation event for a group.
    pub const fn activated(group: &Group) -> Self {
        Self::GroupActivated {
            group_id: group.id,
            instance: group.instance,
            tank: group.tank,
            healer: group.healer,
            dps: group.dps,
        }
    }

    /// Group this event belongs to.
    pub const fn group_id(&self) -> GroupId {
        match self {
            Self::GroupActivated { group_id, .. } | Self::GroupCompleted { group_id, .. } => {
                *group_id
            }
        }
    }
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event. Called with the engine lock held; must not block.
    fn record(&mut self, event: MatchEvent);
}

/// Logs each event through `tracing`, one line per lifecycle step.
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&mut self, event: MatchEvent) {
        match event {
            MatchEvent::GroupActivated {
                group_id,
                instance,
                tank,
                healer,
                dps,
            } => tracing::info!(
                instance = instance + 1,
                party = group_id,
                tank,
                healer,
                dps = ?dps,
                "serving party -> ACTIVE"
            ),
            MatchEvent::GroupCompleted {
                group_id,
                instance,
                duration,
            } => tracing::info!(
                instance = instance + 1,
                party = group_id,
                duration,
                "finished party -> EMPTY"
            ),
        }
    }
}

/// Forwards events to a crossbeam channel for live consumers.
///
/// A disconnected receiver is ignored; events are then dropped.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<MatchEvent>,
}

impl ChannelEventSink {
    /// Wrap a channel sender.
    pub const fn new(tx: Sender<MatchEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn record(&mut self, event: MatchEvent) {
        if self.tx.try_send(event).is_err() {
            tracing::debug!("event receiver gone or full, dropping event");
        }
    }
}

/// Fans one event out to several sinks.
#[derive(Default)]
pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl CompositeEventSink {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    #[must_use]
    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl EventSink for CompositeEventSink {
    fn record(&mut self, event: MatchEvent) {
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest {
                sink.record(event.clone());
            }
            last.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(group_id: GroupId) -> MatchEvent {
        MatchEvent::GroupCompleted {
            group_id,
            instance: 0,
            duration: 1,
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let (tx_a, rx_a) = crossbeam_channel::unbounded();
        let (tx_b, rx_b) = crossbeam_channel::unbounded();
        let mut sink = CompositeEventSink::new()
            .with(ChannelEventSink::new(tx_a))
            .with(ChannelEventSink::new(tx_b));
        sink.record(completed(3));
        assert_eq!(rx_a.try_recv().unwrap().group_id(), 3);
        assert_eq!(rx_b.try_recv().unwrap().group_id(), 3);
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink = ChannelEventSink::new(tx);
        sink.record(completed(7));
        assert_eq!(rx.try_recv().unwrap(), completed(7));

        drop(rx);
        // Must not panic once the receiver is gone
        sink.record(completed(8));
    }

    #[test]
    fn test_event_serializes_tagged() {
        let json = serde_json::to_value(completed(4)).unwrap();
        assert_eq!(json["event"], "group_completed");
        assert_eq!(json["group_id"], 4);
    }
}
