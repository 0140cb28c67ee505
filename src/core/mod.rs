//! Core matchmaking engine: role queues, instance slots, matcher and workers.

pub mod duration;
pub mod error;
pub mod events;
pub mod instance_pool;
pub mod matchmaker;
pub mod role_queue;
pub mod stats;
pub mod worker;

pub use duration::{DurationSource, FixedDuration, ScriptedDuration, UniformDuration};
pub use error::{AppResult, MatchError, SlotStatusLabel};
pub use events::{ChannelEventSink, CompositeEventSink, EventSink, MatchEvent, TracingEventSink};
pub use instance_pool::{InstancePool, InstanceSlot, SlotStatus};
pub use matchmaker::{match_ready, EngineLimits, Group, GroupId, MatcherHandle, Matchmaker};
pub use role_queue::{Party, PlayerId, Role, RoleQueues, WaitingCounts, DPS_PER_GROUP, PARTY_SIZE};
pub use stats::{ServiceStats, StatsSnapshot};
pub use worker::Spawn;
