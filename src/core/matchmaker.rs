//! The matchmaking engine: one lock, one condition variable, one matcher loop.
//!
//! All shared state (role queues, instance slots, counters, group log) lives in
//! a single [`CoreState`] behind a `parking_lot::Mutex`. The matcher thread
//! parks on a `parking_lot::Condvar` until [`match_ready`] holds, then forms a
//! group and reserves its slot in the same critical section. Every mutation
//! that can make the predicate true (enqueue, slot release, shutdown) notifies
//! all waiters, and the matcher re-checks the predicate after every wake.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use super::duration::DurationSource;
use super::error::MatchError;
use super::events::{EventSink, MatchEvent, TracingEventSink};
use super::instance_pool::{InstancePool, SlotStatus};
use super::role_queue::{PlayerId, Role, RoleQueues, DPS_PER_GROUP};
use super::stats::{ServiceStats, StatsSnapshot};
use super::worker::{run_worker, Spawn};

/// Group identifier, 1-based and strictly increasing.
pub type GroupId = u64;

/// A formed party bound to an instance slot. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Tank id.
    pub tank: PlayerId,
    /// Healer id.
    pub healer: PlayerId,
    /// DPS ids in arrival order.
    pub dps: [PlayerId; DPS_PER_GROUP],
    /// Zero-based instance index.
    pub instance: usize,
}

/// Limits the engine is initialized with.
#[derive(Debug, Clone)]
pub struct EngineLimits {
    /// Number of instance slots.
    pub max_instances: usize,
    /// Shortest clear, in time units.
    pub min_time: u64,
    /// Longest clear, in time units.
    pub max_time: u64,
    /// Wall-clock length of one time unit.
    pub time_unit: Duration,
}

impl EngineLimits {
    /// Check pool size and duration range.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_instances == 0 {
            return Err(MatchError::InvalidConfig(
                "max_instances must be greater than 0".into(),
            ));
        }
        if self.min_time == 0 {
            return Err(MatchError::InvalidConfig(
                "min_time must be greater than 0".into(),
            ));
        }
        if self.max_time < self.min_time {
            return Err(MatchError::InvalidConfig(
                "max_time must be greater than or equal to min_time".into(),
            ));
        }
        Ok(())
    }

    /// Wall-clock time for a clear of `units` time units.
    pub fn clear_time(&self, units: u64) -> Duration {
        let units = u32::try_from(units).unwrap_or(u32::MAX);
        self.time_unit.checked_mul(units).unwrap_or(Duration::MAX)
    }
}

/// The compound matching predicate: a full party is waiting and a slot is free.
///
/// Pure function of the current state; the matcher only forms a group when
/// this returns `true` under the lock.
pub fn match_ready(queues: &RoleQueues, pool: &InstancePool) -> bool {
    queues.peek_all_ready() && pool.has_free()
}

/// A group handed to its worker, with the clear time drawn for it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dispatch {
    pub group: Group,
    pub duration: u64,
}

/// Everything guarded by the coordination lock.
pub(crate) struct CoreState {
    queues: RoleQueues,
    pool: InstancePool,
    stats: ServiceStats,
    log: Vec<Group>,
    next_group_id: GroupId,
    in_flight: usize,
    shutdown: bool,
    durations: Box<dyn DurationSource>,
    events: Box<dyn EventSink>,
}

impl CoreState {
    /// Form one group if the predicate holds. Reserves before popping so a
    /// failed reservation never strands popped players.
    fn form_group(&mut self, limits: &EngineLimits) -> Option<Dispatch> {
        if !match_ready(&self.queues, &self.pool) {
            return None;
        }
        let instance = self.pool.try_reserve()?;
        let Some(party) = self.queues.pop_group() else {
            if let Err(e) = self.pool.abandon(instance) {
                tracing::error!("failed to return unused reservation: {}", e);
            }
            return None;
        };

        let group = Group {
            id: self.next_group_id,
            tank: party.tank,
            healer: party.healer,
            dps: party.dps,
            instance,
        };
        self.next_group_id += 1;
        self.log.push(group);
        self.in_flight += 1;
        let duration = self.durations.draw(limits.min_time, limits.max_time);
        tracing::debug!(
            "formed party {} on instance {} (clear {} units)",
            group.id,
            instance + 1,
            duration
        );
        Some(Dispatch { group, duration })
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            parties_served: self.stats.parties_served,
            total_service_units: self.stats.total_service_units,
            per_instance_served: self.pool.served_counts(),
            groups_formed: self.next_group_id - 1,
            in_flight: self.in_flight,
            waiting: self.queues.waiting(),
        }
    }
}

/// State shared between the engine handle, the matcher thread and workers.
pub(crate) struct Shared {
    state: Mutex<CoreState>,
    /// Signaled on every enqueue, slot release and shutdown.
    wake: Condvar,
    /// Async counterpart of `wake` for completions.
    progress: Notify,
    limits: EngineLimits,
}

impl Shared {
    pub(crate) const fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    fn lock(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock()
    }

    /// Worker step 1: reserved -> active, announce the group.
    pub(crate) fn activate(&self, dispatch: &Dispatch) {
        let mut state = self.lock();
        if let Err(e) = state.pool.activate(dispatch.group.instance) {
            tracing::error!("party {} failed to activate: {}", dispatch.group.id, e);
        }
        state.events.record(MatchEvent::activated(&dispatch.group));
    }

    /// Worker step 3: release the slot, count the party, wake waiters.
    pub(crate) fn complete(&self, dispatch: &Dispatch) {
        let mut state = self.lock();
        if let Err(e) = state.pool.release(dispatch.group.instance) {
            tracing::error!("party {} failed to release: {}", dispatch.group.id, e);
        }
        state.stats.record_completion(dispatch.duration);
        state.in_flight -= 1;
        state.events.record(MatchEvent::GroupCompleted {
            group_id: dispatch.group.id,
            instance: dispatch.group.instance,
            duration: dispatch.duration,
        });
        drop(state);
        self.notify();
    }

    /// Worker torn down before finishing: free the slot without counting it.
    pub(crate) fn abandon(&self, dispatch: &Dispatch) {
        let mut state = self.lock();
        if let Err(e) = state.pool.abandon(dispatch.group.instance) {
            tracing::error!("party {} failed to abandon: {}", dispatch.group.id, e);
        }
        state.in_flight -= 1;
        drop(state);
        tracing::warn!(
            "party {} abandoned instance {}",
            dispatch.group.id,
            dispatch.group.instance + 1
        );
        self.notify();
    }

    fn notify(&self) {
        self.wake.notify_all();
        self.progress.notify_waiters();
    }

    /// Async wait until `done` holds for the current state.
    async fn wait_async(&self, done: impl Fn(&CoreState) -> bool) {
        loop {
            let notified = self.progress.notified();
            tokio::pin!(notified);
            // Register before checking so a completion in between is not lost
            notified.as_mut().enable();
            if self.check(&done) {
                return;
            }
            notified.await;
        }
    }

    fn check(&self, done: &impl Fn(&CoreState) -> bool) -> bool {
        done(&*self.lock())
    }

    /// Blocking wait until `done` holds, or `timeout` elapses.
    fn wait_blocking(&self, timeout: Duration, done: impl Fn(&CoreState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while !done(&*state) {
            if self.wake.wait_until(&mut state, deadline).timed_out() {
                return done(&*state);
            }
        }
        true
    }
}

/// The matchmaking engine.
///
/// Owns all queue, slot and counter state behind one lock and exposes only the
/// operations below. Workers are spawned through `S`, which is called from the
/// matcher thread and so must not rely on an ambient runtime context.
pub struct Matchmaker<S> {
    shared: Arc<Shared>,
    spawner: S,
    started: AtomicBool,
}

impl<S> Matchmaker<S>
where
    S: Spawn + Clone + Send + 'static,
{
    /// Set pool size and duration range. Call once, before any enqueue.
    pub fn initialize(
        limits: EngineLimits,
        durations: impl DurationSource,
        spawner: S,
    ) -> Result<Self, MatchError> {
        limits.validate()?;
        let state = CoreState {
            queues: RoleQueues::new(),
            pool: InstancePool::new(limits.max_instances),
            stats: ServiceStats::default(),
            log: Vec::new(),
            next_group_id: 1,
            in_flight: 0,
            shutdown: false,
            durations: Box::new(durations),
            events: Box::new(TracingEventSink),
        };
        tracing::info!(
            "matchmaker initialized: {} instance(s), clear time {}..={} units",
            limits.max_instances,
            limits.min_time,
            limits.max_time
        );
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                wake: Condvar::new(),
                progress: Notify::new(),
                limits,
            }),
            spawner,
            started: AtomicBool::new(false),
        })
    }

    /// Replace the event sink (tracing by default).
    #[must_use]
    pub fn with_event_sink(self, sink: impl EventSink + 'static) -> Self {
        self.shared.lock().events = Box::new(sink);
        self
    }

    /// Add a player to the tail of its role queue and wake the matcher.
    pub fn enqueue(&self, role: Role, id: PlayerId) {
        self.shared.lock().queues.enqueue(role, id);
        self.shared.wake.notify_all();
    }

    /// Add several players of one role, in order, with a single wake.
    pub fn enqueue_many(&self, role: Role, ids: impl IntoIterator<Item = PlayerId>) {
        {
            let mut state = self.shared.lock();
            for id in ids {
                state.queues.enqueue(role, id);
            }
        }
        self.shared.wake.notify_all();
    }

    /// Start the matcher loop on its own thread. Returns immediately.
    pub fn start_matching(&self) -> Result<MatcherHandle, MatchError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(MatchError::AlreadyStarted);
        }
        let shared = Arc::clone(&self.shared);
        let spawner = self.spawner.clone();
        let handle = thread::Builder::new()
            .name("lfg-matcher".into())
            .spawn(move || run_matcher(&shared, &spawner))
            .map_err(|e| {
                self.started.store(false, Ordering::Release);
                MatchError::Matcher(format!("failed to spawn matcher thread: {e}"))
            })?;
        Ok(MatcherHandle {
            handle,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Wake the matcher and have it exit without forming further groups.
    ///
    /// Workers already dispatched still run to completion.
    pub fn shutdown(&self) {
        signal_shutdown(&self.shared);
    }

    /// Consistent read of the aggregate counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.shared.lock().snapshot()
    }

    /// Every group formed so far, in id order.
    pub fn group_log(&self) -> Vec<Group> {
        self.shared.lock().log.clone()
    }

    /// Current status of each instance slot.
    pub fn instance_statuses(&self) -> Vec<SlotStatus> {
        self.shared.lock().pool.statuses()
    }

    /// Evaluate [`match_ready`] against the current state.
    pub fn is_match_ready(&self) -> bool {
        let state = self.shared.lock();
        match_ready(&state.queues, &state.pool)
    }

    /// Limits the engine was initialized with.
    pub fn limits(&self) -> &EngineLimits {
        self.shared.limits()
    }

    /// Block until no worker is in flight. Returns `false` on timeout.
    ///
    /// Must not be called from a single-threaded runtime that also drives the
    /// workers.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.shared.wait_blocking(timeout, |s| s.in_flight == 0)
    }

    /// Block until at least `parties` groups have completed. Returns `false`
    /// on timeout.
    pub fn wait_for_parties(&self, parties: u64, timeout: Duration) -> bool {
        self.shared
            .wait_blocking(timeout, |s| s.stats.parties_served >= parties)
    }

    /// Wait until no worker is in flight.
    pub async fn drain(&self) {
        self.shared.wait_async(|s| s.in_flight == 0).await;
    }

    /// Wait until at least `parties` groups have completed.
    pub async fn served(&self, parties: u64) {
        self.shared
            .wait_async(|s| s.stats.parties_served >= parties)
            .await;
    }
}

impl<S> Drop for Matchmaker<S> {
    fn drop(&mut self) {
        signal_shutdown(&self.shared);
    }
}

fn signal_shutdown(shared: &Shared) {
    shared.lock().shutdown = true;
    shared.wake.notify_all();
}

/// Handle to the running matcher thread.
pub struct MatcherHandle {
    handle: JoinHandle<()>,
    shared: Arc<Shared>,
}

impl MatcherHandle {
    /// Signal shutdown and wait for the matcher thread to exit.
    pub fn stop(self) -> Result<(), MatchError> {
        signal_shutdown(&self.shared);
        self.join()
    }

    /// Wait for the matcher thread to exit. Only returns after shutdown.
    pub fn join(self) -> Result<(), MatchError> {
        self.handle
            .join()
            .map_err(|_| MatchError::Matcher("matcher thread panicked".into()))
    }

    /// True once the matcher thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// The matcher loop. Parks on the condvar until a group can form, dispatches
/// it with the lock released, and loops.
fn run_matcher<S: Spawn>(shared: &Arc<Shared>, spawner: &S) {
    tracing::info!("matcher started");
    loop {
        let dispatch = {
            let mut state = shared.lock();
            loop {
                if state.shutdown {
                    tracing::info!("matcher shutting down");
                    return;
                }
                if let Some(dispatch) = state.form_group(&shared.limits) {
                    break dispatch;
                }
                shared.wake.wait(&mut state);
                tracing::trace!("matcher woke");
            }
        };
        spawner.spawn(run_worker(Arc::clone(shared), dispatch));
    }
}
