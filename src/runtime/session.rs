//! Session runner: validate, start matching, feed the roster, wait, report.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builders::build_engine;
use crate::config::SessionConfig;
use crate::core::{
    ChannelEventSink, CompositeEventSink, Group, MatchError, MatchEvent, Matchmaker, PlayerId,
    Role, Spawn, StatsSnapshot, TracingEventSink,
};

/// Outcome of one matchmaking session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Configuration the session ran with.
    pub config: SessionConfig,
    /// Final counters.
    pub stats: StatsSnapshot,
    /// Every group formed, in id order.
    pub groups: Vec<Group>,
    /// Lifecycle events in the order they were recorded.
    pub events: Vec<MatchEvent>,
    /// True when the deadline passed before every possible party finished.
    pub timed_out: bool,
}

/// Enqueue `1..=count` for each role: all tanks, then healers, then DPS.
pub fn feed_roster<S>(engine: &Matchmaker<S>, cfg: &SessionConfig)
where
    S: Spawn + Clone + Send + 'static,
{
    for role in Role::ALL {
        let count: PlayerId = match role {
            Role::Tank => cfg.tanks,
            Role::Healer => cfg.healers,
            Role::Dps => cfg.dps,
        };
        engine.enqueue_many(role, 1..=count);
        tracing::debug!("queued {} {} player(s)", count, role);
    }
}

/// Log configuration warnings that do not stop the session.
pub fn log_warnings(cfg: &SessionConfig) {
    if let Some(warning) = cfg.instance_warning() {
        tracing::warn!("{}", warning);
    }
    if let Some(warning) = cfg.imbalance_warning() {
        tracing::warn!("{}", warning);
    }
}

/// Run one session to completion or to its deadline.
///
/// Impossible rosters are rejected before the matcher starts. The session
/// waits until every possible party has cleared or [`SessionConfig::deadline`]
/// elapses, then stops the matcher, gives in-flight parties up to
/// `grace_secs` to finish and reports.
pub async fn run_session<S>(cfg: SessionConfig, spawner: S) -> Result<SessionReport, MatchError>
where
    S: Spawn + Clone + Send + 'static,
{
    let run_id = Uuid::new_v4();
    cfg.validate()?;
    log_warnings(&cfg);

    let (tx, rx) = crossbeam_channel::unbounded();
    let engine = build_engine(&cfg, spawner)?.with_event_sink(
        CompositeEventSink::new()
            .with(TracingEventSink)
            .with(ChannelEventSink::new(tx)),
    );
    tracing::info!(%run_id, "initializing matchmaking session");

    let matcher = engine.start_matching()?;
    feed_roster(&engine, &cfg);

    let expected = cfg.possible_parties();
    let timed_out = tokio::time::timeout(cfg.deadline(), engine.served(expected))
        .await
        .is_err();
    if timed_out {
        tracing::warn!(
            %run_id,
            "deadline of {:?} passed with {} of {} parties served",
            cfg.deadline(),
            engine.snapshot().parties_served,
            expected
        );
    }

    engine.shutdown();
    tokio::task::spawn_blocking(move || matcher.join())
        .await
        .map_err(|e| MatchError::Matcher(e.to_string()))??;

    // Parties already in an instance get the grace period to finish
    let grace = Duration::from_secs(cfg.grace_secs);
    if tokio::time::timeout(grace, engine.drain()).await.is_err() {
        tracing::warn!(
            %run_id,
            "{} party(ies) still clearing after {:?} grace",
            engine.snapshot().in_flight,
            grace
        );
    }

    let stats = engine.snapshot();
    let groups = engine.group_log();
    let events = rx.try_iter().collect();
    tracing::info!(
        %run_id,
        parties = stats.parties_served,
        total = stats.total_service_units,
        "session finished"
    );
    Ok(SessionReport {
        run_id,
        config: cfg,
        stats,
        groups,
        events,
        timed_out,
    })
}
