//! Session configuration: pool size, roster and clear-time range.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{EngineLimits, MatchError, DPS_PER_GROUP};

/// Instance count above which a slowdown warning is issued.
pub const INSTANCE_WARNING_THRESHOLD: usize = 100;

/// DPS-to-(tank+healer) ratio above which many DPS will go unmatched.
pub const DPS_IMBALANCE_RATIO: u32 = 5;

const fn default_time_unit_ms() -> u64 {
    1000
}

const fn default_grace_secs() -> u64 {
    5
}

/// Full configuration for one matchmaking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrent dungeon instances.
    pub max_instances: usize,
    /// Tank players to enqueue.
    pub tanks: u32,
    /// Healer players to enqueue.
    pub healers: u32,
    /// DPS players to enqueue.
    pub dps: u32,
    /// Minimum clear time, in time units.
    pub min_time: u64,
    /// Maximum clear time, in time units.
    pub max_time: u64,
    /// Milliseconds per time unit.
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,
    /// Seed for reproducible clear times.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Extra seconds allowed past the expected finish before giving up.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
    /// Fixed session deadline in milliseconds, replacing the computed one.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl SessionConfig {
    /// Configuration with default time unit, no seed and default grace.
    pub const fn new(
        max_instances: usize,
        tanks: u32,
        healers: u32,
        dps: u32,
        min_time: u64,
        max_time: u64,
    ) -> Self {
        Self {
            max_instances,
            tanks,
            healers,
            dps,
            min_time,
            max_time,
            time_unit_ms: default_time_unit_ms(),
            seed: None,
            grace_secs: default_grace_secs(),
            deadline_ms: None,
        }
    }

    /// Override the time unit.
    #[must_use]
    pub const fn with_time_unit_ms(mut self, time_unit_ms: u64) -> Self {
        self.time_unit_ms = time_unit_ms;
        self
    }

    /// Fix the clear-time seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the grace period.
    #[must_use]
    pub const fn with_grace_secs(mut self, grace_secs: u64) -> Self {
        self.grace_secs = grace_secs;
        self
    }

    /// Cap the session at a fixed deadline.
    #[must_use]
    pub const fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Validate every field and reject rosters that can never form a party.
    pub fn validate(&self) -> Result<(), MatchError> {
        self.validate_instances()?;
        self.validate_roster()?;
        self.validate_times()?;
        if self.time_unit_ms == 0 {
            return Err(invalid("time_unit_ms must be greater than 0"));
        }
        Ok(())
    }

    /// Instance count must be positive.
    pub fn validate_instances(&self) -> Result<(), MatchError> {
        if self.max_instances == 0 {
            return Err(invalid("max_instances must be greater than 0"));
        }
        Ok(())
    }

    /// Per-role floors: at least one full party must be possible.
    pub fn validate_roster(&self) -> Result<(), MatchError> {
        if self.possible_parties() == 0 {
            return Err(MatchError::ImpossibleMatch {
                tanks: self.tanks,
                healers: self.healers,
                dps: self.dps,
            });
        }
        Ok(())
    }

    /// Clear-time range must be positive and ordered.
    pub fn validate_times(&self) -> Result<(), MatchError> {
        if self.min_time == 0 {
            return Err(invalid("min_time must be greater than 0"));
        }
        if self.max_time == 0 {
            return Err(invalid("max_time must be greater than 0"));
        }
        if self.min_time > self.max_time {
            return Err(invalid(
                "max_time must be greater than or equal to min_time",
            ));
        }
        Ok(())
    }

    /// Parties the roster can produce: `min(tanks, healers, dps / 3)`.
    pub fn possible_parties(&self) -> u64 {
        let per_group = u32::try_from(DPS_PER_GROUP).unwrap_or(u32::MAX);
        let dps_groups = self.dps / per_group;
        u64::from(self.tanks.min(self.healers).min(dps_groups))
    }

    /// Players across all roles.
    pub fn total_players(&self) -> u64 {
        u64::from(self.tanks) + u64::from(self.healers) + u64::from(self.dps)
    }

    /// Warning when DPS far outnumber tanks and healers.
    pub fn imbalance_warning(&self) -> Option<String> {
        let support = u64::from(self.tanks) + u64::from(self.healers);
        (u64::from(self.dps) > support * u64::from(DPS_IMBALANCE_RATIO)).then(|| {
            "DPS player count is much higher than tanks/healers; some DPS may never be matched into a party".to_string()
        })
    }

    /// Warning when the instance count is large.
    pub fn instance_warning(&self) -> Option<String> {
        (self.max_instances > INSTANCE_WARNING_THRESHOLD).then(|| {
            format!(
                "more than {INSTANCE_WARNING_THRESHOLD} instances may slow down the system"
            )
        })
    }

    /// Wall-clock length of one time unit.
    pub const fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// The subset the engine is initialized with.
    pub const fn limits(&self) -> EngineLimits {
        EngineLimits {
            max_instances: self.max_instances,
            min_time: self.min_time,
            max_time: self.max_time,
            time_unit: self.time_unit(),
        }
    }

    /// Upper bound on session length: `deadline_ms` when set, otherwise
    /// every party at `max_time`, back to back, plus the grace period.
    pub fn deadline(&self) -> Duration {
        if let Some(ms) = self.deadline_ms {
            return Duration::from_millis(ms);
        }
        let units = self.max_time.saturating_mul(self.possible_parties());
        let unit_ms = self.time_unit_ms.saturating_mul(units);
        Duration::from_millis(unit_ms) + Duration::from_secs(self.grace_secs)
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, MatchError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| invalid(&format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration from `LFG_*` environment variables, loading a
    /// `.env` file first if present, and validate.
    pub fn from_env() -> Result<Self, MatchError> {
        // Missing .env is fine; real environment variables still apply
        let _ = dotenvy::dotenv();
        let cfg = Self {
            max_instances: required("LFG_MAX_INSTANCES")?,
            tanks: required("LFG_TANKS")?,
            healers: required("LFG_HEALERS")?,
            dps: required("LFG_DPS")?,
            min_time: required("LFG_MIN_TIME")?,
            max_time: required("LFG_MAX_TIME")?,
            time_unit_ms: optional("LFG_TIME_UNIT_MS")?.unwrap_or_else(default_time_unit_ms),
            seed: optional("LFG_SEED")?,
            grace_secs: optional("LFG_GRACE_SECS")?.unwrap_or_else(default_grace_secs),
            deadline_ms: optional("LFG_DEADLINE_MS")?,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn invalid(msg: &str) -> MatchError {
    MatchError::InvalidConfig(msg.to_string())
}

fn required<T: std::str::FromStr>(key: &str) -> Result<T, MatchError> {
    optional(key)?.ok_or_else(|| invalid(&format!("{key} is not set")))
}

fn optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, MatchError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(&format!("{key} is not a valid number: {raw}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(invalid(&format!("{key} is not valid unicode"))),
    }
}
