//! Error types for matchmaking operations.

use thiserror::Error;

use super::instance_pool::SlotStatus;

/// Errors produced by the matchmaking engine and its collaborators.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Configuration rejected before the engine starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Role counts can never produce a full group.
    #[error("impossible match: {tanks} tank(s), {healers} healer(s), {dps} dps cannot form a party")]
    ImpossibleMatch {
        /// Tanks configured.
        tanks: u32,
        /// Healers configured.
        healers: u32,
        /// DPS configured.
        dps: u32,
    },
    /// Instance slot transition not allowed from its current status.
    #[error("instance {index}: cannot {action} a slot that is {from}")]
    InvalidTransition {
        /// Slot index.
        index: usize,
        /// Status the slot was in, or `Missing` for an out-of-range index.
        from: SlotStatusLabel,
        /// Attempted action.
        action: &'static str,
    },
    /// The matcher loop is already running for this engine.
    #[error("matcher already started")]
    AlreadyStarted,
    /// The matcher thread could not be spawned or panicked.
    #[error("matcher error: {0}")]
    Matcher(String),
    /// Interactive input ended before a value was read.
    #[error("input closed")]
    InputClosed,
    /// I/O failure while prompting.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Printable slot state used in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatusLabel {
    /// Slot exists and had this status.
    Status(SlotStatus),
    /// Index outside the pool.
    Missing,
}

impl std::fmt::Display for SlotStatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Missing => f.write_str("missing"),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
