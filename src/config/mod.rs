//! Configuration models for matchmaking sessions.

pub mod session;

pub use session::{SessionConfig, DPS_IMBALANCE_RATIO, INSTANCE_WARNING_THRESHOLD};
