//! Builds a matchmaking engine from a session configuration.

use crate::config::SessionConfig;
use crate::core::{MatchError, Matchmaker, Spawn, UniformDuration};

/// Clear-time source for a configuration: seeded when a seed is set,
/// entropy otherwise.
pub fn duration_source(cfg: &SessionConfig) -> UniformDuration {
    cfg.seed
        .map_or_else(UniformDuration::from_entropy, UniformDuration::seeded)
}

/// Validate the configuration and initialize an engine with uniform random
/// clear times.
pub fn build_engine<S>(cfg: &SessionConfig, spawner: S) -> Result<Matchmaker<S>, MatchError>
where
    S: Spawn + Clone + Send + 'static,
{
    cfg.validate()?;
    Matchmaker::initialize(cfg.limits(), duration_source(cfg), spawner)
}
