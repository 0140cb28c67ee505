//! Sources for dungeon clear durations.
//!
//! Workers draw their clear time from a [`DurationSource`] so tests can swap
//! the random draw for fixed or scripted values.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws a clear duration from an inclusive range of time units.
pub trait DurationSource: Send + 'static {
    /// Return a value in `min..=max`.
    fn draw(&mut self, min: u64, max: u64) -> u64;
}

/// Uniform random durations backed by `StdRng`.
#[derive(Debug)]
pub struct UniformDuration {
    rng: StdRng,
}

impl UniformDuration {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DurationSource for UniformDuration {
    fn draw(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}

/// Always the same duration, clamped into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedDuration(pub u64);

impl DurationSource for FixedDuration {
    fn draw(&mut self, min: u64, max: u64) -> u64 {
        self.0.clamp(min, max.max(min))
    }
}

/// Replays a scripted sequence, then falls back to `min`.
#[derive(Debug, Default)]
pub struct ScriptedDuration {
    values: VecDeque<u64>,
}

impl ScriptedDuration {
    /// Script the given values in order.
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl DurationSource for ScriptedDuration {
    fn draw(&mut self, min: u64, max: u64) -> u64 {
        self.values
            .pop_front()
            .map_or(min, |v| v.clamp(min, max.max(min)))
    }
}
