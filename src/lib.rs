//! # LFG Matchmaker
//!
//! A "Looking for Group" matchmaking simulator built around a single
//! coordination lock and condition variable.
//!
//! Players queue by role (Tank, Healer, DPS). A matcher thread waits until a
//! full party (1 tank, 1 healer, 3 DPS) **and** a free dungeon instance are
//! available at the same time, then pops the party and reserves the instance
//! in one critical section. Each party is handed to its own worker, which
//! clears the dungeon for a random duration with the lock released, frees the
//! instance and wakes the matcher again.
//!
//! ## Key Properties
//!
//! - **One lock**: role queues, instance slots, counters and the group log all
//!   live behind one `parking_lot::Mutex`
//! - **Compound wait**: the matcher re-checks [`core::match_ready`] after every
//!   wake, so spurious or stolen wake-ups never consume players
//! - **Deterministic assignment**: FIFO per role, lowest free instance first,
//!   group ids `1..=K` without gaps
//! - **Injectable timing**: clear durations come from a
//!   [`core::DurationSource`], so tests can fix or script them
//! - **Supervised workers**: in-flight workers are counted and can be awaited
//!   with [`core::Matchmaker::drain`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use lfg_matchmaker::core::{EngineLimits, FixedDuration, Matchmaker, Role};
//! use lfg_matchmaker::runtime::TokioSpawner;
//! use std::time::Duration;
//!
//! let engine = Matchmaker::initialize(
//!     EngineLimits {
//!         max_instances: 2,
//!         min_time: 1,
//!         max_time: 3,
//!         time_unit: Duration::from_secs(1),
//!     },
//!     FixedDuration(2),
//!     TokioSpawner::current(),
//! )?;
//! let matcher = engine.start_matching()?;
//! engine.enqueue(Role::Tank, 1);
//! engine.enqueue(Role::Healer, 1);
//! engine.enqueue_many(Role::Dps, 1..=3);
//! engine.served(1).await;
//! matcher.stop()?;
//! ```
//!
//! For a complete session (validation, roster feed, deadline, summary) see
//! [`runtime::run_session`].

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core matchmaking engine: queues, slots, matcher and workers.
pub mod core;
/// Configuration models for sessions.
pub mod config;
/// Builders to construct the engine from configuration.
pub mod builders;
/// Runtime adapters, session runner and console collaborators.
pub mod runtime;
/// Shared utilities.
pub mod util;
