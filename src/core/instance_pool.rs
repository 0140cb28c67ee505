//! Fixed-size table of dungeon instance slots.
//!
//! Slots move `Empty -> Reserved -> Active -> Empty`. Reservation always picks
//! the lowest free index, so identical input sequences produce identical
//! assignments.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{MatchError, SlotStatusLabel};

/// Status of one instance slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Free for the matcher to reserve.
    Empty,
    /// Claimed by the matcher, worker not yet running.
    Reserved,
    /// Worker is clearing the dungeon.
    Active,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::Reserved => "reserved",
            Self::Active => "active",
        })
    }
}

/// One instance slot and its lifetime counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSlot {
    /// Zero-based slot index.
    pub index: usize,
    /// Current status.
    pub status: SlotStatus,
    /// Parties this slot has finished serving.
    pub parties_served: u64,
}

/// The instance slot table. Only ever touched under the engine lock.
#[derive(Debug)]
pub struct InstancePool {
    slots: Vec<InstanceSlot>,
}

impl InstancePool {
    /// Create a pool with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|index| InstanceSlot {
                index,
                status: SlotStatus::Empty,
                parties_served: 0,
            })
            .collect();
        Self { slots }
    }

    /// Reserve the lowest-indexed empty slot.
    pub fn try_reserve(&mut self) -> Option<usize> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.status == SlotStatus::Empty)?;
        slot.status = SlotStatus::Reserved;
        Some(slot.index)
    }

    /// Move a reserved slot to active.
    pub fn activate(&mut self, index: usize) -> Result<(), MatchError> {
        self.transition(index, "activate", |s| s == SlotStatus::Reserved, SlotStatus::Active)
    }

    /// Return a reserved or active slot to empty and count the served party.
    pub fn release(&mut self, index: usize) -> Result<(), MatchError> {
        self.transition(index, "release", |s| s != SlotStatus::Empty, SlotStatus::Empty)?;
        self.slots[index].parties_served += 1;
        Ok(())
    }

    /// Return a slot to empty without counting a served party.
    ///
    /// Used when a worker is torn down before its dungeon clear completes.
    pub fn abandon(&mut self, index: usize) -> Result<(), MatchError> {
        self.transition(index, "abandon", |s| s != SlotStatus::Empty, SlotStatus::Empty)
    }

    fn transition(
        &mut self,
        index: usize,
        action: &'static str,
        allowed: impl Fn(SlotStatus) -> bool,
        to: SlotStatus,
    ) -> Result<(), MatchError> {
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(MatchError::InvalidTransition {
                index,
                from: SlotStatusLabel::Missing,
                action,
            });
        };
        if !allowed(slot.status) {
            return Err(MatchError::InvalidTransition {
                index,
                from: SlotStatusLabel::Status(slot.status),
                action,
            });
        }
        slot.status = to;
        Ok(())
    }

    /// True when at least one slot is empty.
    pub fn has_free(&self) -> bool {
        self.slots.iter().any(|s| s.status == SlotStatus::Empty)
    }

    /// Number of reserved plus active slots.
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.status != SlotStatus::Empty)
            .count()
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Parties served per slot, by index.
    pub fn served_counts(&self) -> Vec<u64> {
        self.slots.iter().map(|s| s.parties_served).collect()
    }

    /// Current status per slot, by index.
    pub fn statuses(&self) -> Vec<SlotStatus> {
        self.slots.iter().map(|s| s.status).collect()
    }

    /// Read-only view of the slots.
    pub fn slots(&self) -> &[InstanceSlot] {
        &self.slots
    }
}
