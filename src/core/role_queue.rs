//! FIFO role queues feeding the matcher.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Player identifier, unique within one role only.
pub type PlayerId = u32;

/// DPS players per group.
pub const DPS_PER_GROUP: usize = 3;

/// Players per group (1 tank, 1 healer, 3 DPS).
pub const PARTY_SIZE: usize = 2 + DPS_PER_GROUP;

/// Role a player queues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-line role, one per group.
    Tank,
    /// Support role, one per group.
    Healer,
    /// Damage role, three per group.
    Dps,
}

impl Role {
    /// All roles in feed order.
    pub const ALL: [Self; 3] = [Self::Tank, Self::Healer, Self::Dps];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tank => "TANK",
            Self::Healer => "HEALER",
            Self::Dps => "DPS",
        })
    }
}

/// Players popped for one group, before an instance is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party {
    /// Tank id.
    pub tank: PlayerId,
    /// Healer id.
    pub healer: PlayerId,
    /// DPS ids in arrival order.
    pub dps: [PlayerId; DPS_PER_GROUP],
}

/// Waiting-player counts per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingCounts {
    /// Tanks waiting.
    pub tank: usize,
    /// Healers waiting.
    pub healer: usize,
    /// DPS waiting.
    pub dps: usize,
}

/// The three role queues. Only ever touched under the engine lock.
#[derive(Debug, Default)]
pub struct RoleQueues {
    tanks: VecDeque<PlayerId>,
    healers: VecDeque<PlayerId>,
    dps: VecDeque<PlayerId>,
}

impl RoleQueues {
    /// Create empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    fn queue_mut(&mut self, role: Role) -> &mut VecDeque<PlayerId> {
        match role {
            Role::Tank => &mut self.tanks,
            Role::Healer => &mut self.healers,
            Role::Dps => &mut self.dps,
        }
    }

    /// Append a player to the tail of its role queue.
    pub fn enqueue(&mut self, role: Role, id: PlayerId) {
        self.queue_mut(role).push_back(id);
    }

    /// True when one tank, one healer and three DPS are waiting.
    pub fn peek_all_ready(&self) -> bool {
        !self.tanks.is_empty() && !self.healers.is_empty() && self.dps.len() >= DPS_PER_GROUP
    }

    /// Pop one full party from the queue fronts. Pops nothing when not ready.
    pub fn pop_group(&mut self) -> Option<Party> {
        if !self.peek_all_ready() {
            return None;
        }
        let tank = self.tanks.pop_front()?;
        let healer = self.healers.pop_front()?;
        let mut dps = [0; DPS_PER_GROUP];
        for slot in &mut dps {
            *slot = self.dps.pop_front()?;
        }
        Some(Party { tank, healer, dps })
    }

    /// Players waiting for one role.
    pub fn len(&self, role: Role) -> usize {
        match role {
            Role::Tank => self.tanks.len(),
            Role::Healer => self.healers.len(),
            Role::Dps => self.dps.len(),
        }
    }

    /// True when no player of any role is waiting.
    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty() && self.healers.is_empty() && self.dps.is_empty()
    }

    /// Snapshot of waiting counts.
    pub fn waiting(&self) -> WaitingCounts {
        WaitingCounts {
            tank: self.tanks.len(),
            healer: self.healers.len(),
            dps: self.dps.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_until_three_dps() {
        let mut q = RoleQueues::new();
        q.enqueue(Role::Tank, 1);
        q.enqueue(Role::Healer, 1);
        q.enqueue(Role::Dps, 1);
        q.enqueue(Role::Dps, 2);
        assert!(!q.peek_all_ready());
        assert!(q.pop_group().is_none());
        // Nothing consumed by the failed pop
        assert_eq!(q.waiting(), WaitingCounts { tank: 1, healer: 1, dps: 2 });

        q.enqueue(Role::Dps, 3);
        assert!(q.peek_all_ready());
    }

    #[test]
    fn test_pop_group_is_fifo_per_role() {
        let mut q = RoleQueues::new();
        for id in 1..=2 {
            q.enqueue(Role::Tank, id);
            q.enqueue(Role::Healer, id + 10);
        }
        for id in 1..=6 {
            q.enqueue(Role::Dps, id);
        }

        let first = q.pop_group().unwrap();
        assert_eq!(first, Party { tank: 1, healer: 11, dps: [1, 2, 3] });
        let second = q.pop_group().unwrap();
        assert_eq!(second, Party { tank: 2, healer: 12, dps: [4, 5, 6] });
        assert!(q.is_empty());
    }

    #[test]
    fn test_missing_role_blocks_group() {
        let mut q = RoleQueues::new();
        q.enqueue(Role::Tank, 1);
        for id in 1..=3 {
            q.enqueue(Role::Dps, id);
        }
        assert!(!q.peek_all_ready());
        assert_eq!(q.len(Role::Healer), 0);
        assert_eq!(q.len(Role::Dps), 3);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Tank.to_string(), "TANK");
        assert_eq!(Role::Healer.to_string(), "HEALER");
        assert_eq!(Role::Dps.to_string(), "DPS");
    }
}
