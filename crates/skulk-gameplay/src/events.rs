//! Simulation event bus.
//!
//! The frame loop publishes what happened; drivers, loggers and renderers
//! drain the bus when they are ready.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use skulk_common::{ClusterId, EnemyId, Vec2};

/// Something observable that happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Hiding enemies were promoted to an attack cluster
    ClusterPromoted {
        /// Cluster identifier
        cluster: ClusterId,
        /// Members, seed first
        members: Vec<EnemyId>,
    },
    /// An isolated attacker went back to hiding
    EnemyDemoted {
        /// Enemy ID
        enemy: EnemyId,
    },
    /// Few enough enemies remain that all of them attack
    FinalStand {
        /// Remaining enemy count
        remaining: usize,
    },
    /// An enemy's bold period started
    EnemyEmboldened {
        /// Enemy ID
        enemy: EnemyId,
    },
    /// An enemy's bold period ended
    EnemyCalmed {
        /// Enemy ID
        enemy: EnemyId,
    },
    /// The railgun fired
    BeamFired {
        /// Beam origin
        start: Vec2,
        /// Where the beam stopped
        end: Vec2,
    },
    /// An enemy was hit by the beam and removed
    EnemyKilled {
        /// Enemy ID
        enemy: EnemyId,
    },
    /// An enemy reached the player
    PlayerCaught,
    /// No enemies remain
    AllEnemiesEliminated,
}

/// Event bus for broadcasting simulation events.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<SimEvent>,
    receiver: Receiver<SimEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: SimEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<SimEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<SimEvent> {
        self.sender.clone()
    }
}
