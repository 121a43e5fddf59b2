//! ID types for enemies and aggression clusters.

use serde::{Deserialize, Serialize};

/// Stable identifier for a spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates an enemy ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Identifier shared by the members of a promoted attack cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Sentinel cluster for the final-stand override.
    ///
    /// Never produced by [`ClusterIdGenerator`].
    pub const FINAL_STAND: Self = Self(0);

    /// Creates a cluster ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this is the final-stand sentinel.
    #[must_use]
    pub const fn is_final_stand(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_final_stand() {
            write!(f, "cluster#final")
        } else {
            write!(f, "cluster#{}", self.0)
        }
    }
}

/// Monotonic source of [`ClusterId`]s, owned by whoever promotes clusters.
#[derive(Debug, Clone)]
pub struct ClusterIdGenerator {
    next: u64,
}

impl Default for ClusterIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterIdGenerator {
    /// Creates a generator whose first ID is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocates the next cluster ID.
    pub fn next_id(&mut self) -> ClusterId {
        let id = ClusterId(self.next);
        self.next += 1;
        id
    }

    /// Returns the ID the next call to [`Self::next_id`] will produce.
    #[must_use]
    pub const fn peek(&self) -> ClusterId {
        ClusterId(self.next)
    }
}

/// Sequential source of [`EnemyId`]s for a spawner.
#[derive(Debug, Clone, Default)]
pub struct EnemyIdGenerator {
    next: u32,
}

impl EnemyIdGenerator {
    /// Creates a generator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocates the next enemy ID.
    pub fn next_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next);
        self.next += 1;
        id
    }
}
