//! # Skulk Common
//!
//! Common types, utilities, and shared abstractions for Skulk.
//!
//! This crate provides foundational types used across all Skulk subsystems:
//! - 2D geometry (vector primitive, circles, segment tests)
//! - ID types (EnemyId, ClusterId) and their generators
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_generation() {
        let mut ids = ClusterIdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, second);
        assert!(second.raw() > first.raw());
    }

    #[test]
    fn test_segment_circle_blocking() {
        let blocker = Circle::new(Vec2::new(50.0, 0.0), 10.0);
        assert!(segment_hits_circle(Vec2::ZERO, Vec2::new(100.0, 0.0), blocker));
        assert!(!segment_hits_circle(
            Vec2::ZERO,
            Vec2::new(0.0, 100.0),
            blocker
        ));
    }
}
