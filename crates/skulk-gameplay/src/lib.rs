//! # Skulk Gameplay
//!
//! Adversary simulation for a 2D arena shooter.
//!
//! This crate provides the CPU-side systems that make enemies behave:
//! - Arena bounds and static obstacles
//! - Player body, facing and weapon cooldown
//! - Enemies with hide/attack state and timed boldness
//! - Steering behaviors and the hide/roam/attack policies
//! - Cluster-triggered aggression manager
//! - Motion integration and penetration resolution
//! - Railgun beam occlusion and hit tests
//! - Frame orchestration and an event bus for drivers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod aggression;
pub mod arena;
pub mod enemy;
pub mod events;
pub mod motion;
pub mod player;
pub mod railgun;
pub mod simulation;
pub mod steering;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggression::*;
    pub use crate::arena::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::motion::{clamp_player_to_arena, resolve_player_collisions, step_enemy};
    pub use crate::player::*;
    pub use crate::railgun::*;
    pub use crate::simulation::*;
    pub use crate::steering::{Steering, SteeringInput};
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use skulk_common::Vec2;

    #[test]
    fn test_arena_center() {
        let arena = ArenaBounds::new(1200.0, 800.0).expect("valid arena");
        assert_eq!(arena.center(), Vec2::new(600.0, 400.0));
    }

    #[test]
    fn test_enemy_creation() {
        let enemy = Enemy::new(skulk_common::EnemyId::new(3), Vec2::new(10.0, 20.0), 12.0, 100.0);
        assert_eq!(enemy.state, EnemyState::Hiding);
        assert!((enemy.attack_speed - 120.0).abs() < 0.001);
        assert_eq!(enemy.stance(), Stance::Hide);
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(SimulationConfig::default(), 7).expect("default config is valid");
        assert!(!sim.enemies().is_empty());
        assert_eq!(sim.outcome(), FrameOutcome::Running);
    }
}
