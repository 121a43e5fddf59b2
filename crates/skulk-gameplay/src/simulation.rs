//! Frame orchestration.
//!
//! This module provides the `Simulation` struct which owns the arena, the
//! player, every enemy and the weapon, and advances them one frame at a time
//! in a fixed order.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use skulk_common::{ConfigError, EnemyId, EnemyIdGenerator, Vec2};
use tracing::{debug, info};

use crate::aggression::{AggressionConfig, AggressionManager, AggressionReport};
use crate::arena::{ArenaBounds, Obstacle};
use crate::enemy::{spawn_enemies, BoldTransition, Enemy, EnemyTuning};
use crate::events::{EventBus, SimEvent};
use crate::motion::{clamp_player_to_arena, resolve_player_collisions, step_enemy};
use crate::player::{Player, PlayerConfig};
use crate::railgun::{Railgun, RailgunConfig};

/// Everything needed to build a [`Simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Arena size
    pub arena: ArenaBounds,
    /// Static obstacles
    pub obstacles: Vec<Obstacle>,
    /// Enemies to spawn
    pub enemy_count: usize,
    /// Player tuning
    pub player: PlayerConfig,
    /// Enemy ranges and weights
    pub enemy: EnemyTuning,
    /// Cluster aggression tuning
    pub aggression: AggressionConfig,
    /// Weapon tuning
    pub railgun: RailgunConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            obstacles: Obstacle::default_layout(),
            enemy_count: 5,
            player: PlayerConfig::default(),
            enemy: EnemyTuning::default(),
            aggression: AggressionConfig::default(),
            railgun: RailgunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        for obstacle in &self.obstacles {
            ConfigError::ensure_positive("obstacle.radius", obstacle.radius)?;
        }
        self.player.validate()?;
        self.enemy.validate()?;
        self.aggression.validate()?;
        self.railgun.validate()
    }
}

/// Player intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement direction, normalized by the player
    pub movement: Vec2,
    /// World point to face
    pub aim: Vec2,
    /// Whether the trigger is held
    pub trigger: bool,
}

/// Result of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameOutcome {
    /// Keep going
    #[default]
    Running,
    /// An enemy reached the player
    Defeat,
    /// Every enemy was eliminated
    Victory,
}

impl FrameOutcome {
    /// Checks whether the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Owns and advances the whole arena.
#[derive(Debug)]
pub struct Simulation {
    arena: ArenaBounds,
    obstacles: Vec<Obstacle>,
    tuning: EnemyTuning,
    player: Player,
    enemies: Vec<Enemy>,
    railgun: Railgun,
    aggression: AggressionManager,
    rng: fastrand::Rng,
    events: EventBus,
    outcome: FrameOutcome,
    frame: u64,
    elapsed: f32,
    shots: u32,
    kills: u32,
}

impl Simulation {
    /// Validates the config, spawns enemies and places the player at the
    /// arena centre.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut ids = EnemyIdGenerator::new();
        let enemies = spawn_enemies(
            config.enemy_count,
            &config.arena,
            &config.obstacles,
            &config.enemy,
            &mut ids,
            &mut rng,
        );
        info!(
            "Simulation started with {} enemies (seed {})",
            enemies.len(),
            seed
        );
        Ok(Self::assemble(config, enemies, rng))
    }

    /// Builds a simulation around pre-placed enemies.
    pub fn with_enemies(
        config: SimulationConfig,
        enemies: Vec<Enemy>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, enemies, fastrand::Rng::with_seed(seed)))
    }

    fn assemble(config: SimulationConfig, enemies: Vec<Enemy>, rng: fastrand::Rng) -> Self {
        Self {
            player: Player::new(config.arena.center(), &config.player),
            arena: config.arena,
            obstacles: config.obstacles,
            tuning: config.enemy,
            enemies,
            railgun: Railgun::new(config.railgun),
            aggression: AggressionManager::new(config.aggression),
            rng,
            events: EventBus::default(),
            outcome: FrameOutcome::Running,
            frame: 0,
            elapsed: 0.0,
            shots: 0,
            kills: 0,
        }
    }

    /// Advances one frame.
    ///
    /// Once the run has ended the outcome is returned unchanged and nothing
    /// moves.
    pub fn tick(&mut self, dt: f32, input: &PlayerInput) -> FrameOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        self.frame += 1;
        self.elapsed += dt;

        self.player.tick(dt);
        self.railgun.update(dt);
        self.player.apply_input(input.movement, input.aim, dt);
        clamp_player_to_arena(&mut self.player, &self.arena);

        if resolve_player_collisions(&mut self.player, &self.obstacles, &self.enemies) {
            info!("Player caught after {:.2}s", self.elapsed);
            self.events.publish(SimEvent::PlayerCaught);
            return self.finish(FrameOutcome::Defeat);
        }

        let report = self.aggression.advance(&mut self.enemies);
        self.publish_aggression(report);

        for index in 0..self.enemies.len() {
            let transition = step_enemy(
                &mut self.enemies,
                index,
                dt,
                &self.arena,
                &self.obstacles,
                &self.player,
                &self.tuning,
                &mut self.rng,
            );
            let enemy = self.enemies[index].id;
            match transition {
                Some(BoldTransition::Emboldened) => {
                    self.events.publish(SimEvent::EnemyEmboldened { enemy });
                }
                Some(BoldTransition::Calmed) => {
                    self.events.publish(SimEvent::EnemyCalmed { enemy });
                }
                None => {}
            }
        }

        if input.trigger && self.player.try_trigger() {
            self.fire();
        }

        if self.enemies.is_empty() {
            info!(
                "All enemies eliminated after {:.2}s ({} shots)",
                self.elapsed, self.shots
            );
            self.events.publish(SimEvent::AllEnemiesEliminated);
            return self.finish(FrameOutcome::Victory);
        }

        FrameOutcome::Running
    }

    fn fire(&mut self) {
        let killed = self.railgun.fire(&self.player, &self.enemies, &self.obstacles);
        self.shots += 1;
        if let Some(beam) = self.railgun.last_beam() {
            self.events.publish(SimEvent::BeamFired {
                start: beam.start,
                end: beam.end,
            });
        }
        if killed.is_empty() {
            return;
        }

        let killed: AHashSet<EnemyId> = killed.into_iter().collect();
        self.enemies.retain(|e| !killed.contains(&e.id));
        for &enemy in &killed {
            debug!("{} killed", enemy);
            self.events.publish(SimEvent::EnemyKilled { enemy });
        }
        self.kills += killed.len() as u32;
    }

    fn publish_aggression(&self, report: AggressionReport) {
        if report.final_stand && !report.promoted.is_empty() {
            info!("Final stand with {} enemies", self.enemies.len());
            self.events.publish(SimEvent::FinalStand {
                remaining: self.enemies.len(),
            });
        }
        for (cluster, members) in report.promoted {
            self.events
                .publish(SimEvent::ClusterPromoted { cluster, members });
        }
        for enemy in report.demoted {
            self.events.publish(SimEvent::EnemyDemoted { enemy });
        }
    }

    fn finish(&mut self, outcome: FrameOutcome) -> FrameOutcome {
        self.outcome = outcome;
        outcome
    }

    /// Returns the current outcome.
    #[must_use]
    pub const fn outcome(&self) -> FrameOutcome {
        self.outcome
    }

    /// Returns the live enemies.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Returns the player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Returns a mutable reference to the player.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Returns the obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Returns the arena bounds.
    #[must_use]
    pub const fn arena(&self) -> &ArenaBounds {
        &self.arena
    }

    /// Returns the railgun.
    #[must_use]
    pub const fn railgun(&self) -> &Railgun {
        &self.railgun
    }

    /// Returns the event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Drains all pending events.
    pub fn drain_events(&self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Frames advanced so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Shots fired so far.
    #[must_use]
    pub const fn shots(&self) -> u32 {
        self.shots
    }

    /// Enemies killed so far.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }
}
