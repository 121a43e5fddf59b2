//! Enemy entities, the hide/attack state machine and timed boldness.
//!
//! An enemy's behavior is the product of two independent axes:
//! - [`EnemyState`]: whether it is hiding or part of an attack cluster
//! - [`Boldness`]: a timer-driven modifier that makes it ignore the player

use serde::{Deserialize, Serialize};
use skulk_common::{Circle, ClusterId, ConfigError, EnemyId, EnemyIdGenerator, Vec2};
use tracing::{debug, warn};

use crate::arena::{ArenaBounds, Obstacle};

/// Attack speed relative to max speed.
pub const ATTACK_SPEED_FACTOR: f32 = 1.2;

/// Hide/attack axis of the enemy state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Avoiding the player's line of sight (initial state)
    #[default]
    Hiding,
    /// Charging the player as part of a cluster
    Attacking,
}

/// Combined view of state and boldness, as a renderer would label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    /// Hiding and fearful
    Hide,
    /// Attacking
    Attack,
    /// Hiding but currently bold
    Bold,
}

/// Boldness change reported by [`Boldness::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoldTransition {
    /// Cooldown elapsed, the enemy is now bold
    Emboldened,
    /// Bold period elapsed, the enemy is fearful again
    Calmed,
}

/// Timed boldness modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boldness {
    /// Whether the enemy is currently bold
    pub active: bool,
    /// Seconds of boldness left (meaningful while active)
    pub duration_left: f32,
    /// Seconds until the next bold period (meaningful while inactive)
    pub cooldown_left: f32,
}

impl Boldness {
    /// Starts inactive with the given cooldown.
    #[must_use]
    pub const fn with_cooldown(cooldown: f32) -> Self {
        Self {
            active: false,
            duration_left: 0.0,
            cooldown_left: cooldown,
        }
    }

    /// Advances the timers, flipping the flag when one runs out.
    pub fn tick(
        &mut self,
        dt: f32,
        tuning: &EnemyTuning,
        rng: &mut fastrand::Rng,
    ) -> Option<BoldTransition> {
        if self.active {
            self.duration_left -= dt;
            if self.duration_left <= 0.0 {
                self.active = false;
                self.duration_left = 0.0;
                self.cooldown_left = sample(rng, tuning.bold_cooldown);
                return Some(BoldTransition::Calmed);
            }
        } else {
            self.cooldown_left -= dt;
            if self.cooldown_left <= 0.0 {
                self.active = true;
                self.cooldown_left = 0.0;
                self.duration_left = sample(rng, tuning.bold_duration);
                return Some(BoldTransition::Emboldened);
            }
        }
        None
    }
}

/// Persistent wander heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wander {
    /// Current heading in radians
    pub angle: f32,
    /// Magnitude of the wander contribution
    pub speed: f32,
    /// Maximum heading change per second, in radians
    pub jitter: f32,
}

/// Fixed per-enemy behavior weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorWeights {
    /// Extra gap kept between an obstacle and a chosen hide spot
    pub hide_distance: f32,
    /// Multiplier on the separation force
    pub separation: f32,
    /// Multiplier on obstacle and wall avoidance
    pub avoidance: f32,
    /// Multiplier on fleeing while visible
    pub los_flee: f32,
    /// Multiplier on seeking a hide spot while visible
    pub hide: f32,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self {
            hide_distance: 30.0,
            separation: 1.5,
            avoidance: 2.0,
            los_flee: 0.6,
            hide: 1.0,
        }
    }
}

/// Designer-set ranges sampled when spawning and for bold timers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Body radius range
    pub radius: (f32, f32),
    /// Max speed range (units per second)
    pub max_speed: (f32, f32),
    /// Wander speed range
    pub wander_speed: (f32, f32),
    /// Wander jitter range (radians per second)
    pub wander_jitter: (f32, f32),
    /// Length of a bold period (seconds)
    pub bold_duration: (f32, f32),
    /// Time between bold periods (seconds)
    pub bold_cooldown: (f32, f32),
    /// Behavior weights applied to every enemy
    pub weights: BehaviorWeights,
    /// Spawn exclusion radius around the arena centre
    pub spawn_safe_radius: f32,
    /// Placement attempts per enemy before giving up
    pub spawn_attempts: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: (10.0, 14.0),
            max_speed: (90.0, 130.0),
            wander_speed: (40.0, 70.0),
            wander_jitter: (1.5, 3.0),
            bold_duration: (1.5, 3.0),
            bold_cooldown: (6.0, 12.0),
            weights: BehaviorWeights::default(),
            spawn_safe_radius: 50.0,
            spawn_attempts: 30,
        }
    }
}

impl EnemyTuning {
    /// Validates every range and weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::ensure_range("enemy.radius", self.radius)?;
        ConfigError::ensure_positive("enemy.radius", self.radius.0)?;
        ConfigError::ensure_range("enemy.max_speed", self.max_speed)?;
        ConfigError::ensure_positive("enemy.max_speed", self.max_speed.0)?;
        ConfigError::ensure_range("enemy.wander_speed", self.wander_speed)?;
        ConfigError::ensure_non_negative("enemy.wander_speed", self.wander_speed.0)?;
        ConfigError::ensure_range("enemy.wander_jitter", self.wander_jitter)?;
        ConfigError::ensure_range("enemy.bold_duration", self.bold_duration)?;
        ConfigError::ensure_positive("enemy.bold_duration", self.bold_duration.0)?;
        ConfigError::ensure_range("enemy.bold_cooldown", self.bold_cooldown)?;
        ConfigError::ensure_positive("enemy.bold_cooldown", self.bold_cooldown.0)?;
        ConfigError::ensure_positive("enemy.weights.separation", self.weights.separation)?;
        ConfigError::ensure_positive("enemy.weights.avoidance", self.weights.avoidance)?;
        ConfigError::ensure_non_negative("enemy.weights.hide_distance", self.weights.hide_distance)?;
        ConfigError::ensure_non_negative("enemy.weights.los_flee", self.weights.los_flee)?;
        ConfigError::ensure_non_negative("enemy.weights.hide", self.weights.hide)?;
        ConfigError::ensure_non_negative("enemy.spawn_safe_radius", self.spawn_safe_radius)?;
        if self.spawn_attempts == 0 {
            return Err(ConfigError::NotPositive {
                name: "enemy.spawn_attempts",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Rolls a fresh enemy at `position`.
    pub fn roll(&self, id: EnemyId, position: Vec2, radius: f32, rng: &mut fastrand::Rng) -> Enemy {
        let mut enemy = Enemy::new(id, position, radius, sample(rng, self.max_speed));
        enemy.wander = Wander {
            angle: rng.f32() * std::f32::consts::TAU,
            speed: sample(rng, self.wander_speed),
            jitter: sample(rng, self.wander_jitter),
        };
        enemy.boldness = Boldness::with_cooldown(sample(rng, self.bold_cooldown));
        enemy.weights = self.weights;
        enemy
    }
}

/// Uniform sample from an inclusive `(min, max)` range.
pub(crate) fn sample(rng: &mut fastrand::Rng, (min, max): (f32, f32)) -> f32 {
    min + rng.f32() * (max - min)
}

/// An autonomous adversary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable identifier
    pub id: EnemyId,
    /// Centre position
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Body radius
    pub radius: f32,
    /// Speed ceiling while roaming
    pub max_speed: f32,
    /// Speed ceiling while attacking, retreating or bold
    pub attack_speed: f32,
    /// Hide/attack state
    pub state: EnemyState,
    /// Attack cluster, only set while attacking
    pub cluster: Option<ClusterId>,
    /// Timed boldness modifier
    pub boldness: Boldness,
    /// Persistent wander heading
    pub wander: Wander,
    /// Behavior weights
    pub weights: BehaviorWeights,
}

impl Enemy {
    /// Creates a hiding enemy at rest.
    #[must_use]
    pub fn new(id: EnemyId, position: Vec2, radius: f32, max_speed: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius,
            max_speed,
            attack_speed: max_speed * ATTACK_SPEED_FACTOR,
            state: EnemyState::Hiding,
            cluster: None,
            boldness: Boldness::with_cooldown(8.0),
            wander: Wander {
                angle: 0.0,
                speed: 50.0,
                jitter: 2.0,
            },
            weights: BehaviorWeights::default(),
        }
    }

    /// Returns the body circle.
    #[must_use]
    pub const fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Checks whether the enemy is part of an attack.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.state == EnemyState::Attacking
    }

    /// Checks whether the bold modifier is active.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.boldness.active
    }

    /// Combined state/boldness label.
    #[must_use]
    pub fn stance(&self) -> Stance {
        match self.state {
            EnemyState::Attacking => Stance::Attack,
            EnemyState::Hiding if self.is_bold() => Stance::Bold,
            EnemyState::Hiding => Stance::Hide,
        }
    }

    /// Joins an attack cluster.
    pub fn promote(&mut self, cluster: ClusterId) {
        self.state = EnemyState::Attacking;
        self.cluster = Some(cluster);
    }

    /// Leaves the attack and goes back to hiding. Boldness is untouched.
    pub fn demote(&mut self) {
        self.state = EnemyState::Hiding;
        self.cluster = None;
    }

    /// Normalized velocity, or +x when at rest.
    #[must_use]
    pub fn heading(&self) -> Vec2 {
        let heading = self.velocity.normalize_or_zero();
        if heading == Vec2::ZERO {
            Vec2::X
        } else {
            heading
        }
    }
}

/// Spawns up to `count` enemies at random free positions.
///
/// A candidate is rejected if it falls inside the safe radius around the
/// arena centre, overlaps an obstacle, or overlaps an enemy placed earlier.
/// Enemies that find no free spot within `tuning.spawn_attempts` are skipped,
/// so the returned vector may be shorter than `count`.
pub fn spawn_enemies(
    count: usize,
    arena: &ArenaBounds,
    obstacles: &[Obstacle],
    tuning: &EnemyTuning,
    ids: &mut EnemyIdGenerator,
    rng: &mut fastrand::Rng,
) -> Vec<Enemy> {
    let mut enemies: Vec<Enemy> = Vec::with_capacity(count);
    let center = arena.center();

    for _ in 0..count {
        for _ in 0..tuning.spawn_attempts {
            let radius = sample(rng, tuning.radius);
            if arena.width <= radius * 2.0 || arena.height <= radius * 2.0 {
                break;
            }
            let position = Vec2::new(
                sample(rng, (radius, arena.width - radius)),
                sample(rng, (radius, arena.height - radius)),
            );

            if position.distance(center) < tuning.spawn_safe_radius {
                continue;
            }

            let body = Circle::new(position, radius);
            if obstacles.iter().any(|o| body.overlaps(&o.circle())) {
                continue;
            }
            if enemies.iter().any(|e| body.overlaps(&e.circle())) {
                continue;
            }

            let enemy = tuning.roll(ids.next_id(), position, radius, rng);
            debug!(
                "Spawned {} at ({:.1}, {:.1}) r={:.1} speed={:.1}",
                enemy.id, position.x, position.y, radius, enemy.max_speed
            );
            enemies.push(enemy);
            break;
        }
    }

    if enemies.len() < count {
        warn!(
            "Could only place {} of {} enemies",
            enemies.len(),
            count
        );
    }

    enemies
}
