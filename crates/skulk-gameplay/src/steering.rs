//! Steering behaviors and the per-state policies built from them.
//!
//! Every behavior returns a desired-velocity contribution. Policies sum
//! contributions without normalizing; the motion step clamps the total to the
//! target speed the policy reports.

use skulk_common::{segment_hits_circle, Vec2};

use crate::arena::{ArenaBounds, Obstacle};
use crate::enemy::{Enemy, EnemyState, Wander};
use crate::player::Player;

/// Look-ahead time used by obstacle avoidance, in seconds of travel.
const LOOK_AHEAD_TIME: f32 = 0.4;
/// Extra gap kept around obstacles.
const OBSTACLE_CLEARANCE: f32 = 10.0;
/// Distance from a wall at which avoidance starts pushing back.
const WALL_MARGIN: f32 = 25.0;
/// Extra gap kept between enemy bodies.
const SEPARATION_GAP: f32 = 12.0;
/// Neighbourhood used for cohesion while roaming.
const COHESION_RADIUS: f32 = 180.0;

/// Output of a policy: where the enemy wants to go and how fast it may get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Summed desired velocity, not yet clamped
    pub desired: Vec2,
    /// Speed ceiling for this frame
    pub target_speed: f32,
}

/// Read-only view of the world around the enemy being steered.
#[derive(Debug, Clone, Copy)]
pub struct SteeringInput<'a> {
    /// Every live enemy, including the one being steered
    pub enemies: &'a [Enemy],
    /// Index of the enemy being steered
    pub index: usize,
    /// Static obstacles
    pub obstacles: &'a [Obstacle],
    /// Arena bounds
    pub arena: &'a ArenaBounds,
    /// The player
    pub player: &'a Player,
}

impl SteeringInput<'_> {
    /// The enemy being steered.
    #[must_use]
    pub fn enemy(&self) -> &Enemy {
        &self.enemies[self.index]
    }
}

/// Full speed toward `target`.
#[must_use]
pub fn seek(from: Vec2, target: Vec2, speed: f32) -> Vec2 {
    (target - from).normalize_or_zero() * speed
}

/// Full speed away from `threat`.
#[must_use]
pub fn flee(from: Vec2, threat: Vec2, speed: f32) -> Vec2 {
    (from - threat).normalize_or_zero() * speed
}

/// Jitters the persistent wander heading and returns the wander force.
pub fn wander(state: &mut Wander, dt: f32, rng: &mut fastrand::Rng) -> Vec2 {
    let jitter = (rng.f32() * 2.0 - 1.0) * state.jitter;
    state.angle += jitter * dt;
    Vec2::new(state.angle.cos(), state.angle.sin()) * state.speed
}

/// Pushes away from obstacles ahead of the enemy and from nearby walls.
#[must_use]
pub fn avoid_obstacles(enemy: &Enemy, obstacles: &[Obstacle], arena: &ArenaBounds) -> Vec2 {
    let mut steer = Vec2::ZERO;
    let r = enemy.radius;
    let heading = enemy.heading();
    let look_ahead = r + enemy.max_speed.max(enemy.attack_speed) * LOOK_AHEAD_TIME;

    for obstacle in obstacles {
        let to_obstacle = obstacle.position - enemy.position;
        let away = (-to_obstacle).normalize_or_zero();
        let min_clear = r + obstacle.radius + OBSTACLE_CLEARANCE;

        let projection = to_obstacle.dot(heading);
        if !(0.0..=look_ahead).contains(&projection) {
            continue;
        }

        let perp = to_obstacle.perp_dot(heading).abs();
        if perp < min_clear {
            steer += away * (min_clear - perp);
        }

        let distance = to_obstacle.length();
        if distance > 0.0 && distance < min_clear {
            steer += away * (min_clear - distance);
        }
    }

    let margin = r + WALL_MARGIN;
    let p = enemy.position;
    if p.x < margin {
        steer.x += margin - p.x;
    } else if p.x > arena.width - margin {
        steer.x -= p.x - (arena.width - margin);
    }
    if p.y < margin {
        steer.y += margin - p.y;
    } else if p.y > arena.height - margin {
        steer.y -= p.y - (arena.height - margin);
    }

    steer * enemy.weights.avoidance
}

/// Pushes away from enemies closer than their combined radii plus a gap.
#[must_use]
pub fn separate(enemies: &[Enemy], index: usize) -> Vec2 {
    let enemy = &enemies[index];
    let mut steer = Vec2::ZERO;

    for (i, other) in enemies.iter().enumerate() {
        if i == index {
            continue;
        }
        let diff = enemy.position - other.position;
        let distance = diff.length();
        let min_distance = enemy.radius + other.radius + SEPARATION_GAP;
        if distance > 0.0 && distance < min_distance {
            steer += diff / distance * (min_distance - distance);
        }
    }

    steer * enemy.weights.separation
}

/// Seeks the centroid of other enemies within `radius`.
#[must_use]
pub fn cohesion(enemies: &[Enemy], index: usize, radius: f32) -> Vec2 {
    let enemy = &enemies[index];
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;

    for (i, other) in enemies.iter().enumerate() {
        if i != index && enemy.position.distance(other.position) <= radius {
            sum += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }
    seek(enemy.position, sum / count as f32, enemy.max_speed)
}

/// Gentle pull toward the arena centre.
#[must_use]
pub fn center_bias(position: Vec2, arena: &ArenaBounds, strength: f32) -> Vec2 {
    seek(position, arena.center(), strength)
}

/// Checks whether any obstacle touches the segment `from..to`.
#[must_use]
pub fn line_blocked(from: Vec2, to: Vec2, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| segment_hits_circle(from, to, o.circle()))
}

/// Checks whether the player has a clear line of sight to `position`.
#[must_use]
pub fn visible_to_player(position: Vec2, player: &Player, obstacles: &[Obstacle]) -> bool {
    !line_blocked(player.position, position, obstacles)
}

/// Nearest spot directly behind an obstacle as seen from the player.
///
/// Obstacles sharing the player's centre are skipped.
#[must_use]
pub fn hide_spot(enemy: &Enemy, player: &Player, obstacles: &[Obstacle]) -> Option<Vec2> {
    obstacles
        .iter()
        .filter_map(|obstacle| {
            let direction = (obstacle.position - player.position).normalize_or_zero();
            if direction == Vec2::ZERO {
                return None;
            }
            let offset = obstacle.radius + enemy.radius + enemy.weights.hide_distance;
            Some(obstacle.position + direction * offset)
        })
        .min_by(|a, b| {
            a.distance_squared(enemy.position)
                .total_cmp(&b.distance_squared(enemy.position))
        })
}

/// Seeks the best hide spot, or flees the player when there is none.
#[must_use]
pub fn hide_from_player(enemy: &Enemy, player: &Player, obstacles: &[Obstacle]) -> Vec2 {
    match hide_spot(enemy, player, obstacles) {
        Some(spot) => seek(enemy.position, spot, enemy.max_speed),
        None => flee(enemy.position, player.position, enemy.max_speed),
    }
}

/// Base roaming blend shared by hiding enemies.
///
/// Returns the composed vector and the raw wander force.
pub fn roam(
    input: &SteeringInput<'_>,
    wander_state: &mut Wander,
    dt: f32,
    rng: &mut fastrand::Rng,
) -> (Vec2, Vec2) {
    let enemy = input.enemy();
    let wander_force = wander(wander_state, dt, rng);
    let avoid = avoid_obstacles(enemy, input.obstacles, input.arena);
    let avoid_multiplier = if enemy.is_bold() { 1.5 } else { 1.2 };
    let wander_scale = if avoid.length() > 5.0 { 0.5 } else { 1.0 };

    let desired = avoid * avoid_multiplier
        + cohesion(input.enemies, input.index, COHESION_RADIUS) * 0.2
        + separate(input.enemies, input.index)
        + wander_force * wander_scale
        + center_bias(enemy.position, input.arena, enemy.max_speed * 0.25);

    (desired, wander_force)
}

/// Hiding behavior: roam, and break line of sight when seen unless bold.
pub fn hide_policy(
    input: &SteeringInput<'_>,
    wander_state: &mut Wander,
    dt: f32,
    rng: &mut fastrand::Rng,
) -> Steering {
    let enemy = input.enemy();
    let (mut desired, wander_force) = roam(input, wander_state, dt, rng);

    let target_speed = if enemy.is_bold() {
        desired += enemy.heading() * enemy.max_speed * 0.5;
        enemy.attack_speed
    } else if visible_to_player(enemy.position, input.player, input.obstacles) {
        desired += flee(enemy.position, input.player.position, enemy.attack_speed)
            * enemy.weights.los_flee;
        desired += hide_from_player(enemy, input.player, input.obstacles) * enemy.weights.hide;
        desired += wander_force * 0.6;
        enemy.attack_speed
    } else {
        enemy.max_speed
    };

    Steering {
        desired,
        target_speed,
    }
}

/// Attacking behavior: charge the player while keeping spacing.
#[must_use]
pub fn attack_policy(input: &SteeringInput<'_>) -> Steering {
    let enemy = input.enemy();
    let desired = seek(enemy.position, input.player.position, enemy.attack_speed)
        + separate(input.enemies, input.index)
        + avoid_obstacles(enemy, input.obstacles, input.arena);

    Steering {
        desired,
        target_speed: enemy.attack_speed,
    }
}

/// Picks the policy for the enemy's state.
///
/// A zero result is replaced by a small forward nudge so enemies never stall.
pub fn steer(
    input: &SteeringInput<'_>,
    wander_state: &mut Wander,
    dt: f32,
    rng: &mut fastrand::Rng,
) -> Steering {
    let mut steering = match input.enemy().state {
        EnemyState::Hiding => hide_policy(input, wander_state, dt, rng),
        EnemyState::Attacking => attack_policy(input),
    };

    if steering.desired == Vec2::ZERO {
        let enemy = input.enemy();
        steering.desired = enemy.heading() * enemy.max_speed * 0.1;
    }
    steering
}
