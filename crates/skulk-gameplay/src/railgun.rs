//! Hitscan railgun.
//!
//! The beam travels from the player's nose along the facing angle, stops at
//! the first obstacle it meets, and kills every enemy it touches on the way.

use serde::{Deserialize, Serialize};
use skulk_common::{closest_point_on_segment, direction_from_angle, Circle, ConfigError, EnemyId, Vec2};
use tracing::debug;

use crate::arena::Obstacle;
use crate::enemy::Enemy;
use crate::player::Player;

/// Railgun tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailgunConfig {
    /// Unobstructed beam length
    pub beam_length: f32,
    /// Seconds the last beam stays visible
    pub beam_time: f32,
}

impl Default for RailgunConfig {
    fn default() -> Self {
        Self {
            beam_length: 1200.0,
            beam_time: 0.1,
        }
    }
}

impl RailgunConfig {
    /// Validates the tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::ensure_positive("railgun.beam_length", self.beam_length)?;
        ConfigError::ensure_positive("railgun.beam_time", self.beam_time)
    }
}

/// A fired beam segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Where the beam left the barrel
    pub start: Vec2,
    /// Where it stopped
    pub end: Vec2,
}

impl Beam {
    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// The player's weapon.
#[derive(Debug, Clone, Default)]
pub struct Railgun {
    config: RailgunConfig,
    last_beam: Option<Beam>,
    beam_timer: f32,
}

impl Railgun {
    /// Creates an unfired railgun.
    #[must_use]
    pub fn new(config: RailgunConfig) -> Self {
        Self {
            config,
            last_beam: None,
            beam_timer: 0.0,
        }
    }

    /// Returns the tuning in use.
    #[must_use]
    pub const fn config(&self) -> &RailgunConfig {
        &self.config
    }

    /// Fires from the player's tip along its facing.
    ///
    /// Returns the IDs of every enemy the beam touched.
    pub fn fire(&mut self, player: &Player, enemies: &[Enemy], obstacles: &[Obstacle]) -> Vec<EnemyId> {
        self.fire_from(player.tip(), player.angle, enemies, obstacles)
    }

    /// Fires from an arbitrary origin and angle.
    pub fn fire_from(
        &mut self,
        origin: Vec2,
        angle: f32,
        enemies: &[Enemy],
        obstacles: &[Obstacle],
    ) -> Vec<EnemyId> {
        let raw_end = origin + direction_from_angle(angle) * self.config.beam_length;
        let end = beam_end(origin, raw_end, obstacles);

        self.last_beam = Some(Beam { start: origin, end });
        self.beam_timer = self.config.beam_time;

        let killed: Vec<EnemyId> = enemies
            .iter()
            .filter(|e| beam_hits(origin, end, e.circle()))
            .map(|e| e.id)
            .collect();

        debug!(
            "Beam ({:.1}, {:.1}) -> ({:.1}, {:.1}) hit {} enemies",
            origin.x,
            origin.y,
            end.x,
            end.y,
            killed.len()
        );
        killed
    }

    /// Counts down the beam visibility timer.
    pub fn update(&mut self, dt: f32) {
        if self.beam_timer > 0.0 {
            self.beam_timer = (self.beam_timer - dt).max(0.0);
        }
    }

    /// The last beam, while it is still visible.
    #[must_use]
    pub fn visible_beam(&self) -> Option<Beam> {
        if self.beam_timer > 0.0 {
            self.last_beam
        } else {
            None
        }
    }

    /// The last beam fired, visible or not.
    #[must_use]
    pub const fn last_beam(&self) -> Option<Beam> {
        self.last_beam
    }
}

/// First point at or ahead of `start` where the segment `start..end` meets
/// the circle's boundary.
///
/// A segment starting inside the circle reports its exit point.
#[must_use]
pub fn ray_circle_entry(start: Vec2, end: Vec2, circle: Circle) -> Option<Vec2> {
    let length = start.distance(end);
    let direction = (end - start).normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }

    // Unit direction, so the quadratic's leading coefficient is 1.
    let f = start - circle.center;
    let b = 2.0 * f.dot(direction);
    let c = f.length_squared() - circle.radius * circle.radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    [(-b - root) * 0.5, (-b + root) * 0.5]
        .into_iter()
        .filter(|t| (0.0..=length).contains(t))
        .reduce(f32::min)
        .map(|t| start + direction * t)
}

/// Shortens `start..raw_end` to the nearest obstacle hit.
#[must_use]
pub fn beam_end(start: Vec2, raw_end: Vec2, obstacles: &[Obstacle]) -> Vec2 {
    obstacles
        .iter()
        .filter_map(|o| ray_circle_entry(start, raw_end, o.circle()))
        .min_by(|a, b| a.distance_squared(start).total_cmp(&b.distance_squared(start)))
        .unwrap_or(raw_end)
}

/// Checks whether the beam segment touches `circle`.
///
/// Zero-length beams hit nothing.
#[must_use]
pub fn beam_hits(start: Vec2, end: Vec2, circle: Circle) -> bool {
    if start == end {
        return false;
    }
    closest_point_on_segment(start, end, circle.center).distance(circle.center) <= circle.radius
}
