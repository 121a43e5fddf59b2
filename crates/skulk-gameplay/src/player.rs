//! Player body, facing and weapon cooldown.
//!
//! Input polling lives outside the core; drivers translate whatever they
//! read into a movement direction and an aim point and call
//! [`Player::apply_input`].

use serde::{Deserialize, Serialize};
use skulk_common::{direction_from_angle, Circle, ConfigError, Vec2};

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Body radius
    pub radius: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Minimum seconds between railgun shots
    pub fire_interval: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 25.0,
            speed: 250.0,
            fire_interval: 0.25,
        }
    }
}

impl PlayerConfig {
    /// Validates the player tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::ensure_positive("player.radius", self.radius)?;
        ConfigError::ensure_positive("player.speed", self.speed)?;
        if !self.fire_interval.is_finite() || self.fire_interval < 0.0 {
            return Err(ConfigError::NotPositive {
                name: "player.fire_interval",
                value: self.fire_interval,
            });
        }
        Ok(())
    }
}

/// The player-controlled ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub position: Vec2,
    /// Facing angle in radians
    pub angle: f32,
    /// Body radius
    pub radius: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Minimum seconds between shots
    pub fire_interval: f32,
    /// Seconds until the weapon may fire again
    pub weapon_cooldown: f32,
}

impl Player {
    /// Creates a player at `position` facing +x.
    #[must_use]
    pub fn new(position: Vec2, config: &PlayerConfig) -> Self {
        Self {
            position,
            angle: 0.0,
            radius: config.radius,
            speed: config.speed,
            fire_interval: config.fire_interval,
            weapon_cooldown: 0.0,
        }
    }

    /// Returns the body circle.
    #[must_use]
    pub const fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Unit vector along the facing angle.
    #[must_use]
    pub fn facing(&self) -> Vec2 {
        direction_from_angle(self.angle)
    }

    /// Nose of the ship, where the beam starts.
    #[must_use]
    pub fn tip(&self) -> Vec2 {
        self.position + self.facing() * self.radius
    }

    /// Turns the player to face `point`. Leaves the angle alone if the point
    /// is the player's own position.
    pub fn face_towards(&mut self, point: Vec2) {
        let to_point = point - self.position;
        if to_point != Vec2::ZERO {
            self.angle = to_point.y.atan2(to_point.x);
        }
    }

    /// Moves along `direction` (normalized here) and faces `aim`.
    pub fn apply_input(&mut self, direction: Vec2, aim: Vec2, dt: f32) {
        self.position += direction.normalize_or_zero() * self.speed * dt;
        self.face_towards(aim);
    }

    /// Advances the weapon cooldown.
    pub fn tick(&mut self, dt: f32) {
        self.weapon_cooldown = (self.weapon_cooldown - dt).max(0.0);
    }

    /// Checks whether the weapon is ready.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.weapon_cooldown <= 0.0
    }

    /// Consumes the trigger if the weapon is ready.
    ///
    /// Returns `true` when a shot should be fired this frame.
    pub fn try_trigger(&mut self) -> bool {
        if self.can_fire() {
            self.weapon_cooldown = self.fire_interval;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), &PlayerConfig::default())
    }

    #[test]
    fn test_tip_follows_facing() {
        let mut player = test_player();
        assert_eq!(player.tip(), Vec2::new(125.0, 100.0));

        player.face_towards(Vec2::new(100.0, 300.0));
        let tip = player.tip();
        assert!((tip - Vec2::new(100.0, 125.0)).length() < 0.001);
    }

    #[test]
    fn test_apply_input_normalizes_direction() {
        let mut player = test_player();
        player.apply_input(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0), 0.1);

        let moved = player.position - Vec2::new(100.0, 100.0);
        assert!((moved.length() - 25.0).abs() < 0.001);
        assert!(player.angle < 0.0);
    }

    #[test]
    fn test_face_own_position_keeps_angle() {
        let mut player = test_player();
        player.angle = 1.0;
        player.face_towards(player.position);
        assert!((player.angle - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_weapon_cooldown() {
        let mut player = test_player();
        assert!(player.try_trigger());
        assert!(!player.try_trigger());

        player.tick(0.1);
        assert!(!player.can_fire());

        player.tick(0.2);
        assert!(player.can_fire());
        assert!(player.try_trigger());
    }

    #[test]
    fn test_config_validation() {
        assert!(PlayerConfig::default().validate().is_ok());

        let bad = PlayerConfig {
            speed: -1.0,
            ..PlayerConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
