//! Arena bounds and static obstacles.

use serde::{Deserialize, Serialize};
use skulk_common::{Circle, ConfigError, Vec2};

/// Rectangular play area with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaBounds {
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl ArenaBounds {
    /// Creates validated arena bounds.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let arena = Self { width, height };
        arena.validate()?;
        Ok(arena)
    }

    /// Checks that both dimensions are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidArena {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Returns the arena centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Checks whether a circle lies entirely inside the arena.
    #[must_use]
    pub fn contains_circle(&self, circle: Circle) -> bool {
        let r = circle.radius;
        let c = circle.center;
        c.x - r >= 0.0 && c.y - r >= 0.0 && c.x + r <= self.width && c.y + r <= self.height
    }

    /// Clamps a body centre so its circle stays inside the arena.
    #[must_use]
    pub fn clamp_center(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            center.x.clamp(radius, (self.width - radius).max(radius)),
            center.y.clamp(radius, (self.height - radius).max(radius)),
        )
    }
}

/// Immovable circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre in world units
    pub position: Vec2,
    /// Radius in world units
    pub radius: f32,
}

impl Obstacle {
    /// Creates a new obstacle.
    #[must_use]
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            radius,
        }
    }

    /// Returns the obstacle footprint.
    #[must_use]
    pub const fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// The default three-pillar layout.
    #[must_use]
    pub fn default_layout() -> Vec<Self> {
        vec![
            Self::new(300.0, 300.0, 60.0),
            Self::new(800.0, 500.0, 80.0),
            Self::new(600.0, 200.0, 40.0),
        ]
    }
}
