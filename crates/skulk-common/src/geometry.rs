//! 2D geometry shared by steering, collision and weapon code.
//!
//! Positions and velocities are [`glam::Vec2`]; bodies are circles.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// A circular body or obstacle footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre in world units
    pub center: Vec2,
    /// Radius in world units
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Checks whether a point lies inside or on the circle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }

    /// Returns overlap depth and push direction if `self` overlaps `other`.
    ///
    /// The direction points from `other` toward `self`, so adding
    /// `direction * depth` to `self.center` separates the two. Coincident
    /// centres yield `None`; callers pick their own fallback axis.
    #[must_use]
    pub fn penetration(&self, other: &Self) -> Option<(f32, Vec2)> {
        let diff = self.center - other.center;
        let distance = diff.length();
        let min_distance = self.radius + other.radius;

        if distance < min_distance && distance > f32::EPSILON {
            Some((min_distance - distance, diff / distance))
        } else {
            None
        }
    }

    /// Checks whether two circles strictly overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// Returns the point on segment `a..b` closest to `point`.
///
/// A degenerate segment (`a == b`) returns `a`.
#[must_use]
pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Checks whether segment `a..b` touches `circle`.
#[must_use]
pub fn segment_hits_circle(a: Vec2, b: Vec2, circle: Circle) -> bool {
    closest_point_on_segment(a, b, circle.center).distance(circle.center) <= circle.radius
}

/// Unit vector for an angle in radians (0 = +x, counter-clockwise toward +y).
#[must_use]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
