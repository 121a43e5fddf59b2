//! Scripted player for headless runs.
//!
//! Circles the arena centre, backs away from attackers that get too close,
//! and shoots the nearest enemy it can see.

use serde::{Deserialize, Serialize};
use skulk_common::Vec2;
use skulk_gameplay::steering::line_blocked;
use skulk_gameplay::{Enemy, PlayerInput, Simulation};

/// Pilot tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Radius of the patrol circle around the arena centre
    pub orbit_radius: f32,
    /// Angular speed along the patrol circle (radians per second)
    pub orbit_speed: f32,
    /// Attackers closer than this are evaded
    pub evade_radius: f32,
    /// Whether the pilot pulls the trigger
    pub fire: bool,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 150.0,
            orbit_speed: 0.6,
            evade_radius: 140.0,
            fire: true,
        }
    }
}

/// Turns the simulation state into player input each step.
#[derive(Debug, Clone)]
pub struct Autopilot {
    config: AutopilotConfig,
    phase: f32,
}

impl Autopilot {
    /// Creates a pilot at the start of its patrol circle.
    #[must_use]
    pub const fn new(config: AutopilotConfig) -> Self {
        Self { config, phase: 0.0 }
    }

    /// Decides this step's input.
    pub fn plan(&mut self, sim: &Simulation, dt: f32) -> PlayerInput {
        self.phase += self.config.orbit_speed * dt;

        let player = sim.player();
        let waypoint =
            sim.arena().center() + Vec2::new(self.phase.cos(), self.phase.sin()) * self.config.orbit_radius;

        let threat = sim
            .enemies()
            .iter()
            .filter(|e| e.is_attacking())
            .map(|e| (e, e.position.distance(player.position)))
            .filter(|&(_, d)| d < self.config.evade_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let movement = match threat {
            Some((enemy, _)) => player.position - enemy.position,
            None if waypoint.distance(player.position) > 5.0 => waypoint - player.position,
            None => Vec2::ZERO,
        };

        let tip = player.tip();
        let visible = nearest(sim.enemies(), player.position, |e| {
            !line_blocked(tip, e.position, sim.obstacles())
        });

        match visible {
            Some(target) => PlayerInput {
                movement,
                aim: target.position,
                trigger: self.config.fire && player.can_fire() && lined_up(sim, target),
            },
            None => PlayerInput {
                movement,
                aim: nearest(sim.enemies(), player.position, |_| true)
                    .map_or(waypoint, |e| e.position),
                trigger: false,
            },
        }
    }
}

/// Checks that the beam along the current facing would touch `target`.
fn lined_up(sim: &Simulation, target: &Enemy) -> bool {
    let player = sim.player();
    let facing = player.facing();
    let to_target = target.position - player.tip();
    let along = to_target.dot(facing);
    along > 0.0 && (to_target - facing * along).length() <= target.radius
}

fn nearest<'a>(
    enemies: &'a [Enemy],
    from: Vec2,
    accept: impl Fn(&Enemy) -> bool,
) -> Option<&'a Enemy> {
    enemies
        .iter()
        .filter(|e| accept(e))
        .min_by(|a, b| {
            a.position
                .distance_squared(from)
                .total_cmp(&b.position.distance_squared(from))
        })
}
