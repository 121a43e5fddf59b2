//! Run lifecycle.
//!
//! Headless frame loop: build the simulation, feed it the pilot's input at a
//! fixed timestep, and summarize the run.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use skulk_gameplay::{FrameOutcome, SimEvent, Simulation};
use std::time::Instant;
use tracing::{debug, info};

use crate::autopilot::Autopilot;
use crate::config::EngineConfig;
use crate::timing::FixedStep;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    /// Every enemy was eliminated
    Victory,
    /// An enemy reached the player
    Defeat,
    /// The frame cap was reached first
    Timeout,
}

impl From<FrameOutcome> for RunResult {
    fn from(outcome: FrameOutcome) -> Self {
        match outcome {
            FrameOutcome::Victory => Self::Victory,
            FrameOutcome::Defeat => Self::Defeat,
            FrameOutcome::Running => Self::Timeout,
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Seed the run used
    pub seed: u64,
    /// How the run ended
    pub result: RunResult,
    /// Driver frames processed
    pub frames: u64,
    /// Fixed simulation steps taken
    pub steps: u64,
    /// Simulated seconds
    pub simulated_seconds: f32,
    /// Enemies at the start
    pub enemies_spawned: usize,
    /// Enemies still alive
    pub enemies_remaining: usize,
    /// Railgun shots fired
    pub shots: u32,
    /// Enemies killed
    pub kills: u32,
    /// Attack clusters promoted
    pub clusters_promoted: u32,
    /// Attackers sent back to hiding
    pub demotions: u32,
    /// Whether the final stand triggered
    pub final_stand: bool,
    /// Wall-clock duration in milliseconds
    pub wall_ms: u128,
}

/// Event tallies gathered while running.
#[derive(Debug, Default)]
struct EventTally {
    clusters_promoted: u32,
    demotions: u32,
    final_stand: bool,
}

impl EventTally {
    fn record(&mut self, events: Vec<SimEvent>) {
        for event in events {
            debug!("{event:?}");
            match event {
                SimEvent::ClusterPromoted { .. } => self.clusters_promoted += 1,
                SimEvent::EnemyDemoted { .. } => self.demotions += 1,
                SimEvent::FinalStand { .. } => self.final_stand = true,
                _ => {},
            }
        }
    }
}

/// Runs the simulation until it ends or the frame cap is hit.
pub fn run(config: &EngineConfig) -> Result<RunReport> {
    let started = Instant::now();
    let seed = config.resolved_seed();

    let mut sim = Simulation::new(config.simulation.clone(), seed)?;
    let mut pilot = Autopilot::new(config.autopilot);
    let mut timing = FixedStep::new(config.fixed_hz);
    let frame_dt = 1.0 / config.frame_rate.max(1) as f32;
    let enemies_spawned = sim.enemies().len();
    let mut tally = EventTally::default();

    info!(
        "Running seed {} with {} enemies at {} Hz",
        seed, enemies_spawned, config.fixed_hz
    );

    let mut frames = 0;
    let mut outcome = FrameOutcome::Running;
    'frames: while frames < config.max_frames {
        frames += 1;
        for _ in 0..timing.accumulate(frame_dt) {
            let input = pilot.plan(&sim, timing.fixed_dt());
            outcome = sim.tick(timing.fixed_dt(), &input);
            tally.record(sim.drain_events());
            if outcome.is_terminal() {
                break 'frames;
            }
        }
    }

    let result = RunResult::from(outcome);
    info!(
        "Run finished: {:?} after {} frames ({} kills, {} shots)",
        result,
        frames,
        sim.kills(),
        sim.shots()
    );

    Ok(RunReport {
        seed,
        result,
        frames,
        steps: timing.steps(),
        simulated_seconds: sim.elapsed(),
        enemies_spawned,
        enemies_remaining: sim.enemies().len(),
        shots: sim.shots(),
        kills: sim.kills(),
        clusters_promoted: tally.clusters_promoted,
        demotions: tally.demotions,
        final_stand: tally.final_stand,
        wall_ms: started.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> EngineConfig {
        EngineConfig {
            seed: Some(seed),
            max_frames: 600,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_run_is_reproducible() {
        let mut a = run(&seeded(17)).expect("run succeeds");
        let mut b = run(&seeded(17)).expect("run succeeds");
        a.wall_ms = 0;
        b.wall_ms = 0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_is_consistent() {
        let report = run(&seeded(5)).expect("run succeeds");
        assert_eq!(report.seed, 5);
        assert!(report.frames <= 600);
        assert_eq!(report.enemies_spawned, 5);
        assert_eq!(
            report.enemies_remaining + report.kills as usize,
            report.enemies_spawned
        );
        if report.result == RunResult::Victory {
            assert_eq!(report.enemies_remaining, 0);
        }
        if report.result == RunResult::Timeout {
            assert_eq!(report.frames, 600);
        }
    }

    #[test]
    fn test_empty_arena_wins_immediately() {
        let mut config = seeded(1);
        config.simulation.enemy_count = 0;

        let report = run(&config).expect("run succeeds");
        assert_eq!(report.result, RunResult::Victory);
        assert_eq!(report.steps, 1);
    }

    #[test]
    fn test_invalid_simulation_is_an_error() {
        let mut config = seeded(1);
        config.simulation.aggression.max_attackers = 0;
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let mut config = seeded(2);
        config.max_frames = 5;
        let report = run(&config).expect("run succeeds");
        let json = serde_json::to_string(&report).expect("serializes");
        assert!(json.contains("\"result\""));
        assert!(json.contains("\"kills\""));
    }
}
