//! End-to-end frame loop scenarios.

use skulk_common::{EnemyId, Vec2};
use skulk_gameplay::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn open_arena() -> SimulationConfig {
    SimulationConfig {
        obstacles: Vec::new(),
        enemy_count: 0,
        ..SimulationConfig::default()
    }
}

fn enemies_at(points: &[(f32, f32)]) -> Vec<Enemy> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Enemy::new(EnemyId::new(i as u32), Vec2::new(x, y), 12.0, 100.0))
        .collect()
}

fn promoted(events: &[SimEvent]) -> Vec<(skulk_common::ClusterId, Vec<EnemyId>)> {
    events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ClusterPromoted { cluster, members } => Some((*cluster, members.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_three_huddled_enemies_keep_hiding() {
    let enemies = enemies_at(&[(150.0, 150.0), (180.0, 150.0), (150.0, 180.0)]);
    let mut sim = Simulation::with_enemies(open_arena(), enemies, 1).expect("valid config");

    assert_eq!(sim.tick(DT, &PlayerInput::default()), FrameOutcome::Running);
    assert!(promoted(&sim.drain_events()).is_empty());
    assert!(sim.enemies().iter().all(|e| !e.is_attacking()));
}

#[test]
fn test_five_huddled_enemies_attack_together() {
    let enemies = enemies_at(&[
        (150.0, 150.0),
        (180.0, 150.0),
        (150.0, 180.0),
        (180.0, 180.0),
        (210.0, 165.0),
    ]);
    let mut sim = Simulation::with_enemies(open_arena(), enemies, 1).expect("valid config");

    sim.tick(DT, &PlayerInput::default());
    let clusters = promoted(&sim.drain_events());
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].1.len(), 5);

    let id = clusters[0].0;
    assert!(sim.enemies().iter().all(|e| e.cluster == Some(id)));
    assert!(sim.enemies().iter().all(|e| e.stance() == Stance::Attack));
}

#[test]
fn test_attackers_close_in_and_catch_player() {
    let enemies = enemies_at(&[
        (350.0, 400.0),
        (350.0, 430.0),
        (350.0, 370.0),
        (320.0, 400.0),
        (320.0, 430.0),
    ]);
    let mut sim = Simulation::with_enemies(open_arena(), enemies, 4).expect("valid config");
    let start = sim.enemies()[0].position.distance(sim.player().position);

    let mut outcome = FrameOutcome::Running;
    for _ in 0..600 {
        outcome = sim.tick(DT, &PlayerInput::default());
        if outcome.is_terminal() {
            break;
        }
    }

    assert_eq!(outcome, FrameOutcome::Defeat);
    assert!(start > 200.0);
}

#[test]
fn test_obstacle_shields_enemy_from_beam() {
    let config = SimulationConfig {
        obstacles: vec![Obstacle::new(800.0, 400.0, 50.0)],
        ..open_arena()
    };
    let enemies = enemies_at(&[(950.0, 400.0), (100.0, 100.0), (100.0, 700.0)]);
    let mut sim = Simulation::with_enemies(config, enemies, 2).expect("valid config");

    let input = PlayerInput {
        movement: Vec2::ZERO,
        aim: Vec2::new(1000.0, 400.0),
        trigger: true,
    };
    sim.tick(DT, &input);

    assert_eq!(sim.kills(), 0);
    assert_eq!(sim.enemies().len(), 3);
    let beam = sim.railgun().last_beam().expect("fired");
    assert!((beam.end - Vec2::new(750.0, 400.0)).length() < 0.1);
}

#[test]
fn test_clearing_the_arena_is_victory() {
    let enemies = enemies_at(&[(900.0, 400.0)]);
    let mut sim = Simulation::with_enemies(open_arena(), enemies, 9).expect("valid config");

    let input = PlayerInput {
        movement: Vec2::ZERO,
        aim: Vec2::new(900.0, 400.0),
        trigger: true,
    };
    // The lone survivor attacks under the final-stand rule and stands in the line of fire.
    assert_eq!(sim.tick(DT, &input), FrameOutcome::Victory);

    let events = sim.drain_events();
    assert!(events.contains(&SimEvent::FinalStand { remaining: 1 }));
    assert!(events.contains(&SimEvent::EnemyKilled {
        enemy: EnemyId::new(0)
    }));
    assert_eq!(events.last(), Some(&SimEvent::AllEnemiesEliminated));
}

#[test]
fn test_spawned_run_keeps_invariants() {
    let mut sim = Simulation::new(SimulationConfig::default(), 1234).expect("valid config");
    let config = AggressionConfig::default();

    for _ in 0..900 {
        let player = sim.player().position;
        let input = PlayerInput {
            movement: Vec2::new(0.0, 1.0),
            aim: player + Vec2::X,
            trigger: false,
        };
        if sim.tick(DT, &input).is_terminal() {
            break;
        }

        let attackers = sim.enemies().iter().filter(|e| e.is_attacking()).count();
        assert!(attackers <= config.max_attackers);

        let arena = *sim.arena();
        for enemy in sim.enemies() {
            // Neighbour pushes after an enemy's own step may nudge it past a wall by less than its radius.
            let p = enemy.position;
            assert!(p.x >= -enemy.radius && p.x <= arena.width + enemy.radius);
            assert!(p.y >= -enemy.radius && p.y <= arena.height + enemy.radius);
            assert!(enemy.velocity.length() <= enemy.attack_speed + 0.01);
        }
    }
}
