//! Motion integration and penetration resolution.
//!
//! Enemies are stepped one at a time in list order. Each step reads the
//! current state of every other enemy, including those already moved this
//! frame, and pushes overlapping neighbours in place.

use skulk_common::{Circle, Vec2};
use tracing::debug;

use crate::arena::{ArenaBounds, Obstacle};
use crate::enemy::{BoldTransition, Enemy, EnemyTuning};
use crate::player::Player;
use crate::steering::{steer, SteeringInput};

/// Weight of the previous velocity when blending in the desired one.
const VELOCITY_RETAIN: f32 = 0.6;
/// Fraction of the target speed used when bouncing off obstacles and walls.
const BOUNCE_FACTOR: f32 = 0.8;

/// Overlap depth and push axis for `body` against `other`.
///
/// Coincident centres use `fallback` as the axis.
fn overlap(body: Circle, other: Circle, fallback: Vec2) -> Option<(f32, Vec2)> {
    if let Some(hit) = body.penetration(&other) {
        return Some(hit);
    }
    let distance = body.center.distance(other.center);
    let min_distance = body.radius + other.radius;
    (distance <= f32::EPSILON && distance < min_distance).then(|| (min_distance - distance, fallback))
}

/// Mutable references to two distinct elements.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Advances one enemy by `dt`.
///
/// Ticks boldness, steers, integrates, then resolves obstacle, enemy and
/// arena penetration. Returns the boldness change, if any.
pub fn step_enemy(
    enemies: &mut [Enemy],
    index: usize,
    dt: f32,
    arena: &ArenaBounds,
    obstacles: &[Obstacle],
    player: &Player,
    tuning: &EnemyTuning,
    rng: &mut fastrand::Rng,
) -> Option<BoldTransition> {
    let transition = enemies[index].boldness.tick(dt, tuning, rng);
    if let Some(change) = transition {
        debug!("{} {:?}", enemies[index].id, change);
    }

    let mut wander = enemies[index].wander;
    let steering = {
        let input = SteeringInput {
            enemies: &*enemies,
            index,
            obstacles,
            arena,
            player,
        };
        steer(&input, &mut wander, dt, rng)
    };
    let target = steering.target_speed;

    let enemy = &mut enemies[index];
    enemy.wander = wander;
    let desired = steering.desired.clamp_length_max(target);
    enemy.velocity =
        (enemy.velocity * VELOCITY_RETAIN + desired * (1.0 - VELOCITY_RETAIN)).clamp_length_max(target);
    enemy.position += enemy.velocity * dt;

    push_out_of_obstacles(enemy, obstacles, target);
    separate_from_enemies(enemies, index);
    bounce_off_walls(&mut enemies[index], arena, target);

    transition
}

fn push_out_of_obstacles(enemy: &mut Enemy, obstacles: &[Obstacle], target: f32) {
    for obstacle in obstacles {
        if let Some((depth, direction)) = overlap(enemy.circle(), obstacle.circle(), enemy.heading()) {
            enemy.position += direction * depth;
            let speed = enemy.velocity.length().max(target * BOUNCE_FACTOR);
            enemy.velocity = direction * speed;
        }
    }
}

fn separate_from_enemies(enemies: &mut [Enemy], index: usize) {
    for other in 0..enemies.len() {
        if other == index {
            continue;
        }
        let (enemy, neighbour) = pair_mut(enemies, index, other);
        if let Some((depth, direction)) = overlap(enemy.circle(), neighbour.circle(), enemy.heading()) {
            let half = direction * depth * 0.5;
            enemy.position += half;
            neighbour.position -= half;
        }
    }
}

fn bounce_off_walls(enemy: &mut Enemy, arena: &ArenaBounds, target: f32) {
    let r = enemy.radius;
    let bounce = target * BOUNCE_FACTOR;

    if enemy.position.x < r {
        enemy.position.x = r;
        enemy.velocity.x = bounce;
    } else if enemy.position.x > arena.width - r {
        enemy.position.x = arena.width - r;
        enemy.velocity.x = -bounce;
    }
    if enemy.position.y < r {
        enemy.position.y = r;
        enemy.velocity.y = bounce;
    } else if enemy.position.y > arena.height - r {
        enemy.position.y = arena.height - r;
        enemy.velocity.y = -bounce;
    }

    enemy.velocity = enemy.velocity.clamp_length_max(target);
}

/// Keeps the player's body inside the arena.
pub fn clamp_player_to_arena(player: &mut Player, arena: &ArenaBounds) {
    player.position = arena.clamp_center(player.position, player.radius);
}

/// Pushes the player out of obstacles and enemies in a single pass.
///
/// Returns `true` if any enemy touched the player.
pub fn resolve_player_collisions(player: &mut Player, obstacles: &[Obstacle], enemies: &[Enemy]) -> bool {
    let fallback = player.facing();

    for obstacle in obstacles {
        if let Some((depth, direction)) = overlap(player.circle(), obstacle.circle(), fallback) {
            player.position += direction * depth;
        }
    }

    let mut caught = false;
    for enemy in enemies {
        if let Some((depth, direction)) = overlap(player.circle(), enemy.circle(), fallback) {
            player.position += direction * depth;
            caught = true;
        }
    }
    caught
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerConfig;
    use proptest::prelude::*;
    use skulk_common::{ClusterId, EnemyId};

    fn enemy_at(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(EnemyId::new(id), Vec2::new(x, y), 12.0, 100.0)
    }

    fn far_player() -> Player {
        Player::new(Vec2::new(1100.0, 700.0), &PlayerConfig::default())
    }

    #[test]
    fn test_overlap_fallback_axis() {
        let a = Circle::new(Vec2::new(5.0, 5.0), 10.0);
        let (depth, direction) = overlap(a, a, Vec2::Y).expect("coincident circles overlap");
        assert!((depth - 20.0).abs() < 0.001);
        assert_eq!(direction, Vec2::Y);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut items = [1, 2, 3, 4];
        {
            let (a, b) = pair_mut(&mut items, 0, 3);
            std::mem::swap(a, b);
        }
        assert_eq!(items, [4, 2, 3, 1]);

        let (a, b) = pair_mut(&mut items, 2, 1);
        assert_eq!((*a, *b), (3, 2));
    }

    #[test]
    fn test_step_moves_toward_player_when_attacking() {
        let arena = ArenaBounds::default();
        let player = Player::new(Vec2::new(600.0, 400.0), &PlayerConfig::default());
        let mut enemies = vec![enemy_at(0, 300.0, 400.0)];
        enemies[0].promote(ClusterId::from_raw(1));
        let mut rng = fastrand::Rng::with_seed(1);

        step_enemy(&mut enemies, 0, 0.1, &arena, &[], &player, &EnemyTuning::default(), &mut rng);

        // 0.6 * 0 + 0.4 * 120 along +x.
        assert!((enemies[0].velocity - Vec2::new(48.0, 0.0)).length() < 0.001);
        assert!((enemies[0].position - Vec2::new(304.8, 400.0)).length() < 0.001);
    }

    #[test]
    fn test_obstacle_push_and_bounce() {
        let arena = ArenaBounds::default();
        let obstacle = Obstacle::new(500.0, 400.0, 40.0);
        let mut enemies = vec![enemy_at(0, 540.0, 400.0)];
        enemies[0].promote(ClusterId::from_raw(1));
        let mut rng = fastrand::Rng::with_seed(2);

        step_enemy(&mut enemies, 0, 0.016, &arena, &[obstacle], &far_player(), &EnemyTuning::default(), &mut rng);

        let enemy = &enemies[0];
        assert!(!enemy.circle().overlaps(&obstacle.circle()));
        assert!(enemy.velocity.length() >= enemy.attack_speed * BOUNCE_FACTOR - 0.001);
        assert!(enemy.velocity.length() <= enemy.attack_speed + 0.001);
    }

    #[test]
    fn test_enemy_push_split_evenly() {
        let arena = ArenaBounds::default();
        let mut enemies = vec![enemy_at(0, 400.0, 400.0), enemy_at(1, 410.0, 400.0)];
        let mut rng = fastrand::Rng::with_seed(3);

        separate_from_enemies(&mut enemies, 0);
        assert!((enemies[0].position.x - 393.0).abs() < 0.001);
        assert!((enemies[1].position.x - 417.0).abs() < 0.001);

        step_enemy(&mut enemies, 1, 0.016, &arena, &[], &far_player(), &EnemyTuning::default(), &mut rng);
        assert!(enemies[0].position.distance(enemies[1].position) >= 24.0 - 0.01);
    }

    #[test]
    fn test_wall_bounce_points_inward() {
        let arena = ArenaBounds::default();
        let mut enemy = enemy_at(0, 5.0, 795.0);
        enemy.velocity = Vec2::new(-50.0, 50.0);

        bounce_off_walls(&mut enemy, &arena, 100.0);
        assert_eq!(enemy.position, Vec2::new(12.0, 788.0));
        assert!(enemy.velocity.x > 0.0);
        assert!(enemy.velocity.y < 0.0);
        assert!(enemy.velocity.length() <= 100.0 + 0.001);
    }

    #[test]
    fn test_player_collisions() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), &PlayerConfig::default());
        let obstacles = vec![Obstacle::new(140.0, 100.0, 20.0)];

        assert!(!resolve_player_collisions(&mut player, &obstacles, &[]));
        assert!((player.position - Vec2::new(95.0, 100.0)).length() < 0.001);

        let enemies = vec![enemy_at(0, 95.0, 130.0)];
        assert!(resolve_player_collisions(&mut player, &[], &enemies));
        assert!(!player.circle().overlaps(&enemies[0].circle()));
    }

    #[test]
    fn test_clamp_player() {
        let arena = ArenaBounds::default();
        let mut player = Player::new(Vec2::new(-40.0, 900.0), &PlayerConfig::default());
        clamp_player_to_arena(&mut player, &arena);
        assert_eq!(player.position, Vec2::new(25.0, 775.0));
    }

    proptest! {
        #[test]
        fn prop_speed_within_target(
            x in 50.0f32..1150.0,
            y in 50.0f32..750.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            attacking in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let arena = ArenaBounds::default();
            let obstacles = Obstacle::default_layout();
            let mut enemies = vec![enemy_at(0, x, y), enemy_at(1, 600.0, 600.0)];
            enemies[0].velocity = Vec2::new(vx, vy);
            if attacking {
                enemies[0].promote(ClusterId::from_raw(1));
            }
            let mut rng = fastrand::Rng::with_seed(seed);

            step_enemy(&mut enemies, 0, 1.0 / 60.0, &arena, &obstacles, &far_player(), &EnemyTuning::default(), &mut rng);

            let enemy = &enemies[0];
            prop_assert!(enemy.velocity.length() <= enemy.attack_speed + 0.01);
            prop_assert!(arena.contains_circle(enemy.circle()));
        }

        #[test]
        fn prop_no_residual_obstacle_overlap(
            angle in 0.0f32..std::f32::consts::TAU,
            depth in 0.0f32..50.0,
        ) {
            let obstacle = Obstacle::new(600.0, 400.0, 60.0);
            let offset = Vec2::new(angle.cos(), angle.sin()) * (72.0 - depth);
            let mut enemy = enemy_at(0, 600.0 + offset.x, 400.0 + offset.y);

            push_out_of_obstacles(&mut enemy, &[obstacle], 100.0);
            prop_assert!(enemy.position.distance(obstacle.position) >= 72.0 - 0.01);
        }
    }
}
