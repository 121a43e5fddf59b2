//! Cluster-triggered aggression.
//!
//! Hiding enemies that gather in a tight enough group are promoted to a
//! coordinated attack. Attackers that lose their neighbours drop back to
//! hiding. When only a handful of enemies remain, all of them attack.

use serde::{Deserialize, Serialize};
use skulk_common::{ClusterId, ClusterIdGenerator, ConfigError, EnemyId};
use tracing::debug;

use crate::enemy::Enemy;

/// Neighbours an attacker needs within the cluster radius to keep attacking.
const MIN_ATTACK_NEIGHBOURS: usize = 2;

/// Aggression tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggressionConfig {
    /// Smallest group that triggers an attack
    pub min_cluster_size: usize,
    /// Distance from the seed within which enemies join its cluster
    pub cluster_radius: f32,
    /// Maximum simultaneous attackers
    pub max_attackers: usize,
    /// At or below this many enemies, everyone attacks
    pub final_stand_threshold: usize,
}

impl Default for AggressionConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 4,
            cluster_radius: 230.0,
            max_attackers: 8,
            final_stand_threshold: 2,
        }
    }
}

impl AggressionConfig {
    /// Validates the tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::ensure_positive("aggression.cluster_radius", self.cluster_radius)?;
        if self.min_cluster_size == 0 {
            return Err(ConfigError::NotPositive {
                name: "aggression.min_cluster_size",
                value: 0.0,
            });
        }
        if self.max_attackers == 0 {
            return Err(ConfigError::NotPositive {
                name: "aggression.max_attackers",
                value: 0.0,
            });
        }
        if self.final_stand_threshold > self.max_attackers {
            return Err(ConfigError::FinalStandAboveCap {
                threshold: self.final_stand_threshold,
                max_attackers: self.max_attackers,
            });
        }
        Ok(())
    }
}

/// What changed during one [`AggressionManager::advance`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggressionReport {
    /// Newly promoted clusters and their members, seed first
    pub promoted: Vec<(ClusterId, Vec<EnemyId>)>,
    /// Attackers sent back to hiding
    pub demoted: Vec<EnemyId>,
    /// Whether the final-stand override was in effect
    pub final_stand: bool,
}

impl AggressionReport {
    /// Checks whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.promoted.is_empty() && self.demoted.is_empty()
    }
}

/// Promotes and demotes attack clusters once per frame.
#[derive(Debug, Clone, Default)]
pub struct AggressionManager {
    config: AggressionConfig,
    ids: ClusterIdGenerator,
}

impl AggressionManager {
    /// Creates a manager with its own cluster ID sequence.
    #[must_use]
    pub fn new(config: AggressionConfig) -> Self {
        Self {
            config,
            ids: ClusterIdGenerator::new(),
        }
    }

    /// Returns the tuning in use.
    #[must_use]
    pub const fn config(&self) -> &AggressionConfig {
        &self.config
    }

    /// Runs cluster formation and the demotion sweep.
    pub fn advance(&mut self, enemies: &mut [Enemy]) -> AggressionReport {
        if enemies.len() <= self.config.final_stand_threshold {
            return Self::final_stand(enemies);
        }

        let mut report = AggressionReport::default();
        self.form_clusters(enemies, &mut report);
        self.demote_isolated(enemies, &mut report);
        report
    }

    fn final_stand(enemies: &mut [Enemy]) -> AggressionReport {
        let joined: Vec<EnemyId> = enemies
            .iter_mut()
            .filter(|e| e.cluster != Some(ClusterId::FINAL_STAND))
            .map(|e| {
                e.promote(ClusterId::FINAL_STAND);
                e.id
            })
            .collect();

        let mut report = AggressionReport {
            final_stand: true,
            ..AggressionReport::default()
        };
        if !joined.is_empty() {
            debug!("Final stand: {} enemies attack", joined.len());
            report.promoted.push((ClusterId::FINAL_STAND, joined));
        }
        report
    }

    fn form_clusters(&mut self, enemies: &mut [Enemy], report: &mut AggressionReport) {
        let radius = self.config.cluster_radius;
        let mut visited = vec![false; enemies.len()];
        let mut attackers = enemies.iter().filter(|e| e.is_attacking()).count();

        for seed in 0..enemies.len() {
            if visited[seed] || enemies[seed].is_attacking() {
                continue;
            }

            let origin = enemies[seed].position;
            let mut cluster = vec![seed];
            cluster.extend((0..enemies.len()).filter(|&j| {
                j != seed
                    && !visited[j]
                    && !enemies[j].is_attacking()
                    && enemies[j].position.distance(origin) <= radius
            }));

            let room = self.config.max_attackers.saturating_sub(attackers);
            let take = if cluster.len() >= self.config.min_cluster_size {
                cluster.len().min(room)
            } else {
                0
            };

            if take > 0 {
                let id = self.ids.next_id();
                let members: Vec<EnemyId> = cluster[..take]
                    .iter()
                    .map(|&i| {
                        enemies[i].promote(id);
                        enemies[i].id
                    })
                    .collect();
                attackers += take;
                debug!("Promoted {} with {} members", id, members.len());
                report.promoted.push((id, members));
            }

            for i in cluster {
                visited[i] = true;
            }
        }
    }

    fn demote_isolated(&self, enemies: &mut [Enemy], report: &mut AggressionReport) {
        let radius = self.config.cluster_radius;

        for i in 0..enemies.len() {
            if !enemies[i].is_attacking() {
                continue;
            }
            let position = enemies[i].position;
            let neighbours = enemies
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && other.position.distance(position) <= radius)
                .count();

            if neighbours < MIN_ATTACK_NEIGHBOURS {
                enemies[i].demote();
                debug!("Demoted {} ({} neighbours)", enemies[i].id, neighbours);
                report.demoted.push(enemies[i].id);
            }
        }
    }
}
