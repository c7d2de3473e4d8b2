//! Enemies walking the path towards the goal.

use yasashi_tower_core::{EnemyId, EnemySnapshot, EnemyStats, EnemyStatus, PathModel, Vec2};

/// Enemy owned by the world while it is on the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    wave: u32,
    position: Vec2,
    path_index: usize,
    health: i32,
    max_health: u32,
    speed: f32,
    reward: u32,
    status: EnemyStatus,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint of `path`.
    #[must_use]
    pub fn spawn(id: EnemyId, wave: u32, path: &PathModel, stats: &EnemyStats) -> Self {
        Self {
            id,
            wave,
            position: path.start(),
            path_index: 0,
            health: i32::try_from(stats.max_health).unwrap_or(i32::MAX),
            max_health: stats.max_health,
            speed: stats.speed,
            reward: stats.reward,
            status: EnemyStatus::Alive,
        }
    }

    /// Moves the enemy `delta` units along `path`.
    ///
    /// When the next waypoint is closer than `delta` the enemy lands exactly on
    /// it and the excess is discarded. Landing on the final waypoint marks the
    /// enemy [`EnemyStatus::ReachedGoal`]. Non-positive deltas and enemies that
    /// are no longer alive are left untouched.
    pub fn advance(&mut self, path: &PathModel, delta: f32) {
        if !self.is_alive() || !(delta > 0.0) {
            return;
        }

        let next_index = self.path_index + 1;
        debug_assert!(
            next_index < path.len(),
            "alive enemy {:?} has no waypoint ahead",
            self.id
        );
        let Ok(next) = path.waypoint_at(next_index) else {
            return;
        };

        let remaining = self.position.distance(next);
        if remaining < delta {
            self.position = next;
            self.path_index = next_index;
            if next_index + 1 == path.len() {
                self.status = EnemyStatus::ReachedGoal;
            }
            return;
        }

        let direction = (next - self.position).normalize_or_zero();
        self.position += direction * delta;
    }

    /// Subtracts `amount` from the enemy's health.
    ///
    /// Health is not clamped; the first hit that takes it to zero or below
    /// marks the enemy [`EnemyStatus::Defeated`].
    pub fn apply_damage(&mut self, amount: u32) {
        if !self.is_alive() {
            return;
        }

        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.status = EnemyStatus::Defeated;
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Wave that spawned the enemy.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Current location.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Index of the last waypoint reached.
    #[must_use]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Remaining health, possibly negative.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Distance covered per second of simulated time.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Score granted when the enemy is defeated.
    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Lifecycle state.
    #[must_use]
    pub fn status(&self) -> EnemyStatus {
        self.status
    }

    /// Returns `true` while the enemy may move and be targeted.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive
    }

    /// Remaining health as a fraction of the spawn health, within `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }

        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Captures the enemy for queries.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            wave: self.wave,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
            health_fraction: self.health_fraction(),
            status: self.status,
        }
    }
}
