//! Authoritative tower state and the attack cycle.

use std::time::Duration;

use yasashi_tower_core::{EnemyId, TowerId, TowerSnapshot, TowerStats, TowerUpgrade, Vec2};
use yasashi_tower_system_tower_targeting::{select_target, TargetCandidate};

use crate::enemies::Enemy;

/// Stationary tower admitted by a validated placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    position: Vec2,
    range: f32,
    damage: u32,
    attack_rate: f32,
    cooldown: Duration,
    active: bool,
}

/// Hit landed by a tower during [`Tower::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attack {
    /// Enemy that was hit.
    pub enemy: EnemyId,
    /// Damage that was applied.
    pub damage: u32,
}

impl Tower {
    /// Creates an active tower that may fire immediately.
    #[must_use]
    pub fn new(id: TowerId, position: Vec2, stats: &TowerStats) -> Self {
        Self {
            id,
            position,
            range: stats.range,
            damage: stats.damage,
            attack_rate: stats.attack_rate,
            cooldown: Duration::ZERO,
            active: true,
        }
    }

    /// Runs one step of the attack cycle over `enemies`.
    ///
    /// The cooldown drains by `dt`. Once it is exhausted the nearest alive
    /// enemy within range is hit and the cooldown restarts at
    /// `1 / attack_rate` seconds. A non-positive attack rate never fires.
    pub fn tick(&mut self, dt: Duration, enemies: &mut [Enemy]) -> Option<Attack> {
        if !self.active {
            return None;
        }

        self.cooldown = self.cooldown.saturating_sub(dt);
        if !self.cooldown.is_zero() || !(self.attack_rate > 0.0) {
            return None;
        }

        let candidates = enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| TargetCandidate::new(enemy.id(), enemy.position()));
        let target = select_target(self.position, self.range, candidates)?;

        let enemy = enemies.iter_mut().find(|enemy| enemy.id() == target)?;
        enemy.apply_damage(self.damage);
        self.cooldown =
            Duration::try_from_secs_f32(self.attack_rate.recip()).unwrap_or(Duration::MAX);

        Some(Attack {
            enemy: target,
            damage: self.damage,
        })
    }

    /// Applies an additive upgrade; absent fields are left unchanged.
    ///
    /// Damage saturates at the bounds of `u32`; range and attack rate never
    /// drop below zero.
    pub fn upgrade(&mut self, upgrade: TowerUpgrade) {
        if let Some(damage) = upgrade.damage {
            self.damage = self.damage.saturating_add_signed(damage);
        }
        if let Some(range) = upgrade.range {
            self.range = (self.range + range).max(0.0);
        }
        if let Some(attack_rate) = upgrade.attack_rate {
            self.attack_rate = (self.attack_rate + attack_rate).max(0.0);
        }
    }

    /// Enables or disables the tower. Disabled towers keep their cooldown.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub fn id(&self) -> TowerId {
        self.id
    }

    /// Location of the tower.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Targeting radius.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Damage per attack.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// Attacks per second.
    #[must_use]
    pub fn attack_rate(&self) -> f32 {
        self.attack_rate
    }

    /// Simulated time until the next attack is possible.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether the tower takes part in combat.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Captures the tower for queries.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            range: self.range,
            damage: self.damage,
            attack_rate: self.attack_rate,
            cooldown: self.cooldown.as_secs_f32(),
            active: self.active,
        }
    }
}
