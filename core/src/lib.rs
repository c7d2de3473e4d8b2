#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Yasashi Tower simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for presentation
//! layers to react to. Read-only state is exposed as a [`SimulationSnapshot`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod path;

pub use config::{
    BoardConfig, ConfigError, EconomyConfig, EnemyStats, SimulationConfig, TowerStats, WaveConfig,
};
pub use glam::Vec2;
pub use path::{PathError, PathModel, Waypoint};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a tower at the provided world position.
    PlaceTower {
        /// Requested location, before snapping to the placement grid.
        at: Vec2,
    },
    /// Requests an additive upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
        /// Adjustments applied to the tower's attributes.
        upgrade: TowerUpgrade,
    },
    /// Enables or disables an existing tower.
    SetTowerActive {
        /// Identifier of the tower to toggle.
        tower: TowerId,
        /// Whether the tower should take part in combat.
        active: bool,
    },
}

/// Events broadcast by the world after processing commands.
///
/// The world never depends on these being observed; they exist so rendering
/// and UI layers can animate state changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a wave began spawning enemies.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of enemies the wave will spawn.
        enemy_count: u32,
    },
    /// Confirms that an enemy was created at the path start.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave that spawned the enemy.
        wave: u32,
        /// Location of the enemy after spawning.
        position: Vec2,
    },
    /// Reports that an enemy moved along the path.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
    },
    /// Reports that an enemy was defeated by tower fire.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Score granted for the defeat.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyReachedGoal {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape was counted.
        lives_remaining: u32,
    },
    /// Reports that a tower hit an enemy.
    TowerAttacked {
        /// Identifier of the attacking tower.
        tower: TowerId,
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the attack.
        damage: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Final location of the tower after snapping.
        position: Vec2,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Location provided in the placement request.
        requested: Vec2,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower's attributes changed.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Damage per attack after the upgrade.
        damage: u32,
        /// Targeting radius after the upgrade.
        range: f32,
        /// Attacks per second after the upgrade.
        attack_rate: f32,
    },
    /// Confirms that a tower was enabled or disabled.
    TowerActivationChanged {
        /// Identifier of the toggled tower.
        tower: TowerId,
        /// Whether the tower now takes part in combat.
        active: bool,
    },
    /// Reports that every enemy of a wave was spawned and removed.
    WaveCleared {
        /// One-based wave number.
        wave: u32,
        /// Score bonus granted for clearing the wave.
        bonus: u32,
    },
    /// Announces that the run reached a terminal state.
    GameEnded {
        /// `true` when every wave was cleared, `false` when lives ran out.
        won: bool,
    },
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated in spawn order, so comparing two ids compares
/// their spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Lifecycle state of an enemy. Both non-`Alive` states are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyStatus {
    /// The enemy is on the path and may be targeted.
    Alive,
    /// Tower fire reduced the enemy's health to zero or below.
    Defeated,
    /// The enemy consumed the final waypoint.
    ReachedGoal,
}

/// Terminal result of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every wave was cleared.
    Won,
    /// Lives ran out.
    Lost,
}

impl RunOutcome {
    /// Returns `true` for [`RunOutcome::Won`].
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Additive adjustment applied to a tower. Missing fields leave the attribute
/// unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TowerUpgrade {
    /// Change to damage per attack.
    pub damage: Option<i32>,
    /// Change to targeting radius.
    pub range: Option<f32>,
    /// Change to attacks per second.
    pub attack_rate: Option<f32>,
}

/// Reasons the placement validator refuses a candidate location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementRejection {
    /// The candidate lies outside the board.
    #[error("location is outside the board")]
    OutOfBounds,
    /// The candidate is closer to the path than the configured clearance.
    #[error("location is too close to the enemy path")]
    TooCloseToPath,
    /// The candidate is closer to another tower than the minimum separation.
    #[error("location is too close to an existing tower")]
    TooCloseToTower,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The location violates a geometry or overlap rule.
    #[error("invalid placement: {0}")]
    InvalidPlacement(PlacementRejection),
    /// Every tower slot in the budget is already used.
    #[error("the tower budget is exhausted")]
    BudgetExceeded,
    /// The run already ended, so no further towers are accepted.
    #[error("the run has already ended")]
    RunEnded,
}

/// Reasons a command addressing an existing tower may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum TowerCommandError {
    /// No tower with the provided identifier exists.
    #[error("tower {} does not exist", .tower.get())]
    MissingTower {
        /// Identifier that was requested.
        tower: TowerId,
    },
}

/// Errors reported by the world's command entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A placement request was refused.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// A command addressed a tower that does not exist.
    #[error(transparent)]
    TowerCommand(#[from] TowerCommandError),
    /// The run already ended; the command was ignored.
    #[error("the run has already ended")]
    RunEnded,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Wave that spawned the enemy.
    pub wave: u32,
    /// Current location.
    pub position: Vec2,
    /// Index of the last waypoint reached.
    pub path_index: usize,
    /// Remaining health; may be negative after a lethal hit.
    pub health: i32,
    /// Health at spawn.
    pub max_health: u32,
    /// Remaining health as a fraction of `max_health`, clamped to `0.0..=1.0`.
    pub health_fraction: f32,
    /// Lifecycle state.
    pub status: EnemyStatus,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Location of the tower.
    pub position: Vec2,
    /// Targeting radius.
    pub range: f32,
    /// Damage per attack.
    pub damage: u32,
    /// Attacks per second.
    pub attack_rate: f32,
    /// Seconds until the tower may attack again.
    pub cooldown: f32,
    /// Whether the tower takes part in combat.
    pub active: bool,
}

/// Wave counter as displayed to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveProgress {
    /// One-based number of the current wave.
    pub current: u32,
    /// Number of waves in the run.
    pub total: u32,
}

/// Read-only view of the whole simulation for rendering and UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Simulated time elapsed since the run began.
    pub elapsed: Duration,
    /// Live enemies in spawn order.
    pub enemies: Vec<EnemySnapshot>,
    /// Towers in placement order.
    pub towers: Vec<TowerSnapshot>,
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Wave counter.
    pub wave: WaveProgress,
    /// Towers that may still be placed.
    pub remaining_tower_budget: u32,
    /// Towers that may be placed over the whole run.
    pub max_tower_budget: u32,
    /// Terminal result, once the run has ended.
    pub outcome: Option<RunOutcome>,
}

#[cfg(test)]
mod tests {
    use super::{
        EnemyId, EnemySnapshot, EnemyStatus, PlacementError, PlacementRejection,
        SimulationError, SimulationSnapshot, TowerCommandError, TowerId, TowerSnapshot, Vec2,
        WaveProgress,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_ids_order_by_spawn() {
        assert!(EnemyId::new(3) < EnemyId::new(4));
        assert_eq!(EnemyId::new(9).get(), 9);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InvalidPlacement(
            PlacementRejection::TooCloseToPath,
        ));
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let snapshot = SimulationSnapshot {
            elapsed: Duration::from_millis(2_500),
            enemies: vec![EnemySnapshot {
                id: EnemyId::new(0),
                wave: 1,
                position: Vec2::new(12.5, 200.0),
                path_index: 0,
                health: 80,
                max_health: 100,
                health_fraction: 0.8,
                status: EnemyStatus::Alive,
            }],
            towers: vec![TowerSnapshot {
                id: TowerId::new(0),
                position: Vec2::new(125.0, 125.0),
                range: 150.0,
                damage: 10,
                attack_rate: 1.0,
                cooldown: 0.5,
                active: true,
            }],
            lives: 10,
            score: 0,
            wave: WaveProgress {
                current: 1,
                total: 5,
            },
            remaining_tower_budget: 4,
            max_tower_budget: 5,
            outcome: None,
        };
        assert_round_trip(&snapshot);
    }

    #[test]
    fn errors_render_human_readable_messages() {
        let error = SimulationError::from(PlacementError::InvalidPlacement(
            PlacementRejection::TooCloseToTower,
        ));
        assert_eq!(
            error.to_string(),
            "invalid placement: location is too close to an existing tower"
        );

        let error = SimulationError::from(TowerCommandError::MissingTower {
            tower: TowerId::new(7),
        });
        assert_eq!(error.to_string(), "tower 7 does not exist");
    }
}
