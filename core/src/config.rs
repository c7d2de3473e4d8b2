//! Tunable parameters for a single simulation run.
//!
//! Every struct deserialises with `#[serde(default)]`, so configuration files
//! only need to mention the values they override. The defaults reproduce the
//! stock Yasashi Tower board.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::PathModel;

/// Complete set of parameters required to construct a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Route followed by every enemy.
    pub path: PathModel,
    /// Playable area and placement rules.
    pub board: BoardConfig,
    /// Lives, tower budget and scoring.
    pub economy: EconomyConfig,
    /// Wave sizing and timing.
    pub waves: WaveConfig,
    /// Attributes assigned to every spawned enemy.
    pub enemy: EnemyStats,
    /// Attributes assigned to every newly placed tower.
    pub tower: TowerStats,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            board: BoardConfig::default(),
            economy: EconomyConfig::default(),
            waves: WaveConfig::default(),
            enemy: EnemyStats::default(),
            tower: TowerStats::default(),
        }
    }
}

impl SimulationConfig {
    /// Checks that every value can drive a well-formed run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if !(board.width > 0.0 && board.height > 0.0) {
            return Err(ConfigError::EmptyBoard {
                width: board.width,
                height: board.height,
            });
        }
        non_negative("board.path_clearance", board.path_clearance)?;
        non_negative("board.min_tower_separation", board.min_tower_separation)?;
        if let Some(grid) = board.placement_grid {
            non_negative("board.placement_grid", grid)?;
        }

        if self.economy.starting_lives == 0 {
            return Err(ConfigError::Zero {
                field: "economy.starting_lives",
            });
        }
        if self.waves.total_waves == 0 {
            return Err(ConfigError::Zero {
                field: "waves.total_waves",
            });
        }
        non_negative("waves.spawn_interval_secs", self.waves.spawn_interval_secs)?;
        non_negative("waves.first_wave_delay_secs", self.waves.first_wave_delay_secs)?;
        non_negative("waves.inter_wave_delay_secs", self.waves.inter_wave_delay_secs)?;

        if self.enemy.max_health == 0 {
            return Err(ConfigError::Zero {
                field: "enemy.max_health",
            });
        }
        if i32::try_from(self.enemy.max_health).is_err() {
            return Err(ConfigError::HealthTooLarge {
                max_health: self.enemy.max_health,
            });
        }
        non_negative("enemy.speed", self.enemy.speed)?;
        non_negative("tower.range", self.tower.range)?;
        if !self.tower.attack_rate.is_finite() {
            return Err(ConfigError::Negative {
                field: "tower.attack_rate",
                value: self.tower.attack_rate,
            });
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn default_path() -> PathModel {
    PathModel::new(vec![
        Vec2::new(0.0, 200.0),
        Vec2::new(200.0, 200.0),
        Vec2::new(200.0, 400.0),
        Vec2::new(600.0, 400.0),
        Vec2::new(600.0, 200.0),
        Vec2::new(800.0, 200.0),
    ])
    .unwrap_or_else(|error| unreachable!("stock path is well formed: {error}"))
}

/// Reasons a [`SimulationConfig`] cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board must have positive extent along both axes.
    #[error("board must have a positive size (received {width}x{height})")]
    EmptyBoard {
        /// Configured board width.
        width: f32,
        /// Configured board height.
        height: f32,
    },
    /// A distance, speed or duration was negative or not finite.
    #[error("{field} must be a finite, non-negative value (received {value})")]
    Negative {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A count that must be positive was zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Dotted name of the offending field.
        field: &'static str,
    },
    /// Enemy health must fit the signed health counter.
    #[error("enemy.max_health {max_health} exceeds the supported maximum")]
    HealthTooLarge {
        /// Value that failed validation.
        max_health: u32,
    },
}

/// Playable area and tower placement rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Width of the board in world units.
    pub width: f32,
    /// Height of the board in world units.
    pub height: f32,
    /// Minimum distance between a tower and the enemy path.
    pub path_clearance: f32,
    /// Minimum distance between two towers.
    pub min_tower_separation: f32,
    /// Side length of the placement grid; requested positions snap to cell
    /// centres. `None` or `0.0` places towers exactly where requested.
    pub placement_grid: Option<f32>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            path_clearance: 30.0,
            min_tower_separation: 50.0,
            placement_grid: Some(50.0),
        }
    }
}

impl BoardConfig {
    /// Reports whether `point` lies within the board, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Snaps `point` to the centre of its placement grid cell.
    ///
    /// Without a positive grid the point is returned unchanged.
    #[must_use]
    pub fn snap(&self, point: Vec2) -> Vec2 {
        match self.placement_grid {
            Some(grid) if grid > 0.0 => {
                (point / grid).floor() * grid + Vec2::splat(grid / 2.0)
            }
            _ => point,
        }
    }
}

/// Lives, tower budget and scoring rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Lives available at the start of the run.
    pub starting_lives: u32,
    /// Number of towers that may be placed during the run.
    pub max_tower_budget: u32,
    /// Score granted per wave number when a wave is cleared.
    pub wave_clear_bonus_per_wave: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_lives: 10,
            max_tower_budget: 5,
            wave_clear_bonus_per_wave: 100,
        }
    }
}

/// Wave sizing and timing rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of waves in the run.
    pub total_waves: u32,
    /// Enemies spawned by every wave before scaling.
    pub base_enemy_count: u32,
    /// Additional enemies spawned per wave number.
    pub per_wave_increment: u32,
    /// Seconds of simulated time between consecutive spawns.
    pub spawn_interval_secs: f32,
    /// Seconds of simulated time before the first wave starts.
    pub first_wave_delay_secs: f32,
    /// Seconds of simulated time between clearing a wave and starting the next.
    pub inter_wave_delay_secs: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            total_waves: 5,
            base_enemy_count: 5,
            per_wave_increment: 2,
            spawn_interval_secs: 1.0,
            first_wave_delay_secs: 2.0,
            inter_wave_delay_secs: 3.0,
        }
    }
}

impl WaveConfig {
    /// Number of enemies spawned by wave `wave`.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.base_enemy_count
            .saturating_add(wave.saturating_mul(self.per_wave_increment))
    }

    /// Simulated time between consecutive spawns.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        seconds(self.spawn_interval_secs)
    }

    /// Simulated time before the first wave starts.
    #[must_use]
    pub fn first_wave_delay(&self) -> Duration {
        seconds(self.first_wave_delay_secs)
    }

    /// Simulated time between clearing a wave and starting the next.
    #[must_use]
    pub fn inter_wave_delay(&self) -> Duration {
        seconds(self.inter_wave_delay_secs)
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

/// Attributes assigned to every spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// Health at spawn.
    pub max_health: u32,
    /// Movement speed in world units per second of simulated time.
    pub speed: f32,
    /// Score granted when the enemy is defeated.
    pub reward: u32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 100,
            speed: 60.0,
            reward: 10,
        }
    }
}

/// Attributes assigned to every newly placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage applied per attack.
    pub damage: u32,
    /// Attacks per second; values `<= 0` disable attacking.
    pub attack_rate: f32,
}

impl Default for TowerStats {
    fn default() -> Self {
        Self {
            range: 150.0,
            damage: 10,
            attack_rate: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn wave_size_grows_with_wave_number() {
        let waves = WaveConfig::default();
        assert_eq!(waves.enemy_count(1), 7);
        assert_eq!(waves.enemy_count(5), 15);
    }

    #[test]
    fn snapping_targets_grid_cell_centres() {
        let board = BoardConfig::default();
        assert_eq!(board.snap(Vec2::new(101.0, 149.0)), Vec2::new(125.0, 125.0));

        let free = BoardConfig {
            placement_grid: None,
            ..BoardConfig::default()
        };
        assert_eq!(free.snap(Vec2::new(101.0, 149.0)), Vec2::new(101.0, 149.0));
    }

    #[test]
    fn zero_grid_disables_snapping() {
        let mut config = SimulationConfig::default();
        config.board.placement_grid = Some(0.0);

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.board.snap(Vec2::new(101.0, 149.0)),
            Vec2::new(101.0, 149.0)
        );

        config.board.placement_grid = Some(-5.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "board.placement_grid",
                value: -5.0,
            })
        );
    }

    #[test]
    fn board_bounds_include_edges() {
        let board = BoardConfig::default();
        assert!(board.contains(Vec2::new(0.0, 0.0)));
        assert!(board.contains(Vec2::new(800.0, 600.0)));
        assert!(!board.contains(Vec2::new(800.5, 10.0)));
        assert!(!board.contains(Vec2::new(10.0, -0.5)));
    }

    #[test]
    fn validation_names_the_offending_field() {
        let mut config = SimulationConfig::default();
        config.waves.inter_wave_delay_secs = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "waves.inter_wave_delay_secs",
                value: -1.0,
            })
        );

        let mut config = SimulationConfig::default();
        config.waves.total_waves = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "waves.total_waves",
            })
        );
    }
}
