//! Loading of simulation settings from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use yasashi_tower_core::SimulationConfig;

/// Reads the configuration at `path`, falling back to the stock game when absent.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read simulation config {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid simulation config {}", path.display()))
}

fn parse(contents: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig =
        toml::from_str(contents).context("failed to parse simulation config toml contents")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yasashi_tower_core::{ConfigError, Vec2};

    #[test]
    fn empty_file_yields_the_stock_game() {
        let config = parse("").expect("empty config is valid");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = parse(
            r#"
            [economy]
            starting_lives = 3

            [waves]
            total_waves = 8
            spawn_interval_secs = 0.5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.economy.starting_lives, 3);
        assert_eq!(config.economy.max_tower_budget, 5);
        assert_eq!(config.waves.total_waves, 8);
        assert_eq!(config.waves.spawn_interval_secs, 0.5);
        assert_eq!(config.waves.base_enemy_count, 5);
    }

    #[test]
    fn custom_path_is_read_as_point_pairs() {
        let config = parse("path = [[0.0, 100.0], [400.0, 100.0], [400.0, 500.0]]")
            .expect("valid config");

        assert_eq!(config.path.len(), 3);
        assert_eq!(config.path.goal(), Vec2::new(400.0, 500.0));
    }

    #[test]
    fn single_point_path_is_rejected() {
        let error = parse("path = [[0.0, 100.0]]").expect_err("path too short");
        assert!(format!("{error:#}").contains("toml"));
    }

    #[test]
    fn non_finite_waypoints_are_rejected() {
        let error = parse("path = [[nan, 200.0], [800.0, 200.0]]").expect_err("nan waypoint");
        assert!(format!("{error:#}").contains("non-finite"));

        let error = parse("path = [[0.0, 200.0], [inf, 200.0]]").expect_err("infinite waypoint");
        assert!(format!("{error:#}").contains("waypoint 1"));
    }

    #[test]
    fn zero_placement_grid_turns_snapping_off() {
        let config = parse("[board]\nplacement_grid = 0.0").expect("valid config");

        assert_eq!(config.board.placement_grid, Some(0.0));
        assert_eq!(config.board.snap(Vec2::new(101.0, 149.0)), Vec2::new(101.0, 149.0));
    }

    #[test]
    fn semantic_errors_are_reported() {
        let error = parse("[economy]\nstarting_lives = 0").expect_err("no lives");
        assert_eq!(
            error.downcast_ref::<ConfigError>(),
            Some(&ConfigError::Zero {
                field: "economy.starting_lives"
            })
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load(Some(Path::new("does/not/exist.toml"))).expect_err("missing file");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
