#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that decides whether a tower may occupy a location.
//!
//! The world consults this crate before admitting any tower; there is no
//! secondary enforcement, so every rule lives here.

use yasashi_tower_core::{BoardConfig, PathModel, PlacementRejection, Vec2};

/// Stateless gate applied to every tower placement request.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlacementValidator;

impl PlacementValidator {
    /// Creates a new placement validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reports the first rule `candidate` violates, if any.
    ///
    /// Rules are checked in order: board bounds, path clearance, then
    /// separation from every tower in `existing_towers`.
    pub fn check<I>(
        &self,
        candidate: Vec2,
        path: &PathModel,
        existing_towers: I,
        board: &BoardConfig,
    ) -> Result<(), PlacementRejection>
    where
        I: IntoIterator<Item = Vec2>,
    {
        if !board.contains(candidate) {
            return Err(PlacementRejection::OutOfBounds);
        }

        if path.distance_to_path(candidate) < board.path_clearance {
            return Err(PlacementRejection::TooCloseToPath);
        }

        let crowded = existing_towers
            .into_iter()
            .any(|tower| tower.distance(candidate) < board.min_tower_separation);
        if crowded {
            return Err(PlacementRejection::TooCloseToTower);
        }

        Ok(())
    }

    /// Returns `true` when `candidate` satisfies every placement rule.
    #[must_use]
    pub fn is_valid<I>(
        &self,
        candidate: Vec2,
        path: &PathModel,
        existing_towers: I,
        board: &BoardConfig,
    ) -> bool
    where
        I: IntoIterator<Item = Vec2>,
    {
        self.check(candidate, path, existing_towers, board).is_ok()
    }
}
