#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects deterministic tower targets.
//!
//! Selection is a linear scan over the live enemies. Any future spatial index
//! must preserve the same contract: the nearest enemy within range wins, and
//! equal distances resolve to the lowest spawn order.

use yasashi_tower_core::{EnemyId, Vec2};

/// Enemy eligible for targeting, as seen by the selection scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the enemy; lower identifiers spawned earlier.
    pub enemy: EnemyId,
    /// Current location of the enemy.
    pub position: Vec2,
}

impl TargetCandidate {
    /// Creates a new candidate descriptor.
    #[must_use]
    pub const fn new(enemy: EnemyId, position: Vec2) -> Self {
        Self { enemy, position }
    }
}

/// Returns the candidate nearest to `origin` whose distance does not exceed `range`.
///
/// Callers are expected to pass only enemies that may be attacked. A negative
/// or NaN `range` never selects anything.
#[must_use]
pub fn select_target<I>(origin: Vec2, range: f32, candidates: I) -> Option<EnemyId>
where
    I: IntoIterator<Item = TargetCandidate>,
{
    if !(range >= 0.0) {
        return None;
    }

    let max_distance_sq = range * range;
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        let distance_sq = origin.distance_squared(candidate.position);
        if distance_sq > max_distance_sq {
            continue;
        }

        let current = BestCandidate {
            distance_sq,
            enemy: candidate.enemy,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.enemy)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::{select_target, TargetCandidate};
    use yasashi_tower_core::{EnemyId, Vec2};

    fn candidate(id: u32, x: f32, y: f32) -> TargetCandidate {
        TargetCandidate::new(EnemyId::new(id), Vec2::new(x, y))
    }

    #[test]
    fn targets_enemy_within_range() {
        let target = select_target(
            Vec2::new(100.0, 100.0),
            150.0,
            [candidate(2, 200.0, 100.0)],
        );
        assert_eq!(target, Some(EnemyId::new(2)));
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let target = select_target(
            Vec2::new(0.0, 0.0),
            50.0,
            [candidate(2, 50.0, 0.5)],
        );
        assert_eq!(target, None);
    }

    #[test]
    fn enemy_exactly_on_the_range_boundary_is_targeted() {
        let target = select_target(Vec2::new(0.0, 0.0), 50.0, [candidate(4, 30.0, 40.0)]);
        assert_eq!(target, Some(EnemyId::new(4)));
    }

    #[test]
    fn nearest_enemy_wins_regardless_of_order() {
        let target = select_target(
            Vec2::new(0.0, 0.0),
            100.0,
            [
                candidate(1, 90.0, 0.0),
                candidate(2, 10.0, 10.0),
                candidate(3, 0.0, 40.0),
            ],
        );
        assert_eq!(target, Some(EnemyId::new(2)));
    }

    #[test]
    fn earlier_spawn_is_preferred_when_distances_match() {
        let target = select_target(
            Vec2::new(0.0, 0.0),
            100.0,
            [candidate(20, 30.0, 0.0), candidate(10, -30.0, 0.0)],
        );
        assert_eq!(target, Some(EnemyId::new(10)));
    }

    #[test]
    fn empty_candidates_produce_no_target() {
        assert_eq!(select_target(Vec2::ZERO, 100.0, Vec::<TargetCandidate>::new()), None);
    }

    #[test]
    fn negative_range_produces_no_target() {
        assert_eq!(
            select_target(Vec2::ZERO, -1.0, [candidate(1, 0.0, 0.0)]),
            None
        );
    }

    #[test]
    fn removing_enemies_does_not_select_out_of_range_candidates() {
        let origin = Vec2::new(0.0, 0.0);
        let near_and_far = [candidate(1, 20.0, 0.0), candidate(2, 400.0, 0.0)];
        assert_eq!(select_target(origin, 100.0, near_and_far), Some(EnemyId::new(1)));

        let far_only = [candidate(2, 400.0, 0.0)];
        assert_eq!(select_target(origin, 100.0, far_only), None);
    }
}
