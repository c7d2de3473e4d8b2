//! Seeded random tower placement for unattended runs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use yasashi_tower_core::Event;
use yasashi_tower_system_placement::PlacementValidator;
use yasashi_tower_world::{self as world, query, Tower, World};

const ATTEMPTS_PER_TOWER: u32 = 64;

/// Places up to `count` towers at random legal spots, returning how many landed.
///
/// Candidates are snapped and screened with the placement validator first, so
/// only legal requests reach the world and no rejections are broadcast.
pub(crate) fn place_random_towers(
    world: &mut World,
    count: u32,
    seed: u64,
    out_events: &mut Vec<Event>,
) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let validator = PlacementValidator::new();
    let config = query::config(world).clone();
    let board = config.board;

    let mut placed = 0;
    for _ in 0..count.saturating_mul(ATTEMPTS_PER_TOWER) {
        if placed == count || query::remaining_tower_budget(world) == 0 {
            break;
        }

        let candidate = Vec2::new(
            rng.gen_range(0.0..=board.width),
            rng.gen_range(0.0..=board.height),
        );
        // misses stay out of the event stream and the warning log
        let snapped = board.snap(candidate);
        let existing = query::towers(world).iter().map(Tower::position);
        if !validator.is_valid(snapped, &config.path, existing, &board) {
            continue;
        }

        if world::place_tower(world, candidate, out_events).is_ok() {
            placed += 1;
        }
    }

    log::info!("auto-placed {placed} of {count} requested towers (seed {seed})");
    placed
}
