//! Guard placement on floor tiles
//!
//! Every spawn point and patrol endpoint is the anchor that centers a guard
//! on a floor tile, so a freshly placed guard never starts inside a wall.

use rand::Rng;
use rand::seq::SliceRandom;

use super::TileGrid;
use crate::ai::{Guard, GuardConfig, PatrolEnd};
use crate::ecs::World;

/// Fill `world` with `count` guards.
///
/// Does nothing when the world already has guards or the maze has no floor.
/// With `straight_patrols` each guard walks a clear row or column segment and
/// starts somewhere along it; otherwise spawn and endpoints are independent
/// random floor tiles. Returns the number of guards spawned.
pub fn populate<R: Rng + ?Sized>(
    world: &mut World,
    config: &GuardConfig,
    count: usize,
    straight_patrols: bool,
    rng: &mut R,
) -> usize {
    if world.guard_count() > 0 {
        return 0;
    }

    let grid = world.grid();
    let floor = grid.floor_tiles();
    if floor.is_empty() {
        log::warn!("Maze has no floor tiles, no guards spawned");
        return 0;
    }
    if config.size >= grid.tile_size() {
        log::warn!(
            "Guard size {} does not fit in {} px tiles",
            config.size,
            grid.tile_size()
        );
    }

    let avoid = world.player().and_then(|player| {
        let center = player.body.center();
        let (row, col) = grid.pixel_to_tile(center.x, center.y)?;
        Some((usize::try_from(row).ok()?, usize::try_from(col).ok()?))
    });

    let guards: Vec<Guard> = (0..count)
        .filter_map(|_| place_guard(grid, &floor, avoid, config, straight_patrols, rng))
        .collect();

    let spawned = guards.len();
    for (index, guard) in guards.into_iter().enumerate() {
        world.spawn_guard(format!("guard-{index}"), guard);
    }

    log::info!("Spawned {spawned} guards on {} floor tiles", floor.len());
    spawned
}

/// Pick a spawn point and patrol route for one guard.
///
/// The guard never starts on the `avoid` tile (the player's), though its
/// patrol may lead through it. Returns `None` when no other floor tile exists.
pub fn place_guard<R: Rng + ?Sized>(
    grid: &TileGrid,
    floor: &[(usize, usize)],
    avoid: Option<(usize, usize)>,
    config: &GuardConfig,
    straight_patrols: bool,
    rng: &mut R,
) -> Option<Guard> {
    let spawnable: Vec<(usize, usize)> = floor
        .iter()
        .copied()
        .filter(|&tile| Some(tile) != avoid)
        .collect();

    let &(row_a, col_a) = spawnable.choose(rng)?;
    let end_a = grid.tile_anchor(row_a, col_a, config.size);

    let mut guard = if let Some((row_b, col_b)) = straight_patrols
        .then(|| straight_partner(grid, floor, (row_a, col_a), rng))
        .flatten()
    {
        let end_b = grid.tile_anchor(row_b, col_b, config.size);
        let guard = Guard::on_track(end_a, end_b, rng.gen_range(0.0..=1.0), config);
        if avoid.is_some() && tile_of(grid, &guard) == avoid {
            Guard::on_track(end_a, end_b, 0.0, config)
        } else {
            guard
        }
    } else {
        if straight_patrols {
            log::debug!("No straight track from tile ({row_a}, {col_a}), using random endpoints");
        }
        let &(row_s, col_s) = spawnable.choose(rng)?;
        let &(row_b, col_b) = floor.choose(rng)?;
        Guard::new(grid.tile_anchor(row_s, col_s, config.size), config)
            .with_patrol(end_a, grid.tile_anchor(row_b, col_b, config.size))
    };

    let first = if rng.gen_bool(0.5) {
        PatrolEnd::A
    } else {
        PatrolEnd::B
    };
    guard.set_patrol_target(first);
    Some(guard)
}

/// Tile under the guard's hitbox center
fn tile_of(grid: &TileGrid, guard: &Guard) -> Option<(usize, usize)> {
    let eye = guard.eye();
    let (row, col) = grid.pixel_to_tile(eye.x, eye.y)?;
    Some((usize::try_from(row).ok()?, usize::try_from(col).ok()?))
}

/// A floor tile sharing a row or column with `from`, reachable in a straight
/// line without crossing a wall.
fn straight_partner<R: Rng + ?Sized>(
    grid: &TileGrid,
    floor: &[(usize, usize)],
    from: (usize, usize),
    rng: &mut R,
) -> Option<(usize, usize)> {
    let start = grid.tile_center(from.0, from.1);
    let candidates: Vec<(usize, usize)> = floor
        .iter()
        .copied()
        .filter(|&(row, col)| (row, col) != from && (row == from.0 || col == from.1))
        .filter(|&(row, col)| {
            let end = grid.tile_center(row, col);
            grid.is_clear_straight_path(start.x, start.y, end.x, end.y)
        })
        .collect();
    candidates.choose(rng).copied()
}
