//! Axis-separated movement against the tile grid
//!
//! A move is applied one axis at a time: X first, then Y from wherever X
//! ended up. An axis whose new position would put the hitbox into a wall is
//! put back. This stops diagonal moves from clipping wall corners and lets
//! an entity slide along a wall when only one axis is blocked.

use glam::Vec2;

use crate::ai::SteeringOutput;
use crate::ecs::Hitbox;
use crate::maze::TileGrid;

/// Which axes were blocked by walls during a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl MoveOutcome {
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Move `body` by `velocity * dt`.
///
/// A non-positive or non-finite `dt` leaves the body untouched.
pub fn move_by(body: &mut Hitbox, velocity: Vec2, dt: f32, grid: &TileGrid) -> MoveOutcome {
    if !(dt.is_finite() && dt > 0.0) || !velocity.is_finite() {
        return MoveOutcome::default();
    }
    let destination = body.position + velocity * dt;
    move_to(body, destination, grid)
}

/// Move `body` so its top-left lands on `destination`, axis by axis.
///
/// Unblocked axes take the destination coordinate exactly, so snapping onto a
/// target leaves no rounding error behind.
pub fn move_to(body: &mut Hitbox, destination: Vec2, grid: &TileGrid) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    if !destination.is_finite() {
        return outcome;
    }

    let start = body.position;

    if destination.x != start.x {
        body.position.x = destination.x;
        if grid.overlaps_wall(body.position, body.size) {
            body.position.x = start.x;
            outcome.blocked_x = true;
        }
    }

    if destination.y != start.y {
        body.position.y = destination.y;
        if grid.overlaps_wall(body.position, body.size) {
            body.position.y = start.y;
            outcome.blocked_y = true;
        }
    }

    clamp_to_world(body, grid);
    outcome
}

/// Apply a steering decision for one tick.
pub fn apply_steering(
    body: &mut Hitbox,
    steering: &SteeringOutput,
    dt: f32,
    grid: &TileGrid,
) -> MoveOutcome {
    if !(dt.is_finite() && dt > 0.0) {
        return MoveOutcome::default();
    }
    match steering.arrival {
        Some(target) => move_to(body, target, grid),
        None => move_by(body, steering.linear, dt, grid),
    }
}

/// Keep the hitbox inside `[0, width - size] x [0, height - size]`.
pub fn clamp_to_world(body: &mut Hitbox, grid: &TileGrid) {
    let max_x = (grid.width() - body.size).max(0.0);
    let max_y = (grid.height() - body.size).max(0.0);
    body.position.x = body.position.x.clamp(0.0, max_x);
    body.position.y = body.position.y.clamp(0.0, max_y);
}
