//! Player controller
//!
//! The player has no perception; each frame its directional input becomes a
//! velocity that goes through the same tile mover the guards use.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use crate::ecs::Hitbox;
use crate::maze::TileGrid;
use crate::physics::{self, MoveOutcome};

/// Directional input for one frame, each axis in `{-1, 0, 1}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub dx: i8,
    pub dy: i8,
}

impl MoveInput {
    pub const NONE: Self = Self { dx: 0, dy: 0 };

    /// Build from any integers; only the sign of each axis is kept.
    #[must_use]
    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    /// Unit-or-zero direction. Diagonals are scaled by `1/sqrt(2)`.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        let direction = Vec2::new(f32::from(self.dx.signum()), f32::from(self.dy.signum()));
        if direction.x != 0.0 && direction.y != 0.0 {
            direction * FRAC_1_SQRT_2
        } else {
            direction
        }
    }

    #[must_use]
    pub fn is_idle(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// The player entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Hitbox, top-left anchored
    pub body: Hitbox,
    /// Pixels per second
    pub speed: f32,
}

impl Player {
    #[must_use]
    pub fn new(position: Vec2, size: f32, speed: f32) -> Self {
        Self {
            body: Hitbox::new(position, size),
            speed,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Velocity this input asks for
    #[must_use]
    pub fn velocity(&self, input: MoveInput) -> Vec2 {
        input.direction() * self.speed
    }

    /// Advance one frame.
    pub fn step(&mut self, input: MoveInput, dt: f32, grid: &TileGrid) -> MoveOutcome {
        let velocity = self.velocity(input);
        physics::move_by(&mut self.body, velocity, dt, grid)
    }
}

/// Advance the player one frame from directional input.
pub fn step_player(player: &mut Player, input: MoveInput, dt: f32, grid: &TileGrid) -> MoveOutcome {
    player.step(input, dt, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> TileGrid {
        TileGrid::new(
            &[
                [1u8, 1, 1, 1, 1],
                [1, 0, 0, 0, 1],
                [1, 0, 1, 1, 1],
                [1, 1, 1, 1, 1],
            ],
            32.0,
        )
        .unwrap()
    }

    #[test]
    fn test_input_sign_only() {
        assert_eq!(MoveInput::new(5, -9), MoveInput { dx: 1, dy: -1 });
        assert!(MoveInput::NONE.is_idle());
    }

    #[test]
    fn test_diagonal_speed_is_normalized() {
        let player = Player::new(Vec2::ZERO, 14.0, 180.0);
        let straight = player.velocity(MoveInput::new(1, 0));
        let diagonal = player.velocity(MoveInput::new(1, 1));
        assert!((straight.length() - 180.0).abs() < 1e-3);
        assert!((diagonal.length() - 180.0).abs() < 1e-3);
        assert!((diagonal.x - diagonal.y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_player_moves_and_stops_at_walls() {
        let grid = corridor();
        let mut player = Player::new(Vec2::new(36.0, 36.0), 14.0, 180.0);

        let outcome = step_player(&mut player, MoveInput::new(1, 0), 0.1, &grid);
        assert!(!outcome.is_blocked());
        assert!((player.position().x - 54.0).abs() < 1e-4);

        // Up is the outer wall
        let outcome = step_player(&mut player, MoveInput::new(0, -1), 0.1, &grid);
        assert!(outcome.blocked_y);
        assert!((player.position().y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_slides_along_wall() {
        let grid = corridor();
        // Tile (1, 2), directly above the wall at (2, 2)
        let mut player = Player::new(Vec2::new(70.0, 48.0), 14.0, 100.0);
        let outcome = step_player(&mut player, MoveInput::new(1, 1), 0.1, &grid);

        assert!(outcome.blocked_y);
        assert!(!outcome.blocked_x);
        assert!(player.position().x > 70.0);
        assert_eq!(player.position().y, 48.0);
    }

    #[test]
    fn test_idle_input_does_not_move() {
        let grid = corridor();
        let start = Vec2::new(36.0, 36.0);
        let mut player = Player::new(start, 14.0, 180.0);
        step_player(&mut player, MoveInput::NONE, 0.5, &grid);
        assert_eq!(player.position(), start);
    }
}
