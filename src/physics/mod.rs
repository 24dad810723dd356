//! Tile collision for moving entities

mod mover;

pub use mover::{MoveOutcome, apply_steering, clamp_to_world, move_by, move_to};
