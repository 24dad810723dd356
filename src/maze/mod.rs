//! Maze grid and level population

mod grid;
mod spawn;

pub use grid::{DEFAULT_LOS_STEP, GridError, Tile, TileGrid};
pub use spawn::{place_guard, populate};
