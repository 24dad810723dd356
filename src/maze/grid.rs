//! Static tile grid and the spatial queries run against it
//!
//! Positions are in pixels with the origin at the top-left corner of tile
//! `(0, 0)`. Anything outside the grid counts as wall, so entities can never
//! leave the map and rays never see past its edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default ray-march step for line-of-sight checks, in pixels.
pub const DEFAULT_LOS_STEP: f32 = 5.0;

/// Static classification of a maze tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Floor = 0,
    Wall = 1,
    Goal = 2,
}

impl Tile {
    /// Numeric code used in level files
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a level-file tile code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            2 => Some(Self::Goal),
            _ => None,
        }
    }
}

/// A rectangular, read-only grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    /// Row-major tiles
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid from rows of tile codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty, a row length differs from the
    /// first row, a code is unknown, or `tile_size` is not a positive number.
    pub fn new<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Result<Self, GridError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }

        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if cols == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows.len() * cols);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(GridError::RaggedRow {
                    row: row_index,
                    expected: cols,
                    found: row.len(),
                });
            }

            for (col_index, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code).ok_or(GridError::UnknownTile {
                    row: row_index,
                    col: col_index,
                    code,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            tile_size,
            tiles,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World width in pixels
    #[must_use]
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// World height in pixels
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Tile at signed indices, `None` outside the grid
    #[must_use]
    pub fn tile(&self, row: i64, col: i64) -> Option<Tile> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.tiles[row * self.cols + col])
    }

    /// Whether the tile at `(row, col)` blocks. Out-of-bounds always blocks.
    #[must_use]
    pub fn is_wall_tile(&self, row: i64, col: i64) -> bool {
        self.tile(row, col).is_none_or(|tile| tile == Tile::Wall)
    }

    /// Convert a pixel position to `(row, col)` tile indices.
    ///
    /// Returns `None` for non-finite coordinates.
    #[must_use]
    pub fn pixel_to_tile(&self, x: f32, y: f32) -> Option<(i64, i64)> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some((
            (y / self.tile_size).floor() as i64,
            (x / self.tile_size).floor() as i64,
        ))
    }

    /// Whether the pixel lies on a wall tile or outside the grid.
    #[must_use]
    pub fn is_wall_at_pixel(&self, x: f32, y: f32) -> bool {
        self.pixel_to_tile(x, y)
            .is_none_or(|(row, col)| self.is_wall_tile(row, col))
    }

    /// Whether the pixel lies on a goal tile.
    #[must_use]
    pub fn is_goal_at_pixel(&self, x: f32, y: f32) -> bool {
        self.pixel_to_tile(x, y)
            .and_then(|(row, col)| self.tile(row, col))
            == Some(Tile::Goal)
    }

    /// Whether every tile between two pixels sharing a row or column is open.
    ///
    /// Only axis-aligned queries are answered; any other pair is reported as
    /// not clear.
    #[must_use]
    pub fn is_clear_straight_path(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
        let (Some((row1, col1)), Some((row2, col2))) =
            (self.pixel_to_tile(x1, y1), self.pixel_to_tile(x2, y2))
        else {
            return false;
        };

        if row1 == row2 {
            (col1.min(col2)..=col1.max(col2)).all(|col| !self.is_wall_tile(row1, col))
        } else if col1 == col2 {
            (row1.min(row2)..=row1.max(row2)).all(|row| !self.is_wall_tile(row, col1))
        } else {
            false
        }
    }

    /// March a ray from `from` to `to` and report whether no wall is hit.
    ///
    /// Samples are taken every `step` pixels along the ray plus the end point
    /// itself; the start point is never sampled. A non-positive `step` falls
    /// back to [`DEFAULT_LOS_STEP`].
    #[must_use]
    pub fn has_line_of_sight(&self, from: Vec2, to: Vec2, step: f32) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance == 0.0 {
            return true;
        }
        if !distance.is_finite() {
            return false;
        }

        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            DEFAULT_LOS_STEP
        };
        let direction = delta / distance;

        let mut travelled = step;
        while travelled < distance {
            let sample = from + direction * travelled;
            if self.is_wall_at_pixel(sample.x, sample.y) {
                return false;
            }
            travelled += step;
        }

        !self.is_wall_at_pixel(to.x, to.y)
    }

    /// Whether a square hitbox with top-left `position` overlaps any wall.
    ///
    /// The hitbox covers `[x, x + size)` on each axis, so an edge resting
    /// exactly on a tile boundary does not touch the next tile.
    #[must_use]
    pub fn overlaps_wall(&self, position: Vec2, size: f32) -> bool {
        if !(position.is_finite() && size.is_finite()) {
            return true;
        }

        let ts = self.tile_size;
        let left = (position.x / ts).floor() as i64;
        let top = (position.y / ts).floor() as i64;
        let right = (((position.x + size) / ts).ceil() as i64 - 1).max(left);
        let bottom = (((position.y + size) / ts).ceil() as i64 - 1).max(top);

        (top..=bottom).any(|row| (left..=right).any(|col| self.is_wall_tile(row, col)))
    }

    /// All floor tiles as `(row, col)`, in row-major order
    #[must_use]
    pub fn floor_tiles(&self) -> Vec<(usize, usize)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Floor)
            .map(|(index, _)| (index / self.cols, index % self.cols))
            .collect()
    }

    /// Pixel center of a tile
    #[must_use]
    pub fn tile_center(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Top-left position that centers a hitbox of `size` on a tile
    #[must_use]
    pub fn tile_anchor(&self, row: usize, col: usize, size: f32) -> Vec2 {
        self.tile_center(row, col) - Vec2::splat(size / 2.0)
    }
}

/// Errors raised while building a [`TileGrid`]
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// No rows or no columns
    Empty,
    /// A row does not match the width of the first row
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A tile code other than floor, wall or goal
    UnknownTile { row: usize, col: usize, code: u8 },
    /// Tile size must be a positive, finite number of pixels
    InvalidTileSize(f32),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "grid has no tiles"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} tiles, expected {expected}"),
            Self::UnknownTile { row, col, code } => {
                write!(f, "unknown tile code {code} at ({row}, {col})")
            }
            Self::InvalidTileSize(size) => write!(f, "invalid tile size: {size}"),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_grid() -> TileGrid {
        TileGrid::new(
            &[
                [1u8, 1, 1, 1, 1],
                [1, 0, 0, 0, 1],
                [1, 0, 1, 0, 1],
                [1, 0, 0, 2, 1],
                [1, 1, 1, 1, 1],
            ],
            32.0,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = ring_grid();
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 5);
        assert!((grid.width() - 160.0).abs() < f32::EPSILON);
        assert!((grid.height() - 160.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_grid_rejects_bad_input() {
        let empty: [[u8; 0]; 0] = [];
        assert_eq!(TileGrid::new(&empty, 32.0), Err(GridError::Empty));

        let ragged = vec![vec![0u8, 0, 0], vec![0, 0]];
        assert_eq!(
            TileGrid::new(&ragged, 32.0),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );

        assert_eq!(
            TileGrid::new(&[[0u8, 7]], 32.0),
            Err(GridError::UnknownTile {
                row: 0,
                col: 1,
                code: 7
            })
        );

        assert!(matches!(
            TileGrid::new(&[[0u8]], 0.0),
            Err(GridError::InvalidTileSize(_))
        ));
    }

    #[test]
    fn test_wall_at_pixel() {
        let grid = ring_grid();
        assert!(grid.is_wall_at_pixel(5.0, 5.0));
        assert!(!grid.is_wall_at_pixel(40.0, 40.0));
        assert!(grid.is_wall_at_pixel(80.0, 80.0)); // center pillar
        assert!(!grid.is_wall_at_pixel(100.0, 100.0)); // goal is not a wall
        assert!(grid.is_goal_at_pixel(100.0, 100.0));
        assert!(!grid.is_goal_at_pixel(40.0, 40.0));
    }

    #[test]
    fn test_out_of_bounds_is_always_wall() {
        let shapes = [
            TileGrid::new(&[[0u8]], 10.0).unwrap(),
            TileGrid::new(&[[0u8, 0, 0]], 16.0).unwrap(),
            TileGrid::new(&[[0u8], [0], [0], [0]], 8.0).unwrap(),
            TileGrid::new(&[[0u8; 6]; 6], 32.0).unwrap(),
        ];

        for grid in &shapes {
            let ts = grid.tile_size();
            for row in -2..grid.rows() as i64 + 2 {
                for col in -2..grid.cols() as i64 + 2 {
                    let outside =
                        row < 0 || col < 0 || row >= grid.rows() as i64 || col >= grid.cols() as i64;
                    let x = col as f32 * ts + ts / 2.0;
                    let y = row as f32 * ts + ts / 2.0;
                    assert_eq!(grid.is_wall_at_pixel(x, y), outside, "row {row} col {col}");
                }
            }
            assert!(grid.is_wall_at_pixel(-0.01, 0.0));
            assert!(grid.is_wall_at_pixel(0.0, grid.height()));
            assert!(grid.is_wall_at_pixel(f32::NAN, 1.0));
        }
    }

    #[test]
    fn test_clear_straight_path() {
        let grid = ring_grid();
        // Row 1 is open from col 1 to col 3
        assert!(grid.is_clear_straight_path(40.0, 40.0, 110.0, 50.0));
        // Column 2 passes through the pillar
        assert!(!grid.is_clear_straight_path(80.0, 40.0, 80.0, 110.0));
        // Column 1 is open top to bottom
        assert!(grid.is_clear_straight_path(40.0, 40.0, 40.0, 110.0));
        // Diagonal queries are never clear
        assert!(!grid.is_clear_straight_path(40.0, 40.0, 110.0, 110.0));
        // A single tile is its own path
        assert!(grid.is_clear_straight_path(40.0, 40.0, 41.0, 41.0));
    }

    #[test]
    fn test_line_of_sight() {
        let grid = ring_grid();
        assert!(grid.has_line_of_sight(Vec2::new(40.0, 48.0), Vec2::new(120.0, 48.0), 5.0));
        // Straight through the pillar
        assert!(!grid.has_line_of_sight(Vec2::new(48.0, 80.0), Vec2::new(112.0, 80.0), 5.0));
        // Zero length
        assert!(grid.has_line_of_sight(Vec2::new(80.0, 80.0), Vec2::new(80.0, 80.0), 5.0));
        // Bad step falls back to the default instead of looping forever
        assert!(grid.has_line_of_sight(Vec2::new(40.0, 48.0), Vec2::new(120.0, 48.0), 0.0));
    }

    #[test]
    fn test_line_of_sight_end_point_in_wall() {
        let grid = ring_grid();
        assert!(!grid.has_line_of_sight(Vec2::new(40.0, 40.0), Vec2::new(40.0, 10.0), 5.0));
    }

    #[test]
    fn test_overlaps_wall() {
        let grid = ring_grid();
        // Fully inside tile (1, 1)
        assert!(!grid.overlaps_wall(Vec2::new(40.0, 40.0), 8.0));
        // Right edge resting on the tile boundary does not touch tile (1, 2)
        assert!(!grid.overlaps_wall(Vec2::new(56.0, 40.0), 8.0));
        // Straddling into the pillar below-right
        assert!(grid.overlaps_wall(Vec2::new(60.0, 60.0), 8.0));
        // Poking into the outer ring
        assert!(grid.overlaps_wall(Vec2::new(30.0, 40.0), 8.0));
    }

    #[test]
    fn test_floor_tiles_and_anchor() {
        let grid = ring_grid();
        let floor = grid.floor_tiles();
        assert_eq!(floor.len(), 7);
        assert_eq!(floor[0], (1, 1));
        assert!(!floor.contains(&(3, 3))); // goal

        let anchor = grid.tile_anchor(1, 1, 6.0);
        assert_eq!(anchor, Vec2::new(45.0, 45.0));
        assert_eq!(grid.tile_center(1, 1), Vec2::new(48.0, 48.0));
    }
}
