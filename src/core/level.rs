//! Level configuration
//!
//! A level is the tile layout plus everything needed to populate it: player
//! start and stats, guard parameters and count, and an optional RNG seed.
//! Levels load from RON (Rusty Object Notation) or JSON.

use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::ai::GuardConfig;
use crate::ecs::World;
use crate::maze::{self, GridError, Tile, TileGrid};
use crate::player::Player;

/// Player start and stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// `(row, col)` of the floor tile the player starts centered on
    pub start_tile: (usize, usize),
    /// Hitbox side in pixels
    pub size: f32,
    /// Pixels per second
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_tile: (1, 1),
            size: 14.0,
            speed: 180.0,
        }
    }
}

/// A playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level name
    pub name: String,
    /// Tile side in pixels
    pub tile_size: f32,
    /// Rows of tile codes: 0 floor, 1 wall, 2 goal
    pub tiles: Vec<Vec<u8>>,
    pub player: PlayerConfig,
    pub guard: GuardConfig,
    /// Guards spawned at populate time
    pub guard_count: usize,
    /// Patrol along clear rows and columns instead of between random tiles
    pub straight_patrols: bool,
    /// Fixed seed for guard placement, random when unset
    pub seed: Option<u64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: String::from("Corridors"),
            tile_size: 80.0,
            tiles: vec![
                vec![1, 1, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 0, 0, 2, 1],
                vec![1, 0, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 1, 1, 1, 1, 1, 1],
                vec![1, 1, 1, 1, 1, 1, 1, 1],
            ],
            player: PlayerConfig::default(),
            guard: GuardConfig::default(),
            guard_count: 3,
            straight_patrols: false,
            seed: None,
        }
    }
}

impl LevelConfig {
    /// Build the tile grid
    ///
    /// # Errors
    ///
    /// Returns an error if the tile rows do not form a valid grid
    pub fn build_grid(&self) -> Result<TileGrid, LevelError> {
        Ok(TileGrid::new(&self.tiles, self.tile_size)?)
    }

    /// Create the player on its start tile
    ///
    /// # Errors
    ///
    /// Returns an error if the start tile is not a floor tile
    pub fn spawn_player(&self, grid: &TileGrid) -> Result<Player, LevelError> {
        let (row, col) = self.player.start_tile;
        if grid.tile(row as i64, col as i64) != Some(Tile::Floor) {
            return Err(LevelError::InvalidStart { row, col });
        }
        let position = grid.tile_anchor(row, col, self.player.size);
        Ok(Player::new(position, self.player.size, self.player.speed))
    }

    /// Check that the level can be built
    ///
    /// # Errors
    ///
    /// Returns the first problem found with the grid, the player and guard
    /// parameters, or the player start
    pub fn validate(&self) -> Result<(), LevelError> {
        let grid = self.build_grid()?;
        self.check_parameters()?;
        self.spawn_player(&grid)?;
        Ok(())
    }

    /// Check player and guard numbers against the tile size
    ///
    /// # Errors
    ///
    /// Returns the first parameter that is out of range
    pub fn check_parameters(&self) -> Result<(), LevelError> {
        let tile_size = self.tile_size;
        let guard = &self.guard;
        let checks = [
            (
                "player.size",
                self.player.size,
                self.player.size > 0.0 && self.player.size < tile_size,
            ),
            ("player.speed", self.player.speed, self.player.speed >= 0.0),
            (
                "guard.size",
                guard.size,
                guard.size > 0.0 && guard.size < tile_size,
            ),
            (
                "guard.vision_distance",
                guard.vision_distance,
                guard.vision_distance >= 0.0,
            ),
            (
                "guard.vision_angle",
                guard.vision_angle,
                guard.vision_angle > 0.0 && guard.vision_angle <= TAU,
            ),
            (
                "guard.standard_speed",
                guard.standard_speed,
                guard.standard_speed > 0.0,
            ),
            (
                "guard.running_speed",
                guard.running_speed,
                guard.running_speed > 0.0,
            ),
            (
                "guard.arrive_threshold",
                guard.arrive_threshold,
                guard.arrive_threshold >= 0.0,
            ),
            ("guard.los_step", guard.los_step, guard.los_step > 0.0),
        ];

        for (name, value, in_range) in checks {
            if !(value.is_finite() && in_range) {
                return Err(LevelError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// RNG for guard placement, seeded when the level asks for it
    #[must_use]
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// Build a populated world: grid, player and guards
    ///
    /// # Errors
    ///
    /// Returns an error if the grid, a parameter or the player start is invalid
    pub fn build_world(&self, rng: &mut SmallRng) -> Result<World, LevelError> {
        let grid = self.build_grid()?;
        self.check_parameters()?;
        let player = self.spawn_player(&grid)?;

        let mut world = World::new(grid);
        world.spawn_player(player);
        maze::populate(
            &mut world,
            &self.guard,
            self.guard_count,
            self.straight_patrols,
            rng,
        );

        log::info!(
            "Built level '{}': {}x{} tiles, {} guards",
            self.name,
            world.grid().rows(),
            world.grid().cols(),
            world.guard_count()
        );
        Ok(world)
    }

    /// Load a level, picking JSON for `.json` files and RON otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::load_json(path)
        } else {
            Self::load_ron(path)
        }
    }

    /// Parse a level from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid level
    pub fn from_ron_str(content: &str) -> Result<Self, LevelError> {
        ron::from_str(content).map_err(|e| LevelError::DeserializeError(e.to_string()))
    }

    /// Serialize to pretty RON text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, LevelError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LevelError::SerializeError(e.to_string()))
    }

    /// Save the level to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let ron_string = self.to_ron_string()?;
        fs::write(path, ron_string).map_err(|e| LevelError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a level from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path).map_err(|e| LevelError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the level to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| LevelError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| LevelError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a level from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path).map_err(|e| LevelError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| LevelError::DeserializeError(e.to_string()))
    }
}

/// Errors that can occur while loading or building a level
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// The tile rows do not form a valid grid
    Grid(GridError),
    /// The player start tile is not floor
    InvalidStart { row: usize, col: usize },
    /// A player or guard parameter is out of range
    InvalidParameter { name: &'static str, value: f32 },
}

impl From<GridError> for LevelError {
    fn from(error: GridError) -> Self {
        Self::Grid(error)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::Grid(e) => write!(f, "Invalid grid: {e}"),
            Self::InvalidStart { row, col } => {
                write!(f, "Player start tile ({row}, {col}) is not floor")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Parameter {name} is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for LevelError {}
