//! A 2D stealth maze simulation
//!
//! This crate provides:
//! - Tile maze queries with line of sight
//! - Guards with vision cones and a patrol/chase state machine
//! - Axis-separated tile collision shared by guards and the player
//! - Entity Component System (ECS) storage with hecs
//! - A fixed-step engine loop with RON/JSON level files

pub mod ai;
pub mod core;
pub mod ecs;
pub mod input;
pub mod maze;
pub mod physics;
pub mod player;

// Re-exports for convenience
pub use ai::step_agent;
pub use glam;
pub use hecs;
pub use player::step_player;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{Guard, GuardConfig, PatrolEnd, PatrolRoute, State, VisionCone};
    pub use crate::core::{
        DebugInfo, Engine, EngineConfig, EngineContext, EventQueue, FrameStats, Game, GameEvent,
        LevelConfig, LevelError,
    };
    pub use crate::ecs::{Hitbox, Name, World};
    pub use crate::input::Input;
    pub use crate::maze::{Tile, TileGrid};
    pub use crate::player::{MoveInput, Player};
    pub use glam::Vec2;
    pub use winit::event::ElementState;
    pub use winit::keyboard::KeyCode;
}
