//! Core engine module
//!
//! Contains the simulation loop, level config, events, timing and debug stats

mod debug;
mod engine;
mod events;
mod level;
mod time;

pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineConfig, EngineContext, Game};
pub use events::{EventQueue, GameEvent};
pub use level::{LevelConfig, LevelError, PlayerConfig};
pub use time::Time;
