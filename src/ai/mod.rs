//! Guard AI
//!
//! Provides vision cones, the patrol/chase state machine, steering and the
//! guard agent that ties them together.

mod fsm;
mod guard;
mod steering;
mod vision;

pub use fsm::{AiContext, State, StateMachine, Transition};
pub use guard::{
    Guard, GuardConfig, GuardStep, PATROL_ARRIVE_THRESHOLD, PatrolEnd, PatrolRoute, step_agent,
};
pub use steering::{Seek, SteeringOutput};
pub use vision::{ConeFan, VisionCone, is_visible};
