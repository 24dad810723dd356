//! Steering toward a point
//!
//! Guards only ever need to head straight for a point at a fixed speed: the
//! far end of their patrol, or the player. [`Seek`] turns that into a
//! velocity for the collision mover, and lands the guard exactly on the point
//! when this tick's travel would reach or pass it.

use glam::Vec2;

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Desired velocity in pixels per second
    pub linear: Vec2,
    /// Unit heading toward the target, `None` when already on it
    pub heading: Option<Vec2>,
    /// Set when the target is within reach this tick; the mover snaps to it
    pub arrival: Option<Vec2>,
}

impl SteeringOutput {
    /// Stand still and keep the current heading
    pub const IDLE: Self = Self {
        linear: Vec2::ZERO,
        heading: None,
        arrival: None,
    };

    /// Whether this output asks for any movement at all
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.arrival.is_none() && self.linear == Vec2::ZERO
    }
}

/// Seek behavior - move towards target at a constant speed
#[derive(Debug, Clone, Copy)]
pub struct Seek {
    /// Target position
    pub target: Vec2,
    /// Travel speed in pixels per second
    pub speed: f32,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: Vec2, speed: f32) -> Self {
        Self { target, speed }
    }

    /// Calculate steering for an entity at `position` over `dt` seconds.
    #[must_use]
    pub fn calculate(&self, position: Vec2, dt: f32) -> SteeringOutput {
        let to_target = self.target - position;
        let Some(heading) = to_target.try_normalize() else {
            return SteeringOutput::IDLE;
        };

        let linear = heading * self.speed;
        let reach = self.speed * dt;
        let arrival = (to_target.length() <= reach).then_some(self.target);

        SteeringOutput {
            linear,
            heading: Some(heading),
            arrival,
        }
    }
}
