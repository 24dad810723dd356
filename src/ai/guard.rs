//! Patrolling guards
//!
//! Each tick a guard looks for the player, lets the state machine pick patrol
//! or chase, steers toward the matching point and moves through the grid.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fsm::{AiContext, State, StateMachine, Transition};
use super::steering::{Seek, SteeringOutput};
use super::vision::{self, ConeFan, VisionCone};
use crate::ecs::Hitbox;
use crate::maze::{DEFAULT_LOS_STEP, TileGrid};
use crate::physics::{self, MoveOutcome};
use crate::player::Player;

/// Distance at which a patrolling guard counts as having reached its target.
pub const PATROL_ARRIVE_THRESHOLD: f32 = 4.0;

/// Tunable guard parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Hitbox side in pixels
    pub size: f32,
    /// How far the guard can see, in pixels
    pub vision_distance: f32,
    /// Full opening angle of the vision cone, in radians
    pub vision_angle: f32,
    /// Patrol speed in pixels per second
    pub standard_speed: f32,
    /// Chase speed in pixels per second
    pub running_speed: f32,
    /// Patrol arrival distance in pixels
    pub arrive_threshold: f32,
    /// Ray-march step for line-of-sight checks, in pixels
    pub los_step: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            size: 6.0,
            vision_distance: 120.0,
            vision_angle: FRAC_PI_2,
            standard_speed: 60.0,
            running_speed: 180.0,
            arrive_threshold: PATROL_ARRIVE_THRESHOLD,
            los_step: DEFAULT_LOS_STEP,
        }
    }
}

/// One of the two ends of a patrol route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatrolEnd {
    A,
    B,
}

impl PatrolEnd {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Two fixed endpoints and which one the guard is heading for.
///
/// The target is stored as an endpoint tag, so it can only ever name one of
/// the two ends, and it is only unset while both ends are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatrolRoute {
    end_a: Option<Vec2>,
    end_b: Option<Vec2>,
    target: Option<PatrolEnd>,
}

impl PatrolRoute {
    /// Route between two points, heading for `A` first
    #[must_use]
    pub fn new(end_a: Vec2, end_b: Vec2) -> Self {
        Self {
            end_a: Some(end_a),
            end_b: Some(end_b),
            target: Some(PatrolEnd::A),
        }
    }

    /// Route with possibly missing endpoints and no target yet
    #[must_use]
    pub fn from_ends(end_a: Option<Vec2>, end_b: Option<Vec2>) -> Self {
        Self {
            end_a,
            end_b,
            target: None,
        }
    }

    #[must_use]
    pub fn endpoint(&self, end: PatrolEnd) -> Option<Vec2> {
        match end {
            PatrolEnd::A => self.end_a,
            PatrolEnd::B => self.end_b,
        }
    }

    #[must_use]
    pub fn end_a(&self) -> Option<Vec2> {
        self.end_a
    }

    #[must_use]
    pub fn end_b(&self) -> Option<Vec2> {
        self.end_b
    }

    /// Which endpoint the guard is heading for
    #[must_use]
    pub fn target(&self) -> Option<PatrolEnd> {
        self.target
    }

    /// Point the guard is heading for
    #[must_use]
    pub fn target_point(&self) -> Option<Vec2> {
        self.target.and_then(|end| self.endpoint(end))
    }

    /// Head for `end`. Ignored when that endpoint is unset.
    pub fn set_target(&mut self, end: PatrolEnd) {
        if self.endpoint(end).is_some() {
            self.target = Some(end);
        }
    }

    /// Make sure a target is chosen, preferring `A`, and return its point.
    pub fn ensure_target(&mut self) -> Option<Vec2> {
        if self.target_point().is_none() {
            self.target = if self.end_a.is_some() {
                Some(PatrolEnd::A)
            } else if self.end_b.is_some() {
                Some(PatrolEnd::B)
            } else {
                None
            };
        }
        self.target_point()
    }

    /// Switch to the other endpoint and return its point.
    ///
    /// Returns `None` and keeps the current target when the other end is
    /// unset or sits on the same spot.
    pub fn flip(&mut self) -> Option<Vec2> {
        let current = self.target?;
        let here = self.endpoint(current)?;
        let next = self.endpoint(current.other())?;
        if next == here {
            return None;
        }
        self.target = Some(current.other());
        Some(next)
    }

    /// Endpoint closer to `position`. Ties go to `B`.
    #[must_use]
    pub fn nearest_to(&self, position: Vec2) -> Option<PatrolEnd> {
        match (self.end_a, self.end_b) {
            (Some(a), Some(b)) => {
                if position.distance(a) < position.distance(b) {
                    Some(PatrolEnd::A)
                } else {
                    Some(PatrolEnd::B)
                }
            }
            (Some(_), None) => Some(PatrolEnd::A),
            (None, Some(_)) => Some(PatrolEnd::B),
            (None, None) => None,
        }
    }
}

/// What a guard did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuardStep {
    /// Whether the player was visible this tick
    pub saw_player: bool,
    /// State change caused by this tick
    pub transition: Transition,
    /// Set when the guard reached one end of its patrol and turned around
    pub turned_toward: Option<Vec2>,
    /// Walls hit while moving
    pub movement: MoveOutcome,
}

/// A guard agent
#[derive(Debug, Clone)]
pub struct Guard {
    /// Hitbox, top-left anchored
    pub body: Hitbox,
    /// Unit heading, never zero
    facing: Vec2,
    vision: VisionCone,
    /// Patrol speed in pixels per second
    pub standard_speed: f32,
    /// Chase speed in pixels per second
    pub running_speed: f32,
    fsm: StateMachine,
    patrol: PatrolRoute,
    arrive_threshold: f32,
    los_step: f32,
}

impl Guard {
    /// Guard at `position` (top-left) facing right, with no patrol route.
    #[must_use]
    pub fn new(position: Vec2, config: &GuardConfig) -> Self {
        Self {
            body: Hitbox::new(position, config.size),
            facing: Vec2::X,
            vision: VisionCone::new(config.vision_distance, config.vision_angle),
            standard_speed: config.standard_speed,
            running_speed: config.running_speed,
            fsm: StateMachine::default(),
            patrol: PatrolRoute::default(),
            arrive_threshold: config.arrive_threshold,
            los_step: config.los_step,
        }
    }

    /// Guard placed at parameter `t` along the segment between its endpoints.
    ///
    /// `t` is clamped to `[0, 1]`. The guard heads for `B` first.
    #[must_use]
    pub fn on_track(end_a: Vec2, end_b: Vec2, t: f32, config: &GuardConfig) -> Self {
        let position = end_a.lerp(end_b, t.clamp(0.0, 1.0));
        let mut guard = Self::new(position, config).with_patrol(end_a, end_b);
        guard.set_patrol_target(PatrolEnd::B);
        guard
    }

    /// Attach a patrol route, heading for `A`.
    #[must_use]
    pub fn with_patrol(mut self, end_a: Vec2, end_b: Vec2) -> Self {
        self.patrol = PatrolRoute::new(end_a, end_b);
        self.face_patrol_target();
        self
    }

    /// Replace the patrol route wholesale.
    pub fn set_patrol(&mut self, route: PatrolRoute) {
        self.patrol = route;
        self.face_patrol_target();
    }

    /// Head for `end` and turn toward it.
    pub fn set_patrol_target(&mut self, end: PatrolEnd) {
        self.patrol.set_target(end);
        self.face_patrol_target();
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.body.size
    }

    /// Hitbox center, where the guard sees from
    #[must_use]
    pub fn eye(&self) -> Vec2 {
        self.body.center()
    }

    #[must_use]
    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    /// Point the guard along `direction`. A zero vector keeps the old facing.
    pub fn set_facing(&mut self, direction: Vec2) {
        if let Some(unit) = direction.try_normalize() {
            self.facing = unit;
        }
    }

    /// Turn toward a point given in the same top-left frame as `position`.
    pub fn face_toward(&mut self, point: Vec2) {
        self.set_facing(point - self.body.position);
    }

    #[must_use]
    pub fn vision(&self) -> &VisionCone {
        &self.vision
    }

    pub fn set_vision_distance(&mut self, distance: f32) {
        self.vision.set_distance(distance);
    }

    /// Change the cone's opening angle; the cached cosine follows.
    pub fn set_vision_angle(&mut self, angle: f32) {
        self.vision.set_angle(angle);
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.fsm.current()
    }

    #[must_use]
    pub fn is_chasing(&self) -> bool {
        self.fsm.is_in_state(State::Chasing)
    }

    #[must_use]
    pub fn patrol(&self) -> &PatrolRoute {
        &self.patrol
    }

    /// Debug outline of the vision cone
    #[must_use]
    pub fn cone_fan(&self) -> ConeFan {
        self.vision.fan(self.eye(), self.facing)
    }

    /// Whether `target` is visible from this guard right now.
    #[must_use]
    pub fn can_see(&self, target: Vec2, grid: &TileGrid) -> bool {
        vision::is_visible(
            self.eye(),
            self.facing,
            &self.vision,
            target,
            grid,
            self.los_step,
        )
    }

    /// Advance one tick against `player`.
    ///
    /// A non-positive `dt` skips the tick entirely.
    pub fn step(&mut self, player: &Player, grid: &TileGrid, dt: f32) -> GuardStep {
        if !(dt.is_finite() && dt > 0.0) {
            return GuardStep::default();
        }

        let player_center = player.body.center();
        let saw_player = self.can_see(player_center, grid);
        let transition = self.fsm.update(&AiContext {
            delta_time: dt,
            can_see_target: saw_player,
        });

        let mut report = GuardStep {
            saw_player,
            transition,
            ..Default::default()
        };

        if transition == Transition::Lost {
            self.resume_patrol();
        }

        let steering = match self.fsm.current() {
            State::Chasing => self.chase(player_center, dt),
            State::Patrolling => {
                let (steering, turned_toward) = self.patrol_tick(dt);
                report.turned_toward = turned_toward;
                steering
            }
        };

        if let Some(heading) = steering.heading {
            self.facing = heading;
        }
        report.movement = physics::apply_steering(&mut self.body, &steering, dt, grid);
        report
    }

    fn chase(&self, player_center: Vec2, dt: f32) -> SteeringOutput {
        // Aim the hitbox center at the player's center
        let anchor = player_center - Vec2::splat(self.body.size / 2.0);
        Seek::new(anchor, self.running_speed).calculate(self.body.position, dt)
    }

    fn patrol_tick(&mut self, dt: f32) -> (SteeringOutput, Option<Vec2>) {
        let Some(mut target) = self.patrol.ensure_target() else {
            return (SteeringOutput::IDLE, None);
        };

        let mut turned_toward = None;
        if self.body.position.distance(target) <= self.arrive_threshold {
            if let Some(next) = self.patrol.flip() {
                log::debug!("Patrol turn toward ({:.1}, {:.1})", next.x, next.y);
                self.face_toward(next);
                target = next;
                turned_toward = Some(next);
            }
        }

        let steering = Seek::new(target, self.standard_speed).calculate(self.body.position, dt);
        (steering, turned_toward)
    }

    fn resume_patrol(&mut self) {
        if let Some(end) = self.patrol.nearest_to(self.body.position) {
            self.patrol.set_target(end);
            self.face_patrol_target();
        }
    }

    fn face_patrol_target(&mut self) {
        if let Some(target) = self.patrol.target_point() {
            self.face_toward(target);
        }
    }
}

/// Advance one guard one frame: look, decide, move.
pub fn step_agent(guard: &mut Guard, player: &Player, grid: &TileGrid, dt: f32) -> GuardStep {
    guard.step(player, grid, dt)
}
