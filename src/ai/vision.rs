//! Vision cones and visibility tests
//!
//! A target is visible when it is within range, inside the angular field of
//! view, and not hidden behind a wall. The checks run cheapest first: a
//! squared-distance compare, one dot product, and only then a ray march
//! through the tile grid.

use std::f32::consts::TAU;

use glam::Vec2;
use smallvec::SmallVec;

use crate::maze::TileGrid;

/// Field of view of an observer.
///
/// The cosine of the half angle is cached so the per-frame test never calls
/// into trigonometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    /// Maximum sight distance in pixels
    distance: f32,
    /// Full opening angle in radians
    angle: f32,
    /// `cos(angle / 2)`
    cos_half_angle: f32,
}

impl VisionCone {
    /// Create a cone with the given range and full opening angle.
    ///
    /// The angle is clamped to `[0, TAU]`.
    #[must_use]
    pub fn new(distance: f32, angle: f32) -> Self {
        let angle = angle.clamp(0.0, TAU);
        Self {
            distance,
            angle,
            cos_half_angle: (angle / 2.0).cos(),
        }
    }

    /// Maximum sight distance in pixels
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Full opening angle in radians
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Half of the opening angle in radians
    #[must_use]
    pub fn half_angle(&self) -> f32 {
        self.angle / 2.0
    }

    #[must_use]
    pub fn cos_half_angle(&self) -> f32 {
        self.cos_half_angle
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    /// Change the opening angle and refresh the cached cosine.
    pub fn set_angle(&mut self, angle: f32) {
        *self = Self::new(self.distance, angle);
    }

    /// Range and field-of-view part of the test, without occlusion.
    ///
    /// `facing` must be a unit vector. A target sitting exactly on the
    /// observer is never in view.
    #[must_use]
    pub fn contains(&self, origin: Vec2, facing: Vec2, target: Vec2) -> bool {
        let offset = target - origin;
        let distance_sq = offset.length_squared();
        if distance_sq == 0.0 || distance_sq > self.distance * self.distance {
            return false;
        }

        let to_target = offset / distance_sq.sqrt();
        to_target.dot(facing) >= self.cos_half_angle
    }

    /// Triangle fan outlining the cone, for debug overlays.
    #[must_use]
    pub fn fan(&self, origin: Vec2, facing: Vec2) -> ConeFan {
        let steps = ((self.angle * 10.0).round() as usize).max(3);
        let base = facing.y.atan2(facing.x);
        let start = base - self.angle / 2.0;
        let increment = self.angle / steps as f32;

        let rim = (0..=steps)
            .map(|i| {
                let theta = start + i as f32 * increment;
                origin + Vec2::new(theta.cos(), theta.sin()) * self.distance
            })
            .collect();

        ConeFan { origin, rim }
    }
}

/// Outline of a vision cone: an apex and the points along its far arc
#[derive(Debug, Clone, PartialEq)]
pub struct ConeFan {
    pub origin: Vec2,
    /// Arc points from one edge of the cone to the other
    pub rim: SmallVec<[Vec2; 32]>,
}

impl ConeFan {
    /// Triangles `[origin, rim[i], rim[i + 1]]` covering the cone
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.rim
            .windows(2)
            .map(move |pair| [self.origin, pair[0], pair[1]])
    }
}

/// Full visibility test: range, field of view, then line of sight.
///
/// `eye` is the observer's hitbox center and `facing` its unit heading.
#[must_use]
pub fn is_visible(
    eye: Vec2,
    facing: Vec2,
    cone: &VisionCone,
    target: Vec2,
    grid: &TileGrid,
    los_step: f32,
) -> bool {
    cone.contains(eye, facing, target) && grid.has_line_of_sight(eye, target, los_step)
}
