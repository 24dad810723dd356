//! Common ECS components

use glam::Vec2;

/// Axis-aligned square hitbox anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Top-left corner in pixels
    pub position: Vec2,
    /// Side length in pixels
    pub size: f32,
}

impl Hitbox {
    pub fn new(position: Vec2, size: f32) -> Self {
        Self { position, size }
    }

    /// Hitbox of `size` whose center sits on `center`
    pub fn centered_on(center: Vec2, size: f32) -> Self {
        Self::new(center - Vec2::splat(size / 2.0), size)
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// Bottom-right corner (exclusive)
    pub fn max(&self) -> Vec2 {
        self.position + Vec2::splat(self.size)
    }

    /// Whether two boxes share any area
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let (a_min, a_max) = (self.position, self.max());
        let (b_min, b_max) = (other.position, other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
