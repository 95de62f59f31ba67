//! Axis-aligned rectangles in world space. The world uses a top-left origin with `y` growing
//! downward, so "falling" means positive vertical velocity. Bevy's renderer is y-up; the flip
//! happens once in `render.rs` and nowhere else.

use bevy::math::Vec2;
use serde::Deserialize;

/// Axis-aligned bounding box stored as top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_position(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            size.x,
            size.y,
        )
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Strict overlap: rectangles that merely share an edge do not collide. A body resting on a
    /// platform therefore only collides once gravity pushes it into the surface.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.left + delta.x, self.top + delta.y, self.width, self.height)
    }

    /// Same center, new size. Used when a bubble grows around a captive or bursts.
    pub fn resized_about_center(&self, size: Vec2) -> Self {
        Self::from_center(self.center(), size)
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Horizontal facing. Anything without a clear direction faces right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `None` for zero or non-finite input, so callers keep whatever they faced before.
    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Self::Right)
        } else if value < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let floor = Aabb::new(0.0, 500.0, 800.0, 50.0);
        let body = Aabb::new(100.0, 450.0, 50.0, 50.0);
        assert!(!body.overlaps(&floor));
        assert!(body.translated(Vec2::new(0.0, 0.5)).overlaps(&floor));
    }

    #[test]
    fn unclear_direction_has_no_facing() {
        assert_eq!(Facing::from_sign(0.0), None);
        assert_eq!(Facing::from_sign(f32::NAN), None);
        assert_eq!(Facing::from_sign(-3.0), Some(Facing::Left));
        assert_eq!(Facing::default().sign(), 1.0);
    }

    #[test]
    fn resizing_keeps_center() {
        let rect = Aabb::from_center(Vec2::new(40.0, 60.0), Vec2::splat(20.0));
        let grown = rect.resized_about_center(Vec2::splat(30.0));
        assert_eq!(grown.center(), Vec2::new(40.0, 60.0));
        assert_eq!(grown.size(), Vec2::splat(30.0));
    }
}
