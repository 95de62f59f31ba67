//! Shared kinematics for every dynamic body (player, enemies, boss).
//!
//! One `step` per frame: gravity with a terminal fall speed, then horizontal motion resolved
//! against solids and the level bounds, then vertical motion resolved the same way. Resolving the
//! axes separately and in this order is what keeps bodies from snagging on platform corners.
//!
//! Overlap tests are discrete, not swept: a body moving further than a platform's thickness in a
//! single frame can pass through it.

use bevy::math::Vec2;

use crate::config::PhysicsSettings;
use crate::geometry::Aabb;

/// Anything a body can collide with. Breakable platforms report `can_collide() == false` while
/// broken so the step skips them.
pub trait Solid {
    fn aabb(&self) -> Aabb;

    fn can_collide(&self) -> bool {
        true
    }
}

impl Solid for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub rect: Aabb,
    pub velocity: Vec2,
    pub on_ground: bool,
    /// Width and height of the world the body is confined to.
    pub level_bounds: Vec2,
}

/// Which vertical faces were clamped during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalContact {
    pub down: bool,
    pub up: bool,
}

impl PhysicsBody {
    pub fn new(position: Vec2, size: Vec2, level_bounds: Vec2) -> Self {
        Self {
            rect: Aabb::from_position(position, size),
            velocity: Vec2::ZERO,
            on_ground: false,
            level_bounds,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.rect = Aabb::from_center(center, self.rect.size());
    }

    pub fn step<S: Solid>(&mut self, settings: &PhysicsSettings, solids: &[S]) -> VerticalContact {
        self.velocity.y += settings.gravity;
        if self.velocity.y > settings.max_fall_speed {
            self.velocity.y = settings.max_fall_speed;
        }

        self.rect.left += self.velocity.x;
        self.resolve_horizontal(solids);
        self.clamp_horizontal_bounds();

        self.rect.top += self.velocity.y;
        let mut contact = self.resolve_vertical(solids);
        self.clamp_vertical_bounds(&mut contact);

        self.on_ground = contact.down;
        contact
    }

    fn resolve_horizontal<S: Solid>(&mut self, solids: &[S]) {
        for solid in solids.iter().filter(|solid| solid.can_collide()) {
            let other = solid.aabb();
            if !self.rect.overlaps(&other) {
                continue;
            }

            if self.velocity.x > 0.0 {
                self.rect.left = other.left - self.rect.width;
            } else if self.velocity.x < 0.0 {
                self.rect.left = other.right();
            }
        }
    }

    /// Bounds only move the body back inside; horizontal velocity is left untouched.
    fn clamp_horizontal_bounds(&mut self) {
        if self.rect.left < 0.0 {
            self.rect.left = 0.0;
        } else if self.rect.right() > self.level_bounds.x {
            self.rect.left = self.level_bounds.x - self.rect.width;
        }
    }

    fn resolve_vertical<S: Solid>(&mut self, solids: &[S]) -> VerticalContact {
        let mut contact = VerticalContact::default();

        for solid in solids.iter().filter(|solid| solid.can_collide()) {
            let other = solid.aabb();
            if !self.rect.overlaps(&other) {
                continue;
            }

            if self.velocity.y > 0.0 {
                self.rect.top = other.top - self.rect.height;
                self.velocity.y = 0.0;
                contact.down = true;
            } else if self.velocity.y < 0.0 {
                self.rect.top = other.bottom();
                self.velocity.y = 0.0;
                contact.up = true;
            }
        }

        contact
    }

    fn clamp_vertical_bounds(&mut self, contact: &mut VerticalContact) {
        if self.rect.top < 0.0 {
            self.rect.top = 0.0;
            self.velocity.y = 0.0;
            contact.up = true;
        } else if self.rect.bottom() > self.level_bounds.y {
            self.rect.top = self.level_bounds.y - self.rect.height;
            self.velocity.y = 0.0;
            contact.down = true;
        }
    }
}
