//! World-to-screen camera. Tracks a target with either exponential smoothing or a centered
//! deadzone, and always keeps the visible window inside the level.
//!
//! `offset` is the world position of the screen's top-left corner, so projecting a rectangle is
//! a plain translation by `-offset`.

use bevy::math::Vec2;
use serde::Deserialize;

use crate::config::CameraSettings;
use crate::geometry::Aabb;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Move a fixed fraction of the way toward the centered position every frame.
    #[default]
    Smooth,
    /// Hold still until the target leaves a central region, then push just enough to keep it in.
    Deadzone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    amount: f32,
    remaining: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
    level_size: Vec2,
    follow_speed: f32,
    mode: CameraMode,
    /// Distance from the screen edges the target may reach before the deadzone camera moves.
    deadzone: Vec2,
    lookahead_max: f32,
    lookahead_factor: f32,
    lookahead: f32,
    shake: Option<Shake>,
}

impl Camera {
    pub fn new(viewport: Vec2, level_size: Vec2, settings: &CameraSettings) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            level_size,
            follow_speed: settings.follow_speed.clamp(f32::EPSILON, 1.0),
            mode: settings.mode,
            deadzone: Vec2::new(viewport.x / 3.0, viewport.y / 4.0),
            lookahead_max: settings.lookahead_max.max(0.0),
            lookahead_factor: settings.lookahead_factor,
            lookahead: 0.0,
            shake: None,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Largest legal offset; zero on an axis where the level is smaller than the viewport.
    pub fn max_offset(&self) -> Vec2 {
        (self.level_size - self.viewport).max(Vec2::ZERO)
    }

    /// Jump straight to the target without smoothing, e.g. right after a level loads.
    pub fn snap_to(&mut self, target: &Aabb) {
        self.offset = target.center() - self.viewport * 0.5;
        self.clamp();
    }

    pub fn shake(&mut self, amount: f32, frames: u32) {
        if frames > 0 {
            self.shake = Some(Shake {
                amount,
                remaining: frames,
            });
        }
    }

    pub fn update(&mut self, target: &Aabb, target_velocity: Vec2) {
        match self.mode {
            CameraMode::Smooth => self.follow_smoothed(target, target_velocity),
            CameraMode::Deadzone => self.follow_deadzone(target),
        }

        self.apply_shake();
        self.clamp();
    }

    /// Pure translation into screen space. Size is unchanged.
    pub fn project(&self, rect: &Aabb) -> Aabb {
        rect.translated(-self.offset)
    }

    /// Whether any part of `rect` lies inside the viewport.
    pub fn is_visible(&self, rect: &Aabb) -> bool {
        let screen = self.project(rect);
        screen.right() >= 0.0
            && screen.left <= self.viewport.x
            && screen.bottom() >= 0.0
            && screen.top <= self.viewport.y
    }

    fn follow_smoothed(&mut self, target: &Aabb, target_velocity: Vec2) {
        if self.lookahead_max > 0.0 {
            self.lookahead = (target_velocity.x * self.lookahead_factor)
                .clamp(-self.lookahead_max, self.lookahead_max);
        }

        let desired = target.center() - self.viewport * 0.5 + Vec2::new(self.lookahead, 0.0);
        self.offset += (desired - self.offset) * self.follow_speed;
    }

    fn follow_deadzone(&mut self, target: &Aabb) {
        let center = target.center();

        if center.x - self.offset.x < self.deadzone.x {
            self.offset.x = center.x - self.deadzone.x;
        } else if center.x - self.offset.x > self.viewport.x - self.deadzone.x {
            self.offset.x = center.x - self.viewport.x + self.deadzone.x;
        }

        if center.y - self.offset.y < self.deadzone.y {
            self.offset.y = center.y - self.deadzone.y;
        } else if center.y - self.offset.y > self.viewport.y - self.deadzone.y {
            self.offset.y = center.y - self.viewport.y + self.deadzone.y;
        }
    }

    fn apply_shake(&mut self) {
        let Some(shake) = self.shake.as_mut() else {
            return;
        };

        shake.remaining -= 1;
        let phase = shake.remaining as f32;
        self.offset.x += (phase * 0.5).cos() * shake.amount;
        self.offset.y += (phase * 0.7).sin() * shake.amount;

        if shake.remaining == 0 {
            self.shake = None;
        }
    }

    fn clamp(&mut self) {
        self.offset = self.offset.clamp(Vec2::ZERO, self.max_offset());
    }
}
