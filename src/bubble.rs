//! The player's bubble: a projectile that can swallow an enemy, float upward with it, and pop.
//!
//! ```text
//! Traveling ──capture──▶ Traveling(+captive) ──rise delay──▶ Rising ──┐
//!     │                                                               │
//!     └────────── expiry / out of bounds / collision / boss hit ──────┴──▶ Popping ──▶ removed
//! ```
//!
//! The machine only moves forward. A captive enemy is owned by exactly one bubble and is
//! defeated whenever that bubble pops.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::camera::Camera;
use crate::config::BubbleSettings;
use crate::enemy::Enemy;
use crate::geometry::{Aabb, Facing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleState {
    Traveling,
    Rising,
    Popping,
}

/// Result of a bubble entering Popping.
#[derive(Debug, PartialEq)]
pub struct PopOutcome {
    /// The captive, now defeated and out of play.
    pub defeated: Option<Enemy>,
    /// Whether the defeat earns points. Expiry pops do not.
    pub award_points: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    rect: Aabb,
    velocity: Vec2,
    lifetime: i32,
    state: BubbleState,
    captured: Option<Enemy>,
    /// Lifetime value at which a loaded bubble starts to rise.
    rise_at: Option<i32>,
    pop_timer: u32,
    settings: BubbleSettings,
}

impl Bubble {
    pub fn fire(center: Vec2, direction: Facing, settings: &BubbleSettings) -> Self {
        Self {
            rect: Aabb::from_center(center, Vec2::splat(settings.size)),
            velocity: Vec2::new(direction.sign() * settings.speed, 0.0),
            lifetime: settings.lifetime,
            state: BubbleState::Traveling,
            captured: None,
            rise_at: None,
            pop_timer: 0,
            settings: *settings,
        }
    }

    pub fn rect(&self) -> Aabb {
        self.rect
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn lifetime(&self) -> i32 {
        self.lifetime
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn captured(&self) -> Option<&Enemy> {
        self.captured.as_ref()
    }

    /// Popping bubbles are only cosmetic and take no further part in collisions.
    pub fn can_be_popped(&self) -> bool {
        self.state != BubbleState::Popping
    }

    pub fn can_capture(&self) -> bool {
        self.state == BubbleState::Traveling && self.captured.is_none()
    }

    /// Finished popping and ready to be dropped.
    pub fn is_finished(&self) -> bool {
        self.state == BubbleState::Popping && self.pop_timer == 0
    }

    /// Swallow `enemy`. Hands it back if this bubble cannot take a captive right now.
    pub fn capture(&mut self, mut enemy: Enemy) -> Result<(), Enemy> {
        if !self.can_capture() {
            return Err(enemy);
        }

        self.rect = self
            .rect
            .resized_about_center(Vec2::splat(self.settings.captured_size));
        enemy.body.velocity = Vec2::ZERO;
        enemy.body.set_center(self.rect.center());

        self.lifetime = self.lifetime.max(self.settings.min_capture_lifetime);
        self.rise_at = Some(self.lifetime - self.settings.auto_rise_delay);
        debug!("Bubble captured enemy {:?}", enemy.id);
        self.captured = Some(enemy);
        Ok(())
    }

    /// Enter Popping. Returns `None` when already popping.
    pub fn pop(&mut self, award_points: bool) -> Option<PopOutcome> {
        if self.state == BubbleState::Popping {
            return None;
        }

        self.state = BubbleState::Popping;
        self.pop_timer = self.settings.pop_frames;
        self.velocity = Vec2::ZERO;
        self.rise_at = None;
        self.rect = self
            .rect
            .resized_about_center(Vec2::splat(self.settings.popping_size));

        let defeated = self.captured.take();
        Some(PopOutcome {
            award_points: award_points && defeated.is_some(),
            defeated,
        })
    }

    /// One frame of motion and timers. Returns the outcome if the bubble expired or left the
    /// playfield this frame.
    pub fn advance(&mut self, camera: &Camera, level_height: f32) -> Option<PopOutcome> {
        match self.state {
            BubbleState::Popping => {
                self.pop_timer = self.pop_timer.saturating_sub(1);
                return None;
            }
            BubbleState::Traveling => {
                self.move_and_age();
                if self.rise_at.is_some_and(|rise_at| self.lifetime <= rise_at) {
                    self.start_rising();
                }
            }
            BubbleState::Rising => self.move_and_age(),
        }

        if self.should_expire(camera, level_height) {
            return self.pop(false);
        }

        None
    }

    fn move_and_age(&mut self) {
        self.rect = self.rect.translated(self.velocity);
        self.lifetime -= 1;

        let center = self.rect.center();
        if let Some(enemy) = self.captured.as_mut() {
            enemy.body.set_center(center);
        }
    }

    fn start_rising(&mut self) {
        debug!("Bubble starts rising");
        self.state = BubbleState::Rising;
        self.rise_at = None;
        self.velocity = Vec2::new(0.0, -self.settings.rise_speed);
    }

    fn should_expire(&self, camera: &Camera, level_height: f32) -> bool {
        if self.lifetime <= 0 {
            return true;
        }

        if self.state == BubbleState::Traveling {
            let screen = camera.project(&self.rect);
            if screen.right() < 0.0 || screen.left > camera.viewport().x {
                return true;
            }
        }

        self.rect.bottom() < 0.0 || self.rect.top > level_height
    }
}

/// Fire-rate limiter for the player's bubble gun.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    cooldown: u32,
    max_cooldown: u32,
}

impl Weapon {
    pub fn new(max_cooldown: u32) -> Self {
        Self {
            cooldown: 0,
            max_cooldown,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Spawn a bubble beside `owner` on the `direction` side, if the cooldown allows.
    pub fn fire(
        &mut self,
        owner: &Aabb,
        direction: Facing,
        settings: &BubbleSettings,
    ) -> Option<Bubble> {
        if !self.is_ready() {
            return None;
        }

        let center = owner.center() + Vec2::new(direction.sign() * settings.spawn_distance, 0.0);
        self.cooldown = self.max_cooldown;
        Some(Bubble::fire(center, direction, settings))
    }
}
