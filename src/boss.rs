//! Boss encounter state layered on top of an ordinary enemy body.
//!
//! The boss chases the player (via its movement strategy) and adds three timed behaviours:
//! a health pool with a short invincibility window after each hit, a ranged volley fired once
//! the player is close, and a stun "scream" with a wider trigger radius and a long cooldown.
//! All timers are frame countdowns.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::config::BossSettings;
use crate::geometry::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still invincible from an earlier hit, or already defeated.
    Ignored,
    Hurt { health_left: i32 },
    Defeated,
}

/// What the boss decided to do this frame. The level applies these; the boss never touches
/// the player directly.
#[derive(Debug, Default, PartialEq)]
pub struct BossActions {
    pub shots: Vec<BossProjectile>,
    pub scream: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    health: i32,
    invincible_frames: u32,
    shots_remaining: u32,
    shot_delay: u32,
    volley_cooldown: u32,
    scream_cooldown: u32,
    settings: BossSettings,
}

impl Boss {
    pub fn new(settings: BossSettings) -> Self {
        Self {
            health: settings.health,
            invincible_frames: 0,
            shots_remaining: 0,
            shot_delay: 0,
            volley_cooldown: 0,
            scream_cooldown: 0,
            settings,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_frames > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub fn volley_active(&self) -> bool {
        self.shots_remaining > 0
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_invincible() || self.is_defeated() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount;
        self.invincible_frames = self.settings.invincibility_frames;

        if self.is_defeated() {
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Hurt {
                health_left: self.health,
            }
        }
    }

    /// Count down the invincibility window. Runs every frame, frozen or not.
    pub fn tick(&mut self) {
        self.invincible_frames = self.invincible_frames.saturating_sub(1);
    }

    /// Advance attack cooldowns and decide on shots and screams for this frame.
    pub fn plan_attacks(&mut self, boss_center: Vec2, player_center: Option<Vec2>) -> BossActions {
        let mut actions = BossActions::default();
        self.volley_cooldown = self.volley_cooldown.saturating_sub(1);
        self.scream_cooldown = self.scream_cooldown.saturating_sub(1);

        let Some(player_center) = player_center else {
            return actions;
        };
        let distance = boss_center.distance(player_center);

        if !self.volley_active() && self.volley_cooldown == 0 && distance <= self.settings.ranged_radius
        {
            debug!("Boss starts a volley of {} shots", self.settings.volley_size);
            self.shots_remaining = self.settings.volley_size;
            self.shot_delay = 0;
        }

        if self.volley_active() {
            self.shot_delay = self.shot_delay.saturating_sub(1);
            if self.shot_delay == 0 {
                actions.shots.push(BossProjectile::aimed(
                    boss_center,
                    player_center,
                    &self.settings,
                ));
                self.shots_remaining -= 1;
                self.shot_delay = self.settings.shot_interval;
                if self.shots_remaining == 0 {
                    self.volley_cooldown = self.settings.volley_cooldown;
                }
            }
        }

        if self.scream_cooldown == 0 && distance <= self.settings.scream_radius {
            debug!("Boss screams");
            actions.scream = true;
            self.scream_cooldown = self.settings.scream_cooldown;
        }

        actions
    }
}

/// A straight-flying shot. Its velocity is fixed when fired; it does not home afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BossProjectile {
    pub rect: Aabb,
    pub velocity: Vec2,
    lifetime: u32,
}

impl BossProjectile {
    pub fn aimed(from: Vec2, target: Vec2, settings: &BossSettings) -> Self {
        let direction = (target - from).try_normalize().unwrap_or(Vec2::X);
        Self {
            rect: Aabb::from_center(from, Vec2::splat(settings.projectile_size)),
            velocity: direction * settings.projectile_speed,
            lifetime: settings.projectile_lifetime,
        }
    }

    /// Move one frame; false once the shot has expired or left the level.
    pub fn advance(&mut self, level_size: Vec2) -> bool {
        self.rect = self.rect.translated(self.velocity);
        self.lifetime = self.lifetime.saturating_sub(1);

        let level = Aabb::from_position(Vec2::ZERO, level_size);
        self.lifetime > 0 && self.rect.overlaps(&level)
    }
}
