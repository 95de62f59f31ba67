//! Level geometry: static platforms and breakable ones.
//!
//! A breakable platform cycles Stable → Cracking → Broken → Regenerating → Stable. It is solid
//! only while Stable or Cracking. Each timed phase counts frames from zero on entry and hands
//! over when the count reaches the phase's duration.

use bevy::log::{debug, warn};

use crate::config::PlatformSettings;
use crate::error::PlatformFault;
use crate::geometry::Aabb;
use crate::physics::{PhysicsBody, Solid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    Stable,
    Cracking,
    Broken,
    Regenerating,
}

impl BreakState {
    fn name(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Cracking => "cracking",
            Self::Broken => "broken",
            Self::Regenerating => "regenerating",
        }
    }
}

/// Reported when a breakable platform changes phase during `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTransition {
    Cracked,
    Broke,
    Regenerating,
    Restored,
}

/// Cosmetic state for the renderer. Has no effect on collision timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformAppearance {
    /// Overall opacity, 0 (invisible) to 1.
    pub alpha: f32,
    /// Crossfade weight of the cracked image over the intact one.
    pub crack_blend: f32,
}

impl PlatformAppearance {
    const INTACT: Self = Self {
        alpha: 1.0,
        crack_blend: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakablePlatform {
    rect: Aabb,
    state: BreakState,
    timer: u32,
    /// Whether the player stood on top last frame; cracking starts on the rising edge.
    player_contact: bool,
    settings: PlatformSettings,
}

impl BreakablePlatform {
    pub fn new(rect: Aabb, settings: PlatformSettings) -> Self {
        Self {
            rect,
            state: BreakState::Stable,
            timer: 0,
            player_contact: false,
            settings,
        }
    }

    pub fn rect(&self) -> Aabb {
        self.rect
    }

    pub fn state(&self) -> BreakState {
        self.state
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.state, BreakState::Stable | BreakState::Cracking)
    }

    /// Advance one frame. Internal faults are logged and answered with a reset to Stable; they
    /// never propagate to the caller.
    pub fn advance(&mut self, player: &PhysicsBody) -> Option<PlatformTransition> {
        match self.try_advance(player) {
            Ok(transition) => transition,
            Err(fault) => {
                warn!("Breakable platform at {:?} reset after fault: {fault}", self.rect.position());
                self.reset();
                None
            }
        }
    }

    pub fn try_advance(
        &mut self,
        player: &PhysicsBody,
    ) -> Result<Option<PlatformTransition>, PlatformFault> {
        self.validate()?;

        let in_contact = self.player_standing_on_top(player);
        let rising_edge = in_contact && !self.player_contact;
        self.player_contact = in_contact;

        let transition = match self.state {
            BreakState::Stable => {
                if rising_edge {
                    self.enter(BreakState::Cracking);
                    Some(PlatformTransition::Cracked)
                } else {
                    None
                }
            }
            BreakState::Cracking => self
                .tick(self.settings.crack_frames)
                .then(|| {
                    self.enter(BreakState::Broken);
                    PlatformTransition::Broke
                }),
            BreakState::Broken => self.tick(self.settings.broken_frames).then(|| {
                self.enter(BreakState::Regenerating);
                PlatformTransition::Regenerating
            }),
            BreakState::Regenerating => self.tick(self.settings.regen_frames).then(|| {
                self.enter(BreakState::Stable);
                PlatformTransition::Restored
            }),
        };

        Ok(transition)
    }

    /// Force the platform back to an intact, solid, fully visible state.
    pub fn reset(&mut self) {
        self.state = BreakState::Stable;
        self.timer = 0;
        self.player_contact = false;
    }

    pub fn appearance(&self) -> PlatformAppearance {
        match self.state {
            BreakState::Stable => PlatformAppearance::INTACT,
            BreakState::Cracking => {
                let half = (self.settings.crack_frames as f32 * 0.5).max(1.0);
                let elapsed = self.timer as f32;
                if elapsed < half {
                    PlatformAppearance {
                        alpha: 1.0,
                        crack_blend: elapsed / half,
                    }
                } else {
                    PlatformAppearance {
                        alpha: (1.0 - (elapsed - half) / half).max(0.0),
                        crack_blend: 1.0,
                    }
                }
            }
            BreakState::Broken => PlatformAppearance {
                alpha: 0.0,
                crack_blend: 0.0,
            },
            BreakState::Regenerating => PlatformAppearance {
                alpha: (self.timer as f32 / self.settings.regen_frames.max(1) as f32).min(1.0),
                crack_blend: 0.0,
            },
        }
    }

    fn enter(&mut self, state: BreakState) {
        debug!(
            "Breakable platform at {:?}: {} -> {}",
            self.rect.position(),
            self.state.name(),
            state.name()
        );
        self.state = state;
        self.timer = 0;
    }

    /// Count one frame; true once the phase duration has elapsed.
    fn tick(&mut self, duration: u32) -> bool {
        self.timer += 1;
        self.timer >= duration
    }

    fn phase_limit(&self) -> u32 {
        match self.state {
            BreakState::Stable => 0,
            BreakState::Cracking => self.settings.crack_frames,
            BreakState::Broken => self.settings.broken_frames,
            BreakState::Regenerating => self.settings.regen_frames,
        }
    }

    fn validate(&self) -> Result<(), PlatformFault> {
        if !self.rect.is_finite() {
            return Err(PlatformFault::NonFiniteGeometry);
        }

        let limit = self.phase_limit();
        if self.timer > limit {
            return Err(PlatformFault::TimerOutOfRange {
                phase: self.state.name(),
                timer: self.timer,
                limit,
            });
        }

        Ok(())
    }

    fn player_standing_on_top(&self, player: &PhysicsBody) -> bool {
        let body = &player.rect;
        let horizontal = body.left < self.rect.right() && body.right() > self.rect.left;
        let resting =
            (body.bottom() - self.rect.top).abs() <= self.settings.contact_tolerance;
        horizontal && resting && player.velocity.y >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Platform {
    Static(Aabb),
    Breakable(BreakablePlatform),
}

impl Platform {
    pub fn rect(&self) -> Aabb {
        match self {
            Self::Static(rect) => *rect,
            Self::Breakable(platform) => platform.rect(),
        }
    }

    /// Static platforms never change; breakable ones run their state machine.
    pub fn advance(&mut self, player: &PhysicsBody) -> Option<PlatformTransition> {
        match self {
            Self::Static(_) => None,
            Self::Breakable(platform) => platform.advance(player),
        }
    }

    pub fn appearance(&self) -> PlatformAppearance {
        match self {
            Self::Static(_) => PlatformAppearance::INTACT,
            Self::Breakable(platform) => platform.appearance(),
        }
    }
}

impl Solid for Platform {
    fn aabb(&self) -> Aabb {
        self.rect()
    }

    fn can_collide(&self) -> bool {
        match self {
            Self::Static(_) => true,
            Self::Breakable(platform) => platform.is_solid(),
        }
    }
}
