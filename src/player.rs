//! The player avatar: body, lives, scoring, timed power-up effects, the stun status inflicted
//! by the boss, and the bubble gun.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::bubble::{Bubble, Weapon};
use crate::config::{BubbleSettings, PhysicsSettings, PlayerSettings};
use crate::geometry::Facing;
use crate::physics::{PhysicsBody, Solid};

/// Discrete intents supplied once per frame by whatever reads the input devices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// -1 (left) to 1 (right); 0 stands still.
    pub horizontal: f32,
    pub jump: bool,
    pub fire: bool,
    /// Explicit fire direction. Falls back to the facing direction when absent or unclear.
    pub fire_direction: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: PhysicsBody,
    lives: u32,
    invincibility: u32,
    facing: Facing,
    score: u32,
    credit_points: u32,
    grades: u32,
    weapon: Weapon,
    speed_boost: u32,
    enemy_freeze: u32,
    aura: u32,
    stun: u32,
    settings: PlayerSettings,
}

impl Player {
    pub fn new(spawn: Vec2, level_size: Vec2, settings: PlayerSettings) -> Self {
        Self {
            body: PhysicsBody::new(spawn, settings.size(), level_size),
            lives: settings.lives,
            invincibility: 0,
            facing: Facing::Right,
            score: 0,
            credit_points: 0,
            grades: 0,
            weapon: Weapon::new(settings.weapon_cooldown),
            speed_boost: 0,
            enemy_freeze: 0,
            aura: 0,
            stun: 0,
            settings,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn credit_points(&self) -> u32 {
        self.credit_points
    }

    pub fn grades(&self) -> u32 {
        self.grades
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_defeated(&self) -> bool {
        self.lives == 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    pub fn invincibility_frames(&self) -> u32 {
        self.invincibility
    }

    pub fn has_aura(&self) -> bool {
        self.aura > 0
    }

    /// Invincible after a hit or shielded by the aura.
    pub fn is_invulnerable(&self) -> bool {
        self.is_invincible() || self.has_aura()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun > 0
    }

    pub fn enemies_frozen(&self) -> bool {
        self.enemy_freeze > 0
    }

    pub fn is_speed_boosted(&self) -> bool {
        self.speed_boost > 0
    }

    pub fn movement_speed(&self) -> f32 {
        if self.is_speed_boosted() {
            self.settings.speed * 2.0
        } else {
            self.settings.speed
        }
    }

    /// Translate this frame's intent into velocity, a jump, and possibly a new bubble.
    /// A stunned player can neither walk nor jump.
    pub fn apply_intent(
        &mut self,
        intent: &PlayerIntent,
        bubble_settings: &BubbleSettings,
    ) -> Option<Bubble> {
        if self.is_stunned() {
            self.body.velocity.x = 0.0;
        } else {
            let axis = if intent.horizontal.is_finite() {
                intent.horizontal.clamp(-1.0, 1.0)
            } else {
                0.0
            };
            self.body.velocity.x = axis * self.movement_speed();

            if intent.jump && self.body.on_ground {
                self.body.velocity.y = self.settings.jump_strength;
                self.body.on_ground = false;
            }
        }

        if !intent.fire {
            return None;
        }

        let direction = intent
            .fire_direction
            .and_then(Facing::from_sign)
            .unwrap_or(self.facing);
        self.weapon.fire(&self.body.rect, direction, bubble_settings)
    }

    /// Physics plus every per-frame countdown.
    pub fn advance<S: Solid>(&mut self, physics: &PhysicsSettings, solids: &[S]) {
        if let Some(facing) = Facing::from_sign(self.body.velocity.x) {
            self.facing = facing;
        }

        self.body.step(physics, solids);
        self.weapon.tick();

        self.invincibility = self.invincibility.saturating_sub(1);
        self.stun = self.stun.saturating_sub(1);
        self.speed_boost = self.speed_boost.saturating_sub(1);
        self.enemy_freeze = self.enemy_freeze.saturating_sub(1);
        self.aura = self.aura.saturating_sub(1);
    }

    /// Lose a life unless invincible or shielded. Returns whether the hit landed.
    pub fn take_damage(&mut self) -> bool {
        if self.is_invulnerable() || self.is_defeated() {
            return false;
        }

        self.lives -= 1;
        if self.lives > 0 {
            self.invincibility = self.settings.invincibility_frames;
        }
        debug!("Player hit, {} lives left", self.lives);
        true
    }

    pub fn apply_stun(&mut self, frames: u32) {
        self.stun = frames;
        self.body.velocity = Vec2::ZERO;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    /// Returns true when this point completes a bonus-life threshold.
    pub fn add_credit_point(&mut self, per_life: u32) -> bool {
        self.credit_points += 1;
        if per_life > 0 && self.credit_points % per_life == 0 {
            self.add_life();
            return true;
        }
        false
    }

    pub fn add_grade(&mut self) {
        self.grades += 1;
    }

    pub fn boost_speed(&mut self, frames: u32) {
        self.speed_boost = frames;
    }

    pub fn freeze_enemies(&mut self, frames: u32) {
        self.enemy_freeze = frames;
    }

    pub fn grant_aura(&mut self, frames: u32) {
        self.aura = frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use rstest::rstest;

    const LEVEL: Vec2 = Vec2::new(1600.0, 600.0);

    fn grounded_player() -> Player {
        let mut player = Player::new(Vec2::new(100.0, 500.0), LEVEL, PlayerSettings::default());
        player.body.on_ground = true;
        player
    }

    fn floor() -> [Aabb; 1] {
        [Aabb::new(0.0, 550.0, 1600.0, 50.0)]
    }

    #[test]
    fn walking_sets_facing_after_the_step() {
        let mut player = grounded_player();
        let intent = PlayerIntent {
            horizontal: -1.0,
            ..PlayerIntent::default()
        };

        player.apply_intent(&intent, &BubbleSettings::default());
        player.advance(&PhysicsSettings::default(), &floor());

        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(player.body.rect.left, 95.0);

        player.apply_intent(&PlayerIntent::default(), &BubbleSettings::default());
        player.advance(&PhysicsSettings::default(), &floor());
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn stun_blocks_walking_and_jumping_but_not_gravity() {
        let mut player = grounded_player();
        player.apply_stun(10);
        let intent = PlayerIntent {
            horizontal: 1.0,
            jump: true,
            ..PlayerIntent::default()
        };

        player.apply_intent(&intent, &BubbleSettings::default());
        assert_eq!(player.body.velocity, Vec2::ZERO);
        player.advance(&PhysicsSettings::default(), &floor());

        assert_eq!(player.body.rect.left, 100.0);
        assert!(player.body.on_ground);

        for _ in 0..9 {
            player.advance(&PhysicsSettings::default(), &floor());
        }
        assert!(!player.is_stunned());
    }

    #[test]
    fn damage_grants_invincibility_window() {
        let mut player = grounded_player();

        assert!(player.take_damage());
        assert!(!player.take_damage());
        assert_eq!(player.lives(), 2);

        for _ in 0..120 {
            player.advance(&PhysicsSettings::default(), &floor());
        }
        assert!(player.take_damage());
        assert_eq!(player.lives(), 1);
    }

    #[test]
    fn aura_blocks_damage() {
        let mut player = grounded_player();
        player.grant_aura(5);
        assert!(!player.take_damage());
        assert_eq!(player.lives(), 3);
    }

    #[test]
    fn last_life_ends_without_invincibility() {
        let mut player = Player::new(
            Vec2::ZERO,
            LEVEL,
            PlayerSettings {
                lives: 1,
                ..PlayerSettings::default()
            },
        );
        assert!(player.take_damage());
        assert!(player.is_defeated());
        assert!(!player.is_invincible());
        assert!(!player.take_damage());
    }

    #[rstest]
    #[case(None, 1.0)]
    #[case(Some(0.0), 1.0)]
    #[case(Some(f32::NAN), 1.0)]
    #[case(Some(-1.0), -1.0)]
    fn fire_direction_falls_back_to_facing(
        #[case] fire_direction: Option<f32>,
        #[case] expected_sign: f32,
    ) {
        let mut player = grounded_player();
        let intent = PlayerIntent {
            fire: true,
            fire_direction,
            ..PlayerIntent::default()
        };

        let bubble = player
            .apply_intent(&intent, &BubbleSettings::default())
            .expect("weapon starts ready");

        assert_eq!(bubble.velocity().x.signum(), expected_sign);
    }

    #[test]
    fn speed_boost_doubles_then_expires() {
        let mut player = grounded_player();
        player.boost_speed(2);
        assert_eq!(player.movement_speed(), 10.0);
        player.advance(&PhysicsSettings::default(), &floor());
        player.advance(&PhysicsSettings::default(), &floor());
        assert_eq!(player.movement_speed(), 5.0);
    }

    #[test]
    fn every_fiftieth_credit_point_is_a_life() {
        let mut player = grounded_player();
        let bonuses = (0..100).filter(|_| player.add_credit_point(50)).count();
        assert_eq!(bonuses, 2);
        assert_eq!(player.lives(), 5);
    }
}
