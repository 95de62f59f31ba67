//! Immutable game configuration. A single `GameConfig` is built at startup (defaults or a JSON
//! file) and handed to the level constructor; the simulation never reads ambient globals.
//!
//! All durations are in frames at the 60 Hz design rate. Distances are world pixels.

use std::fs;
use std::path::Path;

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::Deserialize;

use crate::camera::CameraMode;
use crate::error::ConfigError;

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsSettings,
    pub screen: ScreenSettings,
    pub camera: CameraSettings,
    pub player: PlayerSettings,
    pub bubble: BubbleSettings,
    pub enemies: EnemySettings,
    pub platform: PlatformSettings,
    pub boss: BossSettings,
    pub items: ItemSettings,
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            screen: ScreenSettings::default(),
            camera: CameraSettings::default(),
            player: PlayerSettings::default(),
            bubble: BubbleSettings::default(),
            enemies: EnemySettings::default(),
            platform: PlatformSettings::default(),
            boss: BossSettings::default(),
            items: ItemSettings::default(),
            rng_seed: 0x5eed_b0b1,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let follow = self.camera.follow_speed;
        if !(follow > 0.0 && follow <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "camera.follow_speed",
                reason: format!("{follow} is outside (0, 1]"),
            });
        }

        let sizes = [
            ("screen.viewport", self.screen.viewport()),
            ("player.size", self.player.size()),
            ("enemies.size", self.enemies.size()),
            ("boss.size", self.boss.size()),
        ];
        for (field, size) in sizes {
            if size.x <= 0.0 || size.y <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{size} must be positive"),
                });
            }
        }

        if self.physics.max_fall_speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "physics.max_fall_speed",
                reason: "must be positive".to_owned(),
            });
        }

        if self.boss.volley_size == 0 {
            return Err(ConfigError::Invalid {
                field: "boss.volley_size",
                reason: "a volley needs at least one shot".to_owned(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub max_fall_speed: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            max_fall_speed: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
}

impl ScreenSettings {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Fraction of the remaining distance covered each frame, in (0, 1].
    pub follow_speed: f32,
    pub mode: CameraMode,
    /// Upper bound of the horizontal lookahead; `0` disables it.
    pub lookahead_max: f32,
    /// Lookahead distance per unit of target horizontal velocity.
    pub lookahead_factor: f32,
    pub shake_on_boss_defeat: f32,
    pub shake_frames: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow_speed: 0.1,
            mode: CameraMode::Smooth,
            lookahead_max: 100.0,
            lookahead_factor: 10.0,
            shake_on_boss_defeat: 15.0,
            shake_frames: 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub lives: u32,
    pub speed: f32,
    pub jump_strength: f32,
    pub invincibility_frames: u32,
    pub width: f32,
    pub height: f32,
    pub weapon_cooldown: u32,
}

impl PlayerSettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            lives: 3,
            speed: 5.0,
            jump_strength: -15.0,
            invincibility_frames: 120,
            width: 50.0,
            height: 50.0,
            weapon_cooldown: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleSettings {
    pub speed: f32,
    pub lifetime: i32,
    pub spawn_distance: f32,
    /// Lifetime a bubble is topped up to when it captures an enemy.
    pub min_capture_lifetime: i32,
    /// Frames between capture and the start of the rise.
    pub auto_rise_delay: i32,
    pub rise_speed: f32,
    pub pop_frames: u32,
    pub size: f32,
    pub captured_size: f32,
    pub popping_size: f32,
    pub defeat_points: u32,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            speed: 7.0,
            lifetime: 300,
            spawn_distance: 30.0,
            min_capture_lifetime: 120,
            auto_rise_delay: 60,
            rise_speed: 2.0,
            pop_frames: 30,
            size: 20.0,
            captured_size: 30.0,
            popping_size: 40.0,
            defeat_points: 100,
        }
    }
}

/// Movement tuning for one regular enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EnemyTuning {
    pub patrol_speed: f32,
    /// Upward impulse (negative); `0` disables hopping.
    pub hop_strength: f32,
    /// Per-frame probability of a hop while grounded.
    pub hop_chance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub width: f32,
    pub height: f32,
    pub multiple_choice: EnemyTuning,
    pub python: EnemyTuning,
    pub programming_task: EnemyTuning,
}

impl EnemySettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            multiple_choice: EnemyTuning {
                patrol_speed: 2.0,
                hop_strength: -5.0,
                hop_chance: 0.01,
            },
            python: EnemyTuning {
                patrol_speed: 3.0,
                hop_strength: -10.0,
                hop_chance: 0.02,
            },
            programming_task: EnemyTuning {
                patrol_speed: 1.0,
                hop_strength: 0.0,
                hop_chance: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub crack_frames: u32,
    pub broken_frames: u32,
    pub regen_frames: u32,
    /// Vertical band around the platform top within which the player counts as standing on it.
    pub contact_tolerance: f32,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            crack_frames: 90,
            broken_frames: 300,
            regen_frames: 30,
            contact_tolerance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BossSettings {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub speed: f32,
    pub invincibility_frames: u32,
    pub volley_size: u32,
    pub shot_interval: u32,
    pub volley_cooldown: u32,
    pub ranged_radius: f32,
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub projectile_lifetime: u32,
    pub scream_radius: f32,
    pub scream_cooldown: u32,
    pub stun_frames: u32,
    pub bubble_damage: i32,
    pub defeat_points: u32,
}

impl BossSettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for BossSettings {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            health: 10,
            speed: 1.5,
            invincibility_frames: 30,
            volley_size: 5,
            shot_interval: 20,
            volley_cooldown: 180,
            ranged_radius: 350.0,
            projectile_speed: 5.0,
            projectile_size: 12.0,
            projectile_lifetime: 240,
            scream_radius: 500.0,
            scream_cooldown: 600,
            stun_frames: 90,
            bubble_damage: 1,
            defeat_points: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemSettings {
    pub powerup_size: f32,
    pub collectible_size: f32,
    pub espresso_frames: u32,
    pub cheatsheet_frames: u32,
    pub aura_frames: u32,
    pub credit_points_per_life: u32,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            powerup_size: 30.0,
            collectible_size: 20.0,
            espresso_frames: 300,
            cheatsheet_frames: 180,
            aura_frames: 300,
            credit_points_per_life: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "physics": { "gravity": 1.2 } }"#)
            .expect("partial config should parse");
        assert_eq!(config.physics.gravity, 1.2);
        assert_eq!(config.physics.max_fall_speed, 15.0);
        assert_eq!(config.bubble.lifetime, 300);
    }

    #[test]
    fn bundled_config_is_valid() {
        let config = GameConfig::from_json_str(include_str!("../assets/config.json"))
            .expect("bundled config should parse");
        assert_eq!(config.boss.volley_size, 5);
    }

    #[test]
    fn deadzone_mode_parses() {
        let config = GameConfig::from_json_str(r#"{ "camera": { "mode": "deadzone" } }"#)
            .expect("deadzone mode should parse");
        assert_eq!(config.camera.mode, CameraMode::Deadzone);
    }

    #[test]
    fn rejects_follow_speed_outside_unit_interval() {
        let err = GameConfig::from_json_str(r#"{ "camera": { "follow_speed": 0.0 } }"#)
            .expect_err("zero follow speed must be rejected");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.follow_speed",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GameConfig::from_json_str("{ physics: ").expect_err("garbage must not parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
