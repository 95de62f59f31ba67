//! Level content tables: platform rectangles, enemy spawns, and item spawns.
//!
//! Content is plain data read from JSON. The level only consumes it; nothing here is generated
//! procedurally. When the file cannot be read the shell falls back to [`LevelContent::demo`].

use std::fs;
use std::path::Path;

use bevy::math::Vec2;
use serde::Deserialize;

use crate::enemy::EnemyType;
use crate::error::ContentError;
use crate::geometry::Aabb;
use crate::movement::MovementStrategy;
use crate::pickup::ItemKind;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

impl SpawnPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlatformSpawn {
    #[serde(flatten)]
    pub rect: Aabb,
    #[serde(default)]
    pub breakable: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyType,
    #[serde(flatten)]
    pub at: SpawnPoint,
    /// World-space `[left, right]` patrol range. Defaults to the whole level.
    #[serde(default)]
    pub patrol: Option<[f32; 2]>,
    /// Replaces the kind's default movement.
    #[serde(default)]
    pub movement: Option<MovementStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ItemSpawn {
    pub kind: ItemKind,
    #[serde(flatten)]
    pub at: SpawnPoint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelContent {
    #[serde(default)]
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub player_spawn: SpawnPoint,
    #[serde(default)]
    pub platforms: Vec<PlatformSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub items: Vec<ItemSpawn>,
}

impl LevelContent {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(invalid(format!(
                "level size {}x{} must be positive",
                self.width, self.height
            )));
        }

        if !self.contains(self.player_spawn) {
            return Err(invalid(format!(
                "player spawn ({}, {}) lies outside the level",
                self.player_spawn.x, self.player_spawn.y
            )));
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            let rect = platform.rect;
            if !rect.is_finite() || rect.width <= 0.0 || rect.height <= 0.0 {
                return Err(invalid(format!("platform {index} has a degenerate rectangle")));
            }
        }

        for (index, enemy) in self.enemies.iter().enumerate() {
            if !self.contains(enemy.at) {
                return Err(invalid(format!("enemy {index} spawns outside the level")));
            }
            if let Some([left, right]) = enemy.patrol {
                if left >= right {
                    return Err(invalid(format!(
                        "enemy {index} patrol range [{left}, {right}] is empty"
                    )));
                }
            }
        }

        for (index, item) in self.items.iter().enumerate() {
            if !self.contains(item.at) {
                return Err(invalid(format!("item {index} spawns outside the level")));
            }
        }

        Ok(())
    }

    fn contains(&self, point: SpawnPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Built-in layout used when no content file is available: a long floor with ledges, a
    /// few breakable platforms, the regular enemy kinds, and the boss at the far end.
    pub fn demo() -> Self {
        let floor = |left: f32, width: f32| PlatformSpawn {
            rect: Aabb::new(left, 550.0, width, 50.0),
            breakable: false,
        };
        let ledge = |left: f32, top: f32, width: f32| PlatformSpawn {
            rect: Aabb::new(left, top, width, 20.0),
            breakable: false,
        };
        let brittle = |left: f32, top: f32| PlatformSpawn {
            rect: Aabb::new(left, top, 120.0, 20.0),
            breakable: true,
        };
        let enemy = |kind: EnemyType, x: f32, y: f32, patrol: Option<[f32; 2]>| EnemySpawn {
            kind,
            at: SpawnPoint::new(x, y),
            patrol,
            movement: None,
        };
        let item = |kind: ItemKind, x: f32, y: f32| ItemSpawn {
            kind,
            at: SpawnPoint::new(x, y),
        };

        Self {
            name: "Demo".to_owned(),
            width: 3200.0,
            height: 600.0,
            player_spawn: SpawnPoint::new(100.0, 480.0),
            platforms: vec![
                floor(0.0, 1400.0),
                floor(1550.0, 1650.0),
                ledge(300.0, 430.0, 200.0),
                brittle(600.0, 360.0),
                ledge(850.0, 300.0, 250.0),
                brittle(1400.0, 450.0),
                ledge(1700.0, 400.0, 300.0),
                brittle(2150.0, 330.0),
                ledge(2400.0, 420.0, 200.0),
            ],
            enemies: vec![
                enemy(EnemyType::MultipleChoice, 450.0, 480.0, Some([250.0, 750.0])),
                enemy(EnemyType::ProgrammingTask, 900.0, 230.0, Some([850.0, 1100.0])),
                enemy(EnemyType::Python, 1200.0, 480.0, Some([1000.0, 1400.0])),
                enemy(EnemyType::MultipleChoice, 1800.0, 330.0, Some([1700.0, 2000.0])),
                enemy(EnemyType::Python, 2300.0, 480.0, Some([2100.0, 2600.0])),
                enemy(EnemyType::Boss, 2950.0, 420.0, None),
            ],
            items: vec![
                item(ItemKind::CreditPoint, 380.0, 390.0),
                item(ItemKind::DoubleEspresso, 640.0, 320.0),
                item(ItemKind::Grade, 960.0, 260.0),
                item(ItemKind::CheatsheetScroll, 1450.0, 410.0),
                item(ItemKind::CreditPoint, 1850.0, 360.0),
                item(ItemKind::SemesterbreakAura, 2200.0, 290.0),
                item(ItemKind::MotivationFishBread, 2480.0, 380.0),
                item(ItemKind::Grade, 2700.0, 510.0),
            ],
        }
    }
}

fn invalid(reason: String) -> ContentError {
    ContentError::Invalid { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL_ONE: &str = include_str!("../assets/levels/level_1.json");

    #[test]
    fn bundled_level_parses_and_validates() {
        let content = LevelContent::from_json_str(LEVEL_ONE).expect("bundled level is valid");
        assert!(content.platforms.iter().any(|p| p.breakable));
        assert_eq!(
            content
                .enemies
                .iter()
                .filter(|e| e.kind == EnemyType::Boss)
                .count(),
            1
        );
    }

    #[test]
    fn demo_layout_is_valid() {
        LevelContent::demo().validate().expect("demo layout is valid");
    }

    #[test]
    fn minimal_table_uses_empty_collections() {
        let content = LevelContent::from_json_str(
            r#"{ "width": 800, "height": 600, "player_spawn": { "x": 10, "y": 10 } }"#,
        )
        .expect("minimal content parses");
        assert!(content.platforms.is_empty());
        assert!(content.enemies.is_empty());
        assert!(content.items.is_empty());
    }

    #[test]
    fn movement_override_parses() {
        let content = LevelContent::from_json_str(
            r#"{
                "width": 800, "height": 600, "player_spawn": { "x": 10, "y": 10 },
                "enemies": [
                    { "kind": "python", "x": 100, "y": 100,
                      "movement": { "chase": { "speed": 2.5 } } }
                ]
            }"#,
        )
        .expect("override parses");
        assert_eq!(
            content.enemies[0].movement,
            Some(MovementStrategy::Chase { speed: 2.5 })
        );
    }

    #[test]
    fn rejects_empty_patrol_range() {
        let err = LevelContent::from_json_str(
            r#"{
                "width": 800, "height": 600, "player_spawn": { "x": 10, "y": 10 },
                "enemies": [ { "kind": "python", "x": 100, "y": 100, "patrol": [300, 200] } ]
            }"#,
        )
        .expect_err("inverted patrol range");
        assert!(matches!(err, ContentError::Invalid { .. }));
    }

    #[test]
    fn rejects_spawn_outside_level() {
        let err = LevelContent::from_json_str(
            r#"{ "width": 800, "height": 600, "player_spawn": { "x": 900, "y": 10 } }"#,
        )
        .expect_err("spawn outside level");
        assert!(matches!(err, ContentError::Invalid { .. }));
    }
}
