//! Enemies: a physics body, a movement strategy, and a kind tag carrying kind-specific state.

use bevy::math::Vec2;
use rand::Rng;
use serde::Deserialize;

use crate::boss::{Boss, BossActions};
use crate::config::{EnemyTuning, GameConfig, PhysicsSettings};
use crate::movement::{MovementContext, MovementStrategy};
use crate::physics::{PhysicsBody, Solid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

/// Enemy kind as written in level content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    /// Ground patroller with the occasional unpredictable hop.
    MultipleChoice,
    /// Faster and jumps higher.
    Python,
    /// Slow and steady.
    ProgrammingTask,
    Boss,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnemyKind {
    MultipleChoice,
    Python,
    ProgrammingTask,
    Boss(Boss),
}

impl EnemyKind {
    pub fn enemy_type(&self) -> EnemyType {
        match self {
            Self::MultipleChoice => EnemyType::MultipleChoice,
            Self::Python => EnemyType::Python,
            Self::ProgrammingTask => EnemyType::ProgrammingTask,
            Self::Boss(_) => EnemyType::Boss,
        }
    }
}

/// Per-frame inputs shared by every enemy update.
pub struct EnemyFrame<'a, S: Solid> {
    pub physics: &'a PhysicsSettings,
    pub solids: &'a [S],
    pub player_center: Option<Vec2>,
    /// Movement and attacks are suspended; only gravity and collision run.
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: PhysicsBody,
    pub kind: EnemyKind,
    pub strategy: MovementStrategy,
}

impl Enemy {
    pub fn new(id: EnemyId, body: PhysicsBody, kind: EnemyKind, strategy: MovementStrategy) -> Self {
        Self {
            id,
            body,
            kind,
            strategy,
        }
    }

    /// Build an enemy of `enemy_type` with the default strategy for its kind. Regular enemies
    /// patrol `patrol_bounds`, or the whole level when none are given.
    pub fn spawn(
        id: EnemyId,
        enemy_type: EnemyType,
        position: Vec2,
        level_size: Vec2,
        patrol_bounds: Option<(f32, f32)>,
        config: &GameConfig,
    ) -> Self {
        let (left_bound, right_bound) = patrol_bounds.unwrap_or((0.0, level_size.x));

        let (kind, size, strategy) = match enemy_type {
            EnemyType::MultipleChoice => (
                EnemyKind::MultipleChoice,
                config.enemies.size(),
                patrol_strategy(&config.enemies.multiple_choice, left_bound, right_bound),
            ),
            EnemyType::Python => (
                EnemyKind::Python,
                config.enemies.size(),
                patrol_strategy(&config.enemies.python, left_bound, right_bound),
            ),
            EnemyType::ProgrammingTask => (
                EnemyKind::ProgrammingTask,
                config.enemies.size(),
                patrol_strategy(&config.enemies.programming_task, left_bound, right_bound),
            ),
            EnemyType::Boss => (
                EnemyKind::Boss(Boss::new(config.boss)),
                config.boss.size(),
                MovementStrategy::Chase {
                    speed: config.boss.speed,
                },
            ),
        };

        Self::new(id, PhysicsBody::new(position, size, level_size), kind, strategy)
    }

    pub fn enemy_type(&self) -> EnemyType {
        self.kind.enemy_type()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&Boss> {
        match &self.kind {
            EnemyKind::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        match &mut self.kind {
            EnemyKind::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    /// One frame: attack planning (boss only), then the movement strategy, then physics.
    pub fn advance<S: Solid, R: Rng + ?Sized>(
        &mut self,
        frame: &EnemyFrame<'_, S>,
        rng: &mut R,
    ) -> BossActions {
        let center = self.body.center();
        let mut actions = BossActions::default();

        if let EnemyKind::Boss(boss) = &mut self.kind {
            boss.tick();
            if !frame.frozen {
                actions = boss.plan_attacks(center, frame.player_center);
            }
        }

        if frame.frozen {
            self.body.velocity.x = 0.0;
        } else {
            let context = MovementContext {
                target: frame.player_center,
            };
            self.strategy.apply(&mut self.body, &context, rng);
        }

        self.body.step(frame.physics, frame.solids);
        actions
    }
}

fn patrol_strategy(tuning: &EnemyTuning, left_bound: f32, right_bound: f32) -> MovementStrategy {
    let patrol = MovementStrategy::Patrol {
        speed: tuning.patrol_speed,
        left_bound,
        right_bound,
    };

    if tuning.hop_strength < 0.0 && tuning.hop_chance > 0.0 {
        MovementStrategy::Composite(vec![
            patrol,
            MovementStrategy::RandomHop {
                jump_strength: tuning.hop_strength,
                jump_chance: tuning.hop_chance,
            },
        ])
    } else {
        patrol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const LEVEL: Vec2 = Vec2::new(1600.0, 600.0);

    fn floor() -> [Aabb; 1] {
        [Aabb::new(0.0, 550.0, 1600.0, 50.0)]
    }

    #[test]
    fn frozen_enemy_falls_but_does_not_walk() {
        let config = GameConfig::default();
        let mut enemy = Enemy::spawn(
            EnemyId(1),
            EnemyType::MultipleChoice,
            Vec2::new(300.0, 200.0),
            LEVEL,
            None,
            &config,
        );
        enemy.body.velocity.x = 2.0;
        let solids = floor();
        let frame = EnemyFrame {
            physics: &config.physics,
            solids: &solids,
            player_center: None,
            frozen: true,
        };

        enemy.advance(&frame, &mut SmallRng::seed_from_u64(1));

        assert_eq!(enemy.body.rect.left, 300.0);
        assert_eq!(enemy.body.velocity.x, 0.0);
        assert!(enemy.body.rect.top > 200.0);
    }

    #[test]
    fn patroller_picks_a_direction_and_moves() {
        let config = GameConfig::default();
        let mut enemy = Enemy::spawn(
            EnemyId(2),
            EnemyType::ProgrammingTask,
            Vec2::new(300.0, 500.0),
            LEVEL,
            Some((200.0, 500.0)),
            &config,
        );
        let solids = floor();
        let frame = EnemyFrame {
            physics: &config.physics,
            solids: &solids,
            player_center: None,
            frozen: false,
        };

        enemy.advance(&frame, &mut SmallRng::seed_from_u64(3));

        assert_eq!(enemy.body.velocity.x.abs(), config.enemies.programming_task.patrol_speed);
        assert!(enemy.body.on_ground);
        assert_ne!(enemy.body.rect.left, 300.0);
    }

    #[test]
    fn boss_chases_and_plans_attacks() {
        let config = GameConfig::default();
        let mut boss = Enemy::spawn(
            EnemyId(3),
            EnemyType::Boss,
            Vec2::new(1000.0, 450.0),
            LEVEL,
            None,
            &config,
        );
        let solids = floor();
        let frame = EnemyFrame {
            physics: &config.physics,
            solids: &solids,
            player_center: Some(Vec2::new(800.0, 525.0)),
            frozen: false,
        };

        let actions = boss.advance(&frame, &mut SmallRng::seed_from_u64(4));

        assert!(boss.is_boss());
        assert_eq!(boss.body.velocity.x, -config.boss.speed);
        assert_eq!(actions.shots.len(), 1);
        assert!(actions.scream);
    }
}
