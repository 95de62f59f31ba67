//! Whole-level scenarios: several subsystems interacting through `Level::advance`.

use std::collections::HashSet;

use approx::assert_relative_eq;
use bevy::math::Vec2;
use rstest::{fixture, rstest};

use bubble_platformer::boss::{Boss, DamageOutcome};
use bubble_platformer::bubble::BubbleState;
use bubble_platformer::config::{BossSettings, GameConfig};
use bubble_platformer::content::{LevelContent, PlatformSpawn, SpawnPoint};
use bubble_platformer::enemy::EnemyType;
use bubble_platformer::geometry::Aabb;
use bubble_platformer::level::{Level, LevelEvent, LevelOutcome};
use bubble_platformer::physics::Solid;
use bubble_platformer::pickup::ItemKind;
use bubble_platformer::platform::PlatformTransition;
use bubble_platformer::player::PlayerIntent;

fn solid(left: f32, top: f32, width: f32, height: f32) -> PlatformSpawn {
    PlatformSpawn {
        rect: Aabb::new(left, top, width, height),
        breakable: false,
    }
}

fn content(spawn: SpawnPoint, platforms: Vec<PlatformSpawn>) -> LevelContent {
    LevelContent {
        name: "scenario".to_owned(),
        width: 800.0,
        height: 600.0,
        player_spawn: spawn,
        platforms,
        enemies: Vec::new(),
        items: Vec::new(),
    }
}

#[fixture]
fn flat_level() -> Level {
    Level::new(
        &content(
            SpawnPoint::new(100.0, 500.0),
            vec![solid(0.0, 550.0, 800.0, 50.0)],
        ),
        GameConfig::default(),
    )
}

fn idle() -> PlayerIntent {
    PlayerIntent::default()
}

fn fire() -> PlayerIntent {
    PlayerIntent {
        fire: true,
        ..PlayerIntent::default()
    }
}

#[test]
fn resting_player_stays_put() {
    let mut level = Level::new(
        &content(
            SpawnPoint::new(100.0, 450.0),
            vec![solid(0.0, 500.0, 800.0, 100.0)],
        ),
        GameConfig::default(),
    );

    level.advance(&idle());

    let body = level.player().body;
    assert_eq!(body.rect.top, 450.0);
    assert_eq!(body.rect.bottom(), 500.0);
    assert!(body.on_ground);
    assert_eq!(body.velocity.y, 0.0);
}

#[rstest]
fn captured_enemy_rises_sixty_frames_after_capture(mut flat_level: Level) {
    flat_level.spawn_enemy(
        EnemyType::ProgrammingTask,
        Vec2::new(200.0, 500.0),
        Some((190.0, 300.0)),
    );

    flat_level.advance(&fire());
    let mut captured_on = None;
    for frame in 1..=20 {
        if flat_level.enemies().is_empty() {
            captured_on = Some(frame);
            break;
        }
        flat_level.advance(&idle());
    }
    assert!(captured_on.is_some(), "bubble should reach the enemy");

    let mut frames_to_rise = 0;
    let mut states = vec![flat_level.bubbles()[0].state()];
    while flat_level.bubbles()[0].state() == BubbleState::Traveling {
        flat_level.advance(&idle());
        frames_to_rise += 1;
        states.push(flat_level.bubbles()[0].state());
        assert!(frames_to_rise <= 61, "bubble never started rising");
    }

    assert_eq!(frames_to_rise, 60);
    let bubble = &flat_level.bubbles()[0];
    assert_eq!(bubble.state(), BubbleState::Rising);
    assert_eq!(bubble.velocity(), Vec2::new(0.0, -2.0));
    assert!(bubble.captured().is_some());

    // Forward-only progression while traveling and rising.
    for pair in states.windows(2) {
        assert!(!(pair[0] == BubbleState::Rising && pair[1] == BubbleState::Traveling));
    }
}

#[rstest]
fn bubble_travels_seven_pixels_per_frame(mut flat_level: Level) {
    flat_level.advance(&fire());
    let start = flat_level.bubbles()[0].rect().center().x;

    for _ in 0..3 {
        flat_level.advance(&idle());
    }

    assert_relative_eq!(flat_level.bubbles()[0].rect().center().x, start + 21.0);
}

#[rstest]
fn captive_belongs_to_one_bubble_and_dies_with_it(mut flat_level: Level) {
    flat_level.spawn_enemy(
        EnemyType::ProgrammingTask,
        Vec2::new(300.0, 500.0),
        Some((290.0, 400.0)),
    );
    flat_level.spawn_enemy(
        EnemyType::ProgrammingTask,
        Vec2::new(500.0, 500.0),
        Some((490.0, 600.0)),
    );

    let mut defeated = HashSet::new();
    for frame in 0..400 {
        let intent = if frame % 31 == 0 { fire() } else { idle() };
        flat_level.advance(&intent);

        let captives: Vec<_> = flat_level
            .bubbles()
            .iter()
            .filter_map(|bubble| bubble.captured().map(|enemy| enemy.id))
            .collect();
        let unique: HashSet<_> = captives.iter().copied().collect();
        assert_eq!(unique.len(), captives.len());

        for bubble in flat_level.bubbles() {
            if bubble.state() == BubbleState::Popping {
                assert!(bubble.captured().is_none());
            }
        }

        for event in flat_level.drain_events() {
            if let LevelEvent::EnemyDefeated { id, .. } = event {
                assert!(defeated.insert(id), "enemy {id:?} defeated twice");
            }
        }
    }
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(29)]
fn boss_ignores_hits_inside_invincibility_window(#[case] frames_later: u32) {
    let mut boss = Boss::new(BossSettings::default());
    assert_eq!(boss.take_damage(1), DamageOutcome::Hurt { health_left: 9 });

    assert_eq!(boss.take_damage(1), DamageOutcome::Ignored);
    for _ in 0..frames_later {
        boss.tick();
    }
    assert_eq!(boss.take_damage(1), DamageOutcome::Ignored);
    assert_eq!(boss.health(), 9);
}

#[test]
fn breakable_platform_cycles_on_schedule() {
    let mut platforms = vec![solid(0.0, 550.0, 800.0, 50.0)];
    platforms.push(PlatformSpawn {
        rect: Aabb::new(0.0, 450.0, 200.0, 20.0),
        breakable: true,
    });
    let mut level = Level::new(
        &content(SpawnPoint::new(50.0, 400.0), platforms),
        GameConfig::default(),
    );

    let mut log = Vec::new();
    for frame in 1..=421 {
        level.advance(&idle());
        for event in level.drain_events() {
            if let LevelEvent::Platform { index: 1, transition } = event {
                log.push((frame, transition));
            }
        }
        let platform = &level.platforms()[1];
        let collidable = matches!(
            log.last(),
            None | Some((_, PlatformTransition::Cracked)) | Some((_, PlatformTransition::Restored))
        );
        assert_eq!(platform.can_collide(), collidable);
    }

    assert_eq!(
        log,
        vec![
            (1, PlatformTransition::Cracked),
            (91, PlatformTransition::Broke),
            (391, PlatformTransition::Regenerating),
            (421, PlatformTransition::Restored),
        ]
    );
    // The player fell through while it was broken.
    assert_eq!(level.player().body.rect.bottom(), 550.0);
}

#[test]
fn bodies_never_end_a_frame_inside_a_platform() {
    let mut level = Level::new(
        &content(
            SpawnPoint::new(150.0, 500.0),
            vec![
                solid(0.0, 550.0, 800.0, 50.0),
                solid(400.0, 350.0, 40.0, 200.0),
                solid(100.0, 380.0, 150.0, 20.0),
            ],
        ),
        GameConfig::default(),
    );
    let intent = PlayerIntent {
        horizontal: 1.0,
        jump: true,
        ..PlayerIntent::default()
    };

    for _ in 0..200 {
        level.advance(&intent);
        let body = level.player().body.rect;
        for platform in level.platforms() {
            assert!(!body.overlaps(&platform.aabb()), "{body:?} inside {:?}", platform.aabb());
        }
    }

    assert_eq!(level.player().body.rect.right(), 400.0);
}

#[test]
fn camera_stays_inside_a_wide_level() {
    let mut level = Level::new(&LevelContent::demo(), GameConfig::default());
    let run = PlayerIntent {
        horizontal: 1.0,
        jump: true,
        ..PlayerIntent::default()
    };

    for _ in 0..900 {
        level.advance(&run);
        let offset = level.camera().offset();
        let max = level.camera().max_offset();
        assert!(offset.x >= 0.0 && offset.x <= max.x, "{offset:?} outside {max:?}");
        assert!(offset.y >= 0.0 && offset.y <= max.y, "{offset:?} outside {max:?}");
    }
}

#[rstest]
fn cheatsheet_freezes_enemies(mut flat_level: Level) {
    flat_level.spawn_item(ItemKind::CheatsheetScroll, Vec2::new(110.0, 510.0));
    flat_level.spawn_enemy(
        EnemyType::Python,
        Vec2::new(500.0, 500.0),
        Some((400.0, 700.0)),
    );

    flat_level.advance(&idle());
    assert!(flat_level.player().enemies_frozen());
    assert_eq!(flat_level.player().score(), 30);

    let held = flat_level.enemies()[0].body.rect.left;
    for _ in 0..100 {
        flat_level.advance(&idle());
        assert_eq!(flat_level.enemies()[0].body.rect.left, held);
    }
}

#[test]
fn defeating_the_boss_ends_the_level() {
    let mut config = GameConfig::default();
    config.boss.health = 1;
    let mut level = Level::new(
        &content(
            SpawnPoint::new(100.0, 500.0),
            vec![solid(0.0, 550.0, 800.0, 50.0)],
        ),
        config,
    );
    level.spawn_enemy(EnemyType::Boss, Vec2::new(200.0, 450.0), None);

    level.advance(&fire());
    for _ in 0..20 {
        if level.outcome() != LevelOutcome::Running {
            break;
        }
        level.advance(&idle());
    }

    assert_eq!(level.outcome(), LevelOutcome::BossDefeated);
    assert!(level.boss().is_none());
    assert_eq!(level.player().score(), 1000);
    assert!(level.drain_events().contains(&LevelEvent::BossDefeated));
}

#[rstest]
fn boss_volley_hits_once_then_passes_through_invincible_player(mut flat_level: Level) {
    flat_level.spawn_enemy(EnemyType::Boss, Vec2::new(350.0, 450.0), None);

    let mut hurt_on = None;
    let mut passed_through = false;
    for frame in 1..=100 {
        flat_level.advance(&idle());
        let player = flat_level.player().body.rect;
        let on_player = flat_level
            .boss_projectiles()
            .iter()
            .filter(|shot| shot.rect.overlaps(&player))
            .count();

        for event in flat_level.drain_events() {
            if let LevelEvent::PlayerHurt { lives_left } = event {
                assert_eq!(hurt_on, None, "hurt twice, second time on frame {frame}");
                assert_eq!(lives_left, 2);
                assert_eq!(on_player, 0, "the landed shot stays in flight");
                hurt_on = Some(frame);
            }
        }

        if hurt_on.is_some_and(|hurt| frame > hurt) && on_player > 0 {
            assert!(flat_level.player().is_invincible());
            passed_through = true;
        }
    }

    assert!(hurt_on.is_some(), "the volley never reached the player");
    assert!(passed_through, "no later shot crossed the invincible player");
    assert_eq!(flat_level.player().lives(), 2);
}
