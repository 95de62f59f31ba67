//! Debug renderer. Draws the level's draw list as coloured gizmo outlines.
//!
//! The draw list is already in screen space (top-left origin, y down). The Bevy camera sits at
//! the origin looking at a viewport-sized window, so the only work left is flipping y and moving
//! the origin to the centre of the screen.

use bevy::prelude::*;

use crate::bubble::BubbleState;
use crate::enemy::EnemyType;
use crate::geometry::Aabb;
use crate::level::SpriteKind;
use crate::pickup::ItemKind;
use crate::simulation::ActiveLevel;
use crate::state::GameSet;

/// Spawns the 2D camera and draws the level each frame.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            draw_level
                .in_set(GameSet::Presentation)
                .run_if(resource_exists::<ActiveLevel>),
        );
    }
}

/// Marker for the main camera.
#[derive(Component)]
pub struct FollowCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2dBundle::default(),
        FollowCamera,
    ));
}

fn draw_level(level: Res<ActiveLevel>, mut gizmos: Gizmos) {
    let level = &level.0;
    let viewport = level.config().screen.viewport();

    for item in level.draw_list() {
        let (center, size) = to_bevy(&item.screen_rect, viewport);
        let half = size * 0.5;
        let corners = [
            center + Vec2::new(-half.x, -half.y),
            center + Vec2::new(half.x, -half.y),
            center + Vec2::new(half.x, half.y),
            center + Vec2::new(-half.x, half.y),
            center + Vec2::new(-half.x, -half.y),
        ];
        gizmos.linestrip_2d(corners, placeholder_color(item.sprite, item.alpha));
    }
}

/// Screen rectangle to the centre and size Bevy's y-up 2D camera expects.
pub fn to_bevy(rect: &Aabb, viewport: Vec2) -> (Vec2, Vec2) {
    let center = rect.center();
    let position = Vec2::new(center.x - viewport.x * 0.5, viewport.y * 0.5 - center.y);
    (position, rect.size())
}

fn placeholder_color(sprite: SpriteKind, alpha: f32) -> Color {
    let [r, g, b] = match sprite {
        SpriteKind::Player => [0.2, 0.6, 1.0],
        SpriteKind::Enemy(EnemyType::MultipleChoice) => [0.9, 0.3, 0.3],
        SpriteKind::Enemy(EnemyType::Python) => [0.3, 0.8, 0.3],
        SpriteKind::Enemy(EnemyType::ProgrammingTask) => [0.9, 0.6, 0.2],
        SpriteKind::Enemy(EnemyType::Boss) => [0.7, 0.1, 0.7],
        SpriteKind::Bubble {
            state: BubbleState::Popping,
            ..
        } => [1.0, 1.0, 1.0],
        SpriteKind::Bubble { loaded: true, .. } => [0.5, 0.9, 1.0],
        SpriteKind::Bubble { .. } => [0.7, 0.95, 1.0],
        SpriteKind::Platform {
            breakable: false, ..
        } => [0.55, 0.45, 0.35],
        SpriteKind::Platform { crack_blend, .. } => {
            let intact = Vec3::new(0.75, 0.6, 0.35);
            let cracked = Vec3::new(0.45, 0.2, 0.15);
            intact.lerp(cracked, crack_blend).to_array()
        }
        SpriteKind::BossProjectile => [1.0, 0.2, 0.1],
        SpriteKind::Item(ItemKind::CreditPoint) => [1.0, 0.85, 0.1],
        SpriteKind::Item(ItemKind::Grade) => [0.95, 0.95, 0.5],
        SpriteKind::Item(_) => [0.3, 1.0, 0.8],
    };
    Color::srgba(r, g, b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_origin_maps_to_top_left_of_window() {
        let viewport = Vec2::new(800.0, 600.0);
        let (center, size) = to_bevy(&Aabb::new(0.0, 0.0, 50.0, 50.0), viewport);
        assert_eq!(center, Vec2::new(-375.0, 275.0));
        assert_eq!(size, Vec2::splat(50.0));

        let (center, _) = to_bevy(&Aabb::new(375.0, 275.0, 50.0, 50.0), viewport);
        assert_eq!(center, Vec2::ZERO);
    }
}
