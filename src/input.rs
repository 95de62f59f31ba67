//! Keyboard to [`PlayerIntent`]. The simulation never polls devices itself; this system fills a
//! resource that the fixed-step system consumes.
//!
//! Input is read every rendered frame but the level steps at a fixed rate, so one-shot actions
//! (jump, fire) are latched until a simulation step has taken them.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::player::PlayerIntent;
use crate::state::{GameSet, GameState};

/// Registers the keyboard reader and the latched intent resource.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingIntent>().add_systems(
            Update,
            read_keyboard
                .in_set(GameSet::Input)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Intent gathered since the last simulation step.
#[derive(Resource, Default, Debug)]
pub struct PendingIntent(pub PlayerIntent);

impl PendingIntent {
    /// Hand the intent to a simulation step and clear the latched one-shot actions.
    pub fn take(&mut self) -> PlayerIntent {
        let intent = self.0;
        self.0.jump = false;
        self.0.fire = false;
        self.0.fire_direction = None;
        intent
    }
}

fn read_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut pending: ResMut<PendingIntent>) {
    let mut axis = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        axis -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        axis += 1.0;
    }
    pending.0.horizontal = axis;

    if keyboard.just_pressed(KeyCode::ArrowUp) || keyboard.just_pressed(KeyCode::KeyW) {
        pending.0.jump = true;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        pending.0.fire = true;
    }
    // Q / E shoot in a fixed direction regardless of facing.
    if keyboard.just_pressed(KeyCode::KeyQ) {
        pending.0.fire = true;
        pending.0.fire_direction = Some(-1.0);
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        pending.0.fire = true;
        pending.0.fire_direction = Some(1.0);
    }
}
