//! Application entry point: window configuration plus the game plugin.

use bevy::prelude::*;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};

use bubble_platformer::app::BubblePlatformerPlugin;
use bubble_platformer::config::ScreenSettings;

fn main() {
    // Rust panics in WASM just abort; route the message to the browser console instead.
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    console_error_panic_hook::set_once();

    // The simulation viewport is fixed, so the window opens at exactly that size.
    let screen = ScreenSettings::default();
    let primary_window = Window {
        title: "Bubble Platformer".to_string(),
        resolution: WindowResolution::new(screen.width, screen.height),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: screen.width * 0.5,
            min_height: screen.height * 0.5,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.05, 0.06, 0.1)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        }))
        .add_plugins(BubblePlatformerPlugin)
        .run();
}
