//! High-level plugin composition.
//!
//! `BubblePlatformerPlugin` registers the input, simulation and render plugins and fixes the
//! order in which their systems run.

use bevy::prelude::*;

use crate::input::InputPlugin;
use crate::render::RenderPlugin;
use crate::simulation::SimulationPlugin;
use crate::state::{toggle_pause, GameSet, GameState};

/// Bundles the input, simulation and render plugins into the one plugin `main` adds.
pub struct BubblePlatformerPlugin;

impl Plugin for BubblePlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                InputPlugin,      // Keyboard -> PlayerIntent.
                SimulationPlugin, // Level loading + fixed-rate stepping.
                RenderPlugin,     // Camera + debug drawing.
            ))
            // Input is gathered in Update and consumed by the FixedUpdate step; drawing comes
            // last so it shows the newest state.
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Presentation).chain(),
            )
            .add_systems(Update, toggle_pause.before(GameSet::Input));
    }
}
