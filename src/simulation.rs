//! Runs the level inside Bevy: loads configuration and content when entering `Loading`, then
//! advances the level once per fixed 60 Hz tick while `Playing`.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::content::LevelContent;
use crate::input::PendingIntent;
use crate::level::{Level, LevelEvent, LevelOutcome};
use crate::state::{GameSet, GameState};

/// Design rate of the simulation. All frame counts in the configuration assume it.
pub const SIMULATION_HZ: f64 = 60.0;

/// Loads the level and steps it on the fixed timestep.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .init_resource::<LevelConfig>()
            .add_systems(OnEnter(GameState::Loading), load_level)
            .add_systems(
                FixedUpdate,
                step_level
                    .in_set(GameSet::Simulation)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<ActiveLevel>),
            );
    }
}

/// Where the level content table and the optional tuning file live.
#[derive(Resource, Clone, Debug)]
pub struct LevelConfig {
    pub content_path: String,
    pub config_path: Option<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            content_path: "assets/levels/level_1.json".to_owned(),
            config_path: Some("assets/config.json".to_owned()),
        }
    }
}

#[derive(Resource)]
pub struct ActiveLevel(pub Level);

fn load_level(
    mut commands: Commands,
    level_config: Res<LevelConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let config = match level_config.config_path.as_deref() {
        Some(path) => GameConfig::load(path).unwrap_or_else(|err| {
            warn!("{err}; continuing with default tuning.");
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    let content = LevelContent::load(&level_config.content_path).unwrap_or_else(|err| {
        warn!("{err}; continuing with the built-in demo level.");
        LevelContent::demo()
    });

    commands.insert_resource(config.clone());
    commands.insert_resource(ActiveLevel(Level::new(&content, config)));
    next_state.set(GameState::Playing);
}

fn step_level(
    mut level: ResMut<ActiveLevel>,
    mut pending: ResMut<PendingIntent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let level = &mut level.0;
    level.advance(&pending.take());

    for event in level.drain_events() {
        log_event(&event);
    }

    match level.outcome() {
        LevelOutcome::Running => {}
        LevelOutcome::PlayerDefeated => {
            info!(
                "Game over after {} frames, score {}",
                level.frame(),
                level.player().score()
            );
            next_state.set(GameState::GameOver);
        }
        LevelOutcome::BossDefeated => {
            info!(
                "Level '{}' cleared after {} frames, score {}",
                level.name(),
                level.frame(),
                level.player().score()
            );
            next_state.set(GameState::GameOver);
        }
    }
}

fn log_event(event: &LevelEvent) {
    match event {
        LevelEvent::PlayerHurt { lives_left } => info!("Player hurt, {lives_left} lives left"),
        LevelEvent::ExtraLife => info!("Extra life"),
        LevelEvent::BossHit { health_left } => info!("Boss hit, {health_left} health left"),
        LevelEvent::BossDefeated => info!("Boss defeated"),
        other => debug!("{other:?}"),
    }
}
