//! Bubble platformer: a side-scrolling platformer where the player traps enemies in bubbles.
//!
//! The simulation core (`level` and everything it owns) is plain Rust advanced one frame at a
//! time by [`level::Level::advance`]. The Bevy plugins in `app`, `input`, `simulation` and
//! `render` only feed it input, step it at 60 Hz, and draw what it reports.

pub mod app;
pub mod boss;
pub mod bubble;
pub mod camera;
pub mod config;
pub mod content;
pub mod enemy;
pub mod error;
pub mod geometry;
pub mod input;
pub mod level;
pub mod movement;
pub mod physics;
pub mod pickup;
pub mod platform;
pub mod player;
pub mod render;
pub mod simulation;
pub mod state;
