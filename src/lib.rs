//! Loza - a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, hazards, camera, game state)
//! - `tuning`: Data-driven physics constants
//! - `settings`: Player preferences
//! - `assets`: Named image catalog with placeholders
//! - `audio`: Ambient/victory cues and playback status
//! - `renderer`: Backend-agnostic draw list
//! - `platform`: Input, frame clock and viewport adapters
//! - `app`: One frame of glue between the adapters and the simulation

pub mod app;
pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::App;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical canvas resolution
    pub const CANVAS_W: f32 = 1024.0;
    pub const CANVAS_H: f32 = 576.0;

    /// Widest aspect ratio the canvas is allowed to stretch to
    pub const MAX_ASPECT: f32 = 1.9;

    /// Nominal frame time used by the headless runner and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Player defaults
    pub const PLAYER_W: f32 = 64.0;
    pub const PLAYER_H: f32 = 64.0;

    /// Floor depth and thickness
    pub const FLOOR_Y: f32 = 520.0;
    pub const FLOOR_H: f32 = 56.0;

    /// Minimum world width, and the room kept past the goal
    pub const MIN_WORLD_WIDTH: f32 = 4000.0;
    pub const GOAL_MARGIN: f32 = 400.0;
}
