//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time only enters through `tick`'s `dt`
//! - Seeded RNG only (and only for cosmetics)
//! - Stable iteration order (level order)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod geom;
pub mod level;
pub mod physics;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use geom::Rect;
pub use level::{
    Decoration, DecorationKind, EntityKind, Goal, Hazard, Level, LevelBuilder, LevelError, Patrol,
};
pub use state::{
    GameEvent, GameState, Player, ResetCause, SessionMode, Sparkle, SparkleColor,
};
pub use tick::{TickInput, tick};
