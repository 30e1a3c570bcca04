//! Game state and core simulation types
//!
//! One `GameState` is one session: the level, the player, the camera and
//! the win celebration. Everything is mutated through `tick` and
//! `GameState::restart`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geom::Rect;
use super::level::Level;
use crate::consts::*;
use crate::tuning::Tuning;

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Active gameplay
    Playing,
    /// Goal reached; physics stops until restart
    Won,
}

/// Why the player was sent back to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    Obstacle,
    Hazard,
    FellOut,
}

/// Something the I/O layer may want to react to (audio, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Failed attempt; player is back at spawn
    PlayerReset { cause: ResetCause },
    /// Goal reached
    Won,
    /// Session rebuilt from scratch
    Restarted,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    /// +1.0 facing right, -1.0 facing left
    pub facing: f32,
    /// Seconds since the last horizontal input
    pub idle_time: f32,
}

impl Player {
    pub fn spawn(at: Vec2) -> Self {
        Self {
            pos: at,
            size: Vec2::new(PLAYER_W, PLAYER_H),
            vel: Vec2::ZERO,
            grounded: false,
            facing: 1.0,
            idle_time: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Back to spawn, motionless and airborne
    pub fn respawn(&mut self, at: Vec2) {
        self.pos = at;
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }

    /// Standing still on solid ground (drives the idle animation)
    pub fn is_idle(&self) -> bool {
        self.vel.x == 0.0 && self.grounded
    }
}

/// Sparkle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SparkleColor {
    Violet,
    Gold,
}

/// A celebration particle; lives until the session is rebuilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sparkle {
    pub pos: Vec2,
    pub color: SparkleColor,
    /// Seconds since the burst
    pub age: f32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed for the celebration RNG
    pub seed: u64,
    pub tuning: Tuning,
    pub level: Level,
    pub player: Player,
    pub camera: Camera,
    pub mode: SessionMode,
    pub sparkles: Vec<Sparkle>,
    /// Simulation tick counter for the current session
    pub time_ticks: u64,
    /// Pristine copy the level is rebuilt from on restart
    #[serde(skip)]
    blueprint: Level,
    #[serde(skip)]
    events: Vec<GameEvent>,
    #[serde(skip)]
    rng: Pcg32,
}

impl GameState {
    /// New session on the shipped level
    pub fn new(seed: u64) -> Self {
        Self::with_level(Level::canonical(), seed)
    }

    /// New session on an arbitrary (already validated) level
    pub fn with_level(level: Level, seed: u64) -> Self {
        let tuning = Tuning::default();
        let player = Player::spawn(level.spawn);
        let camera = Camera::follow(player.pos.x, level.world_width, CANVAS_W, tuning.camera_lead);
        Self {
            seed,
            tuning,
            blueprint: level.clone(),
            level,
            player,
            camera,
            mode: SessionMode::Playing,
            sparkles: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace the tuning (builder style)
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.camera = Camera::follow(
            self.player.pos.x,
            self.level.world_width,
            CANVAS_W,
            tuning.camera_lead,
        );
        self.tuning = tuning;
        self
    }

    /// Rebuild the level and player and go back to `Playing`, from any mode
    pub fn restart(&mut self) {
        self.level = self.blueprint.clone();
        self.player = Player::spawn(self.level.spawn);
        self.camera = Camera::follow(
            self.player.pos.x,
            self.level.world_width,
            CANVAS_W,
            self.tuning.camera_lead,
        );
        self.sparkles.clear();
        self.mode = SessionMode::Playing;
        self.time_ticks = 0;
        self.events.clear();
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted");
    }

    pub fn is_won(&self) -> bool {
        self.mode == SessionMode::Won
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand pending events to the I/O layer
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Send the player back to spawn without touching anything else
    pub(crate) fn reset_player(&mut self, cause: ResetCause) {
        log::debug!("Player reset ({:?}) at {:?}", cause, self.player.pos);
        self.player.respawn(self.level.spawn);
        self.events.push(GameEvent::PlayerReset { cause });
    }

    /// Enter `Won`. Returns false if the session was already won.
    pub(crate) fn win(&mut self) -> bool {
        if self.mode == SessionMode::Won {
            return false;
        }
        self.mode = SessionMode::Won;
        self.spawn_sparkle_burst();
        self.events.push(GameEvent::Won);
        log::info!("Goal reached after {} ticks", self.time_ticks);
        true
    }

    /// Scatter the celebration around the goal centre
    fn spawn_sparkle_burst(&mut self) {
        let center = self.level.goal.rect.center();
        let (spread_x, spread_y) = self.tuning.sparkle_spread;
        self.sparkles.reserve(self.tuning.sparkle_count);
        for _ in 0..self.tuning.sparkle_count {
            let offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread_x,
                (self.rng.random::<f32>() - 0.5) * spread_y,
            );
            let color = if self.rng.random_bool(0.5) {
                SparkleColor::Violet
            } else {
                SparkleColor::Gold
            };
            self.sparkles.push(Sparkle {
                pos: center + offset,
                color,
                age: 0.0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_spawns_player() {
        let state = GameState::new(1);
        assert_eq!(state.mode, SessionMode::Playing);
        assert_eq!(state.player.pos, Vec2::new(80.0, 380.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.player.grounded);
        assert!(state.sparkles.is_empty());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_with_tuning_replaces_constants_and_camera() {
        let tuning = Tuning {
            camera_lead: 0.0,
            sparkle_count: 5,
            ..Default::default()
        };
        let mut state = GameState::new(1).with_tuning(tuning.clone());
        assert_eq!(state.tuning, tuning);
        assert_eq!(state.camera.offset_x, 80.0);

        state.win();
        assert_eq!(state.sparkles.len(), 5);
    }

    #[test]
    fn test_win_bursts_once() {
        let mut state = GameState::new(7);
        assert!(state.win());
        assert_eq!(state.sparkles.len(), 40);
        assert!(!state.win());
        assert_eq!(state.sparkles.len(), 40);
        assert_eq!(state.take_events(), vec![GameEvent::Won]);
    }

    #[test]
    fn test_sparkles_scatter_around_goal() {
        let mut state = GameState::new(7);
        state.win();
        let center = state.level.goal.rect.center();
        for sparkle in &state.sparkles {
            assert!((sparkle.pos.x - center.x).abs() <= 110.0);
            assert!((sparkle.pos.y - center.y).abs() <= 80.0);
            assert_eq!(sparkle.age, 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        a.win();
        b.win();
        assert_eq!(a.sparkles, b.sparkles);
    }

    #[test]
    fn test_reset_player_keeps_mode_and_level() {
        let mut state = GameState::new(3);
        state.player.pos = Vec2::new(900.0, 100.0);
        state.player.vel = Vec2::new(220.0, -300.0);
        state.player.grounded = true;
        let level = state.level.clone();

        state.reset_player(ResetCause::Hazard);

        assert_eq!(state.player.pos, state.level.spawn);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.player.grounded);
        assert_eq!(state.mode, SessionMode::Playing);
        assert_eq!(state.level, level);
        assert_eq!(
            state.events(),
            &[GameEvent::PlayerReset {
                cause: ResetCause::Hazard
            }]
        );
    }

    #[test]
    fn test_restart_clears_celebration() {
        let mut state = GameState::new(5);
        state.win();
        state.take_events();
        state.restart();
        assert_eq!(state.mode, SessionMode::Playing);
        assert!(state.sparkles.is_empty());
        assert_eq!(state.take_events(), vec![GameEvent::Restarted]);
    }
}
