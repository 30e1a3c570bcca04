//! Data-driven game balance
//!
//! Every number the simulation uses to move things lives here, so a
//! balance pass never has to touch the physics code.

use serde::{Deserialize, Serialize};

use crate::consts::CANVAS_H;

/// Physics and gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Horizontal run speed (px/s)
    pub run_speed: f32,
    /// Upward velocity applied on jump (px/s, positive number)
    pub jump_impulse: f32,
    /// Longest frame the simulation will integrate in one tick (s)
    pub max_dt: f32,
    /// How far below the canvas the player may fall before a reset
    pub fall_margin: f32,
    /// Distance the camera keeps between its left edge and the player
    pub camera_lead: f32,
    /// Hazard blink cycle length (s)
    pub blink_period: f32,
    /// Portion of the blink cycle that shows the warning cue (s)
    pub blink_window: f32,
    /// Centre-to-centre distance at which the goal starts reacting
    pub goal_near_radius: f32,
    /// Sparkles spawned on the win burst
    pub sparkle_count: usize,
    /// Full width/height of the area the win burst is scattered over
    pub sparkle_spread: (f32, f32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            run_speed: 220.0,
            jump_impulse: 700.0,
            max_dt: 0.03,
            fall_margin: 200.0,
            camera_lead: 200.0,
            blink_period: 3.0,
            blink_window: 0.15,
            goal_near_radius: 300.0,
            sparkle_count: 40,
            sparkle_spread: (220.0, 160.0),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key for developer overrides
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "loza_tuning";

    /// Overrides from LocalStorage, else defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored {
            Some(json) => Self::parse_or_default(&json),
            None => Self::default(),
        }
    }

    /// Overrides from the JSON file named by `LOZA_TUNING`, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("LOZA_TUNING") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::parse_or_default(&json),
            Err(err) => {
                log::warn!("Could not read tuning file {}: {}", path, err);
                Self::default()
            }
        }
    }

    fn parse_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning overrides: {}", err);
                Self::default()
            }
        }
    }

    /// Player y beyond which the player counts as fallen out of the world
    pub fn fall_limit(&self) -> f32 {
        CANVAS_H + self.fall_margin
    }

    /// Clamp a raw frame delta into the range the integrator handles
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}
