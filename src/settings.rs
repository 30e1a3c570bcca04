//! Player preferences
//!
//! Persisted in LocalStorage on the web. Only preferences live here;
//! game progress is never saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why stored settings could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("volume {0} is outside [0, 1]")]
    VolumeOutOfRange(f32),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Victory fanfare volume (0.0 - 1.0)
    pub victory_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Pause music when the window loses focus
    pub mute_on_blur: bool,

    // === Controls ===
    /// Show the on-screen arrow buttons
    pub touch_controls: bool,

    // === Accessibility ===
    /// Skip the idle bob and goal bounce animations
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.7,
            victory_volume: 0.8,
            muted: false,
            mute_on_blur: true,
            touch_controls: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for volume in [self.master_volume, self.music_volume, self.victory_volume] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SettingsError::VolumeOutOfRange(volume));
            }
        }
        Ok(())
    }

    /// Effective background music volume (respects mute)
    pub fn ambient_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Effective victory fanfare volume (respects mute)
    pub fn fanfare_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.victory_volume
        }
    }

    /// Flip the mute switch
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Effective idle/bounce animation (respects reduced_motion)
    pub fn animations_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "loza_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(err) => log::warn!("Could not save settings: {}", err),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
