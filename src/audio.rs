//! Background music and victory fanfare
//!
//! Two looping cues driven by `GameEvent`s. Playback can be refused by the
//! browser (autoplay policy) or fail outright; neither ever blocks the
//! simulation. A refused ambient cue raises `needs_gesture` so the UI can
//! offer a "tap to play music" button.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Result of asking a cue to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Playing (or accepted and about to play)
    Ok,
    /// Refused until the user interacts with the page
    Blocked,
    /// Could not play at all (missing file, decode error)
    Failed,
}

/// A single controllable audio track
pub trait AudioCue {
    /// Start or resume playback
    fn play(&mut self) -> PlaybackStatus;
    fn pause(&mut self);
    /// Seek back to the start
    fn rewind(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Outcome of an asynchronous `play` that settled since the last poll
    fn poll_status(&mut self) -> Option<PlaybackStatus> {
        None
    }
}

/// Cue that plays nothing and always succeeds (native / headless)
#[derive(Debug, Clone, Default)]
pub struct SilentCue {
    pub name: &'static str,
    pub playing: bool,
}

impl SilentCue {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            playing: false,
        }
    }
}

impl AudioCue for SilentCue {
    fn play(&mut self) -> PlaybackStatus {
        log::debug!("[{}] play", self.name);
        self.playing = true;
        PlaybackStatus::Ok
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn rewind(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}

/// Owns both cues and keeps them in step with the session
pub struct Soundtrack<C: AudioCue> {
    ambient: C,
    victory: C,
    ambient_status: PlaybackStatus,
    won: bool,
}

impl<C: AudioCue> Soundtrack<C> {
    pub fn new(ambient: C, victory: C) -> Self {
        Self {
            ambient,
            victory,
            ambient_status: PlaybackStatus::Ok,
            won: false,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.ambient.set_volume(settings.ambient_volume());
        self.victory.set_volume(settings.fanfare_volume());
    }

    /// Try to start the background music
    pub fn start(&mut self) -> PlaybackStatus {
        let status = self.ambient.play();
        self.record_ambient(status);
        status
    }

    /// User asked for music after it was refused
    pub fn retry(&mut self) -> PlaybackStatus {
        if self.won {
            return self.ambient_status;
        }
        self.start()
    }

    /// Whether the "tap to play music" affordance should be visible
    pub fn needs_gesture(&self) -> bool {
        self.ambient_status != PlaybackStatus::Ok
    }

    pub fn ambient_status(&self) -> PlaybackStatus {
        self.ambient_status
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Won => {
                self.won = true;
                self.ambient.pause();
                self.ambient.rewind();
                self.victory.rewind();
                match self.victory.play() {
                    PlaybackStatus::Ok => {}
                    status => log::warn!("Victory fanfare did not start: {:?}", status),
                }
            }
            GameEvent::Restarted => {
                self.won = false;
                self.victory.pause();
                self.victory.rewind();
                self.ambient.pause();
                self.ambient.rewind();
                self.start();
            }
            GameEvent::PlayerReset { .. } => {}
        }
    }

    /// Pick up asynchronous playback outcomes
    pub fn update(&mut self) {
        if let Some(status) = self.ambient.poll_status() {
            self.record_ambient(status);
        }
        if let Some(status) = self.victory.poll_status() {
            if status != PlaybackStatus::Ok {
                log::warn!("Victory fanfare failed: {:?}", status);
            }
        }
    }

    /// Window lost focus
    pub fn suspend(&mut self) {
        self.ambient.pause();
        self.victory.pause();
    }

    /// Window regained focus
    pub fn resume(&mut self) {
        if self.won {
            self.victory.play();
        } else if !self.needs_gesture() {
            self.start();
        }
    }

    pub fn ambient(&self) -> &C {
        &self.ambient
    }

    pub fn victory(&self) -> &C {
        &self.victory
    }

    fn record_ambient(&mut self, status: PlaybackStatus) {
        if status != self.ambient_status {
            match status {
                PlaybackStatus::Ok => log::info!("Background music playing"),
                PlaybackStatus::Blocked => log::warn!("Background music blocked until user gesture"),
                PlaybackStatus::Failed => log::warn!("Background music failed to play"),
            }
        }
        self.ambient_status = status;
    }
}

/// `<audio>` element cue for the browser
#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{DomException, HtmlAudioElement};

    use super::{AudioCue, PlaybackStatus};

    pub struct HtmlAudioCue {
        element: HtmlAudioElement,
        settled: Rc<Cell<Option<PlaybackStatus>>>,
    }

    impl HtmlAudioCue {
        /// Looping track loaded from `src`
        pub fn looping(src: &str) -> Result<Self, JsValue> {
            let element = HtmlAudioElement::new_with_src(src)?;
            element.set_loop(true);
            Ok(Self {
                element,
                settled: Rc::new(Cell::new(None)),
            })
        }
    }

    impl AudioCue for HtmlAudioCue {
        fn play(&mut self) -> PlaybackStatus {
            let promise = match self.element.play() {
                Ok(promise) => promise,
                Err(_) => return PlaybackStatus::Failed,
            };
            let settled = self.settled.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let status = match JsFuture::from(promise).await {
                    Ok(_) => PlaybackStatus::Ok,
                    Err(err) => match err.dyn_ref::<DomException>() {
                        Some(ex) if ex.name() == "NotAllowedError" => PlaybackStatus::Blocked,
                        _ => PlaybackStatus::Failed,
                    },
                };
                settled.set(Some(status));
            });
            PlaybackStatus::Ok
        }

        fn pause(&mut self) {
            let _ = self.element.pause();
        }

        fn rewind(&mut self) {
            self.element.set_current_time(0.0);
        }

        fn set_volume(&mut self, volume: f32) {
            self.element.set_volume(volume.clamp(0.0, 1.0) as f64);
        }

        fn poll_status(&mut self) -> Option<PlaybackStatus> {
            self.settled.take()
        }
    }
}
