//! One frame of the game, independent of the browser
//!
//! `App` owns the session, the soundtrack and the frame clock. The runner
//! feeds it timestamps and input and paints whatever `scene` returns.

use crate::assets::{AssetCatalog, ImageHandle};
use crate::audio::{AudioCue, PlaybackStatus, Soundtrack};
use crate::platform::{FrameClock, InputState};
use crate::renderer::{DrawList, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

pub struct App<C: AudioCue> {
    pub state: GameState,
    pub soundtrack: Soundtrack<C>,
    clock: FrameClock,
    settings: Settings,
}

impl<C: AudioCue> App<C> {
    pub fn new(state: GameState, ambient: C, victory: C, settings: Settings) -> Self {
        let mut soundtrack = Soundtrack::new(ambient, victory);
        soundtrack.apply_settings(&settings);
        let clock = FrameClock::new(state.tuning.max_dt);
        Self {
            state,
            soundtrack,
            clock,
            settings,
        }
    }

    /// Kick off the background music
    pub fn start(&mut self) -> PlaybackStatus {
        self.soundtrack.start()
    }

    /// Advance one animation frame. Returns the events it produced.
    pub fn frame(&mut self, now_ms: f64, input: &mut InputState) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        tick(&mut self.state, input.intent_mut(), dt);
        let events = self.dispatch_events();
        self.soundtrack.update();
        events
    }

    /// "Play again": rebuild the session, drop held input and re-anchor
    /// the clock
    pub fn restart(&mut self, now_ms: f64, input: &mut InputState) -> Vec<GameEvent> {
        input.release_all();
        self.state.restart();
        self.clock.resume(now_ms);
        self.dispatch_events()
    }

    /// The frame loop idles while the win screen is up
    pub fn wants_frame(&self) -> bool {
        !self.state.is_won()
    }

    /// Window lost focus
    pub fn blur(&mut self, input: &mut InputState) {
        input.release_all();
        if self.settings.mute_on_blur {
            self.soundtrack.suspend();
        }
    }

    /// Window regained focus
    pub fn focus(&mut self, now_ms: f64) {
        self.clock.resume(now_ms);
        if self.settings.mute_on_blur {
            self.soundtrack.resume();
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.soundtrack.apply_settings(&settings);
        self.settings = settings;
    }

    /// Draw list for the current state
    pub fn scene<H: ImageHandle>(&self, assets: &AssetCatalog<H>, time_ms: f64) -> DrawList {
        build_scene(&self.state, assets, &self.settings, time_ms)
    }

    fn dispatch_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.take_events();
        for event in &events {
            self.soundtrack.handle(event);
        }
        events
    }
}
