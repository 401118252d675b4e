//! Browser bindings
//!
//! The page owns the animation-frame loop, input, drawing, and audio. It
//! calls into [`WebGame`] once per frame and reads back a JSON [`Frame`].

use wasm_bindgen::prelude::*;

use super::Frame;
use crate::best::BestRecord;
use crate::settings::Settings;
use crate::sim::{GameState, RunStatus, TickInput, Viewport, tick};

/// Install panic and log hooks. Runs once when the module loads.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Moto Mayhem core loaded");
}

/// One game session bound to a page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    best: BestRecord,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a session; a seed of 0 picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, width: f32, height: f32) -> WebGame {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        let settings = Settings::load();
        let best = BestRecord::load();

        let mut state = GameState::new(seed, Viewport::sanitized(width, height));
        state.select_mode(settings.mode.as_str());
        state.best_distance = best.distance;
        log::info!("Session created (seed {})", seed);

        WebGame {
            state,
            best,
            settings,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(Viewport::sanitized(width, height));
    }

    /// Select mode and cosmetics by key; returns the resolved mode key
    pub fn select(&mut self, mode: &str, world: &str, bike: &str, track: &str) -> String {
        self.settings.select(mode, world, bike, track);
        let mode = self.state.select_mode(self.settings.mode.as_str());
        self.settings.mode = mode;
        self.settings.save();
        mode.as_str().to_string()
    }

    /// Select only the mode; returns the resolved key
    pub fn select_mode(&mut self, key: &str) -> String {
        let mode = self.state.select_mode(key);
        self.settings.mode = mode;
        self.settings.save();
        mode.as_str().to_string()
    }

    /// Current settings as JSON
    pub fn settings(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_else(|_| "{}".to_string())
    }

    /// Start or restart a run
    pub fn start(&mut self) {
        self.state.start_run();
    }

    pub fn boost(&mut self) {
        self.state.activate_boost();
    }

    /// Advance one frame and return it as JSON.
    ///
    /// `input` packs held buttons as in [`TickInput::from_bits`].
    pub fn tick(&mut self, dt: f32, input: u8) -> String {
        tick(&mut self.state, &TickInput::from_bits(input), dt);

        if self.state.status != RunStatus::Title && self.best.submit(self.state.best_distance) {
            self.best.save();
        }

        let events = self.state.drain_events();
        Frame::new(&self.state.snapshot(), events).to_json()
    }

    /// Frame JSON without advancing (title screen, paused)
    pub fn frame(&self) -> String {
        Frame::new(&self.state.snapshot(), Vec::new()).to_json()
    }
}
