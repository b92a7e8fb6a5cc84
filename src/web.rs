//! Browser bindings
//!
//! A thin handle for the JavaScript host: it forwards input state, drives
//! ticks from `requestAnimationFrame` timestamps and hands back JSON
//! snapshots and cue names. Drawing and audio stay on the JS side.

use wasm_bindgen::prelude::*;

use crate::audio::Cue;
use crate::frame::FramePacer;
use crate::sim::{Field, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Brick Pong starting...");
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    pacer: FramePacer,
    input: TickInput,
    cues: Vec<Cue>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be a partial override; bad JSON falls back to defaults
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u64, tuning_json: Option<String>) -> WebGame {
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(err)) => {
                log::warn!("Using default tuning: {err:#}");
                Tuning::default()
            }
            None => Tuning::default(),
        };
        let pacer = FramePacer::new(tuning.min_frame_interval_ms());
        log::info!("Game initialized with seed: {seed}");
        Self {
            state: GameState::new(seed, Field::new(width, height), tuning),
            pacer,
            input: TickInput::default(),
            cues: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.state.start();
        self.pacer.suspend();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.pacer.suspend();
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) {
        self.state.next_level();
        self.pacer.suspend();
    }

    pub fn resize(&mut self, width: f32, height: f32, scale_factor: f32) {
        self.state
            .resize(Field::new(width, height).with_scale_factor(scale_factor));
    }

    #[wasm_bindgen(js_name = setKeys)]
    pub fn set_keys(&mut self, left: bool, right: bool) {
        self.input.move_left = left;
        self.input.move_right = right;
    }

    /// Pointer x in field units, or `None` when the pointer is released
    #[wasm_bindgen(js_name = setPaddleTarget)]
    pub fn set_paddle_target(&mut self, x: Option<f32>) {
        self.input.paddle_target = x;
    }

    pub fn launch(&mut self) {
        self.input.launch = true;
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
        log::info!("Autopilot: {on}");
    }

    /// Tab hidden or window blurred; the next frame starts a fresh baseline
    pub fn suspend(&mut self) {
        self.pacer.suspend();
    }

    /// Animation frame callback. Returns true if the simulation advanced.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let Some(frame) = self.pacer.poll(now_ms) else {
            return false;
        };
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        tick(&mut self.state, &self.input, &frame, &mut self.cues);
        self.input.launch = false;
        true
    }

    /// Current state as JSON for the renderer
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.snapshot())?)
    }

    /// Cue names fired since the last call, oldest first
    #[wasm_bindgen(js_name = drainCues)]
    pub fn drain_cues(&mut self) -> js_sys::Array {
        self.cues
            .drain(..)
            .map(|cue| JsValue::from_str(cue.name()))
            .collect()
    }
}
