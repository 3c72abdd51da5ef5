//! Browser bindings
//!
//! The page owns the canvas, drives `tick` every 30ms and draws from the JSON
//! snapshot. Persistence goes through LocalStorage.

use wasm_bindgen::prelude::*;

use crate::highscores::{self, HighScores};
use crate::settings::Settings;
use crate::sim::{GameState, Playfield, Snapshot, TickInput, submit_high_score, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Gun Game (web) starting...");
}

/// One run, owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run on a `width` x `height` canvas. Zero dimensions defer the
    /// first wave until `resize` supplies real ones.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let settings = Settings::load();
        let seed = settings.resolve_seed();
        log::info!("Seed {seed}");
        WebGame {
            state: GameState::new(seed, Playfield::new(width, height), HighScores::load()),
            input: TickInput::default(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_playfield(Playfield::new(width, height));
    }

    /// Queue a shot toward `angle` for the next tick
    pub fn fire(&mut self, angle: f32) {
        self.input.fire = Some(angle);
    }

    /// Queue a restart for the next tick
    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    /// Advance one period. Returns true when the game-over name prompt
    /// should be shown.
    pub fn tick(&mut self) -> bool {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        self.state.player.awaiting_name
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&Snapshot::capture(&self.state))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.leaderboard.entries)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record the prompt's name and persist the board
    pub fn submit_high_score(&mut self, name: &str) -> Result<(), JsValue> {
        submit_high_score(&mut self.state, name, highscores::today())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state.leaderboard.save();
        Ok(())
    }
}
