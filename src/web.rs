//! Browser bindings
//!
//! The page owns the canvas, audio and storage. It forwards DOM events
//! here, calls `frame` from `requestAnimationFrame`, and reads the HUD,
//! scene and events back as JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::platform::Key;
use crate::sim::DevCommand;
use crate::{PersistedProfile, Session, Settings};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Neon Siege core loaded");
}

fn to_js_err(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// `profile_json` and `settings_json` are the raw LocalStorage values
    #[wasm_bindgen(constructor)]
    pub fn new(
        seed: f64,
        width: f32,
        height: f32,
        profile_json: Option<String>,
        settings_json: Option<String>,
    ) -> WebGame {
        let profile = PersistedProfile::load_or_default(profile_json.as_deref());
        let settings = Settings::load_or_default(settings_json.as_deref());
        let seed = if seed.is_finite() && seed >= 0.0 {
            seed as u64
        } else {
            0
        };
        WebGame {
            session: Session::new(seed, Vec2::new(width, height), profile, settings),
        }
    }

    pub fn frame(&mut self, now_ms: f64) {
        self.session.frame(now_ms);
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(key) = Key::from_dom(key) {
            self.session.input_mut().key_down(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = Key::from_dom(key) {
            self.session.input_mut().key_up(key);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.input_mut().pointer_move(x, y);
    }

    pub fn set_fire(&mut self, held: bool) {
        self.session.input_mut().set_fire(held);
    }

    pub fn request_dash(&mut self) {
        self.session.input_mut().request_dash();
    }

    pub fn toggle_pause(&mut self) {
        self.session.input_mut().toggle_pause();
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.session.input_mut().set_idle_mode(on);
    }

    pub fn visibility_changed(&mut self, visible: bool) {
        self.session.visibility_changed(visible);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn hud_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.hud()).map_err(to_js_err)
    }

    pub fn scene_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.scene()).map_err(to_js_err)
    }

    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.drain_events()).map_err(to_js_err)
    }

    pub fn profile_json(&self) -> Result<String, JsValue> {
        self.session.state().profile().to_json().map_err(to_js_err)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.session.settings().to_json().map_err(to_js_err)
    }

    pub fn apply_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(to_js_err)?;
        self.session.apply_settings(settings);
        Ok(())
    }

    /// Dev console entry, e.g. `{"cmd":"set_wave","value":10}`
    pub fn dev_command(&mut self, json: &str) -> Result<(), JsValue> {
        let cmd: DevCommand = serde_json::from_str(json).map_err(to_js_err)?;
        self.session.apply_dev(cmd);
        Ok(())
    }
}
