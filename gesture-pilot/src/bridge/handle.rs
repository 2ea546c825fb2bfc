//! PilotHandle - the JS-facing session object
//!
//! Each handle owns one `PilotSession`. Timestamps come from the JS clock;
//! every query returns a JSON string.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::landmarks::{finite_frame, parse_landmarks};
use crate::classifier::gesture_catalog;
use crate::config::PilotConfig;
use crate::error::PilotError;
use crate::session::PilotSession;
use crate::smoothing::Sensitivity;

impl From<PilotError> for JsValue {
    fn from(err: PilotError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Wall clock in seconds
fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    Ok(serde_json::to_string(value).map_err(PilotError::from)?)
}

#[wasm_bindgen]
pub struct PilotHandle {
    session: PilotSession,
}

#[wasm_bindgen]
impl PilotHandle {
    /// Create a session, optionally from a JSON config document
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PilotHandle, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => PilotConfig::from_json(json)?,
            _ => PilotConfig::default(),
        };
        web_sys::console::log_1(&"✅ Gesture pilot session ready".into());
        Ok(PilotHandle {
            session: PilotSession::new(config),
        })
    }

    /// Run one frame of landmarks (63 floats, or empty for no hand)
    pub fn process_landmarks(&mut self, data: &[f32]) -> Result<String, JsValue> {
        let frame = match parse_landmarks(data) {
            Ok(frame) => frame,
            Err(err) => {
                web_sys::console::warn_1(&err.to_string().into());
                return Err(err.into());
            }
        };
        let report = self.session.step(finite_frame(frame).as_ref(), now_secs());
        to_json(&report)
    }

    /// Record a frame in which no hand was detected
    pub fn process_no_hand(&mut self) -> Result<String, JsValue> {
        let report = self.session.step(None, now_secs());
        to_json(&report)
    }

    /// Advance physics without a frame; returns the status
    pub fn tick(&mut self) -> Result<String, JsValue> {
        self.session.tick(now_secs());
        to_json(&self.session.status())
    }

    /// Manual command at full confidence
    pub fn command(&mut self, name: &str) -> Result<String, JsValue> {
        let reply = self.session.command(name);
        to_json(&reply)
    }

    pub fn stop_movement(&mut self, direction: &str) -> Result<String, JsValue> {
        let reply = self.session.stop_movement(direction);
        to_json(&reply)
    }

    pub fn set_sensitivity(&mut self, level: &str) -> Result<(), JsValue> {
        let level: Sensitivity = level.parse()?;
        self.session.set_sensitivity(level);
        web_sys::console::log_1(&format!("🎚️ Sensitivity set to {}", level).into());
        Ok(())
    }

    /// Returns the multiplier actually applied after clamping
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> f32 {
        self.session.set_speed_multiplier(multiplier)
    }

    pub fn status(&self) -> Result<String, JsValue> {
        to_json(&self.session.status())
    }

    pub fn statistics(&self) -> Result<String, JsValue> {
        to_json(&self.session.statistics())
    }

    /// Supported gestures with descriptions
    pub fn gestures() -> Result<String, JsValue> {
        to_json(&gesture_catalog())
    }

    pub fn reset(&mut self) {
        self.session.reset();
        web_sys::console::log_1(&"🔄 Session reset".into());
    }
}
