//! `wasm_bindgen` facade for the viewer page.
//!
//! Handlers return the engine's actions as a JSON array
//! (`[{"action": "...", "data": ...}]`). Redraws are carried out here before
//! returning, so the page only has to handle sends, transforms, and UI.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement, HtmlVideoElement};

use crate::camera::Point;
use crate::config::ViewerConfig;
use crate::engine::{Action, Engine, SnapshotSource};
use crate::input::{Button, Tool, WheelDelta};

/// Install the panic hook and route `log` output to the browser console.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct Viewer {
    engine: Engine,
}

impl Viewer {
    fn finish(&mut self, actions: &[Action]) -> Result<String, JsValue> {
        if actions.contains(&Action::RenderNeeded) {
            self.engine.render()?;
        }
        to_json(actions)
    }
}

#[wasm_bindgen]
impl Viewer {
    /// Bind a viewer to the annotation canvas. `config_json` is a `ViewerConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str) -> Result<Viewer, JsValue> {
        let config = ViewerConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("viewer joining room {}", config.room);
        Ok(Self { engine: Engine::new(canvas, config)? })
    }

    pub fn set_viewport(&mut self, x: f64, y: f64, width: f64, height: f64, dpr: f64) -> Result<String, JsValue> {
        let actions = self.engine.set_viewport(x, y, width, height, dpr);
        self.finish(&actions)
    }

    // --- Pointer ---

    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.on_pointer_down(Point::new(x, y), Button::from_dom(button), now_ms);
        self.finish(&actions)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.on_pointer_move(Point::new(x, y), now_ms);
        self.finish(&actions)
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.on_pointer_up(Point::new(x, y), Button::from_dom(button), now_ms);
        self.finish(&actions)
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, now_ms);
        self.finish(&actions)
    }

    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.tick(now_ms);
        self.finish(&actions)
    }

    // --- Tools ---

    pub fn set_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool: Tool = name.parse().map_err(|e: crate::input::UnknownTool| JsValue::from_str(&e.to_string()))?;
        self.engine.core.set_tool(tool);
        Ok(())
    }

    pub fn set_color(&mut self, color: &str) {
        self.engine.core.set_color(color);
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.engine.core.set_thickness(thickness);
    }

    pub fn set_text_size(&mut self, size: f64) {
        self.engine.core.set_text_size(size);
    }

    /// Answer a `request_text` action. `None` or blank cancels.
    pub fn submit_text(&mut self, text: Option<String>) -> Result<String, JsValue> {
        let actions = self.engine.core.submit_text(text);
        self.finish(&actions)
    }

    pub fn undo(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.undo();
        self.finish(&actions)
    }

    pub fn clear_local(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.clear_local();
        self.finish(&actions)
    }

    pub fn reset_view(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.reset_view(now_ms);
        self.finish(&actions)
    }

    // --- Admin ---

    pub fn request_admin(&mut self, key: &str) -> Result<String, JsValue> {
        let actions = self.engine.core.request_admin(key);
        self.finish(&actions)
    }

    pub fn set_broadcast(&mut self, enabled: bool) -> bool {
        self.engine.core.set_broadcast(enabled)
    }

    pub fn set_follow(&mut self, enabled: bool, now_ms: f64) -> Result<String, JsValue> {
        let actions = self.engine.core.set_follow(enabled, now_ms);
        self.finish(&actions)
    }

    pub fn clear_room(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.clear_room();
        self.finish(&actions)
    }

    pub fn trigger_photo(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.trigger_photo();
        self.finish(&actions)
    }

    pub fn broadcast_image(&mut self, image: &str) -> Result<String, JsValue> {
        let actions = self.engine.core.broadcast_image(image);
        self.finish(&actions)
    }

    pub fn return_live(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.return_live();
        self.finish(&actions)
    }

    pub fn kick(&mut self, target: &str) -> Result<String, JsValue> {
        let actions = self.engine.core.kick(target);
        self.finish(&actions)
    }

    // --- Transport ---

    pub fn handle_message(&mut self, text: &str) -> Result<String, JsValue> {
        let actions = self.engine.core.handle_message(text);
        self.finish(&actions)
    }

    pub fn on_transport_open(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.on_transport_open();
        self.finish(&actions)
    }

    pub fn on_transport_closed(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.on_transport_closed();
        self.finish(&actions)
    }

    pub fn on_stream_started(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.core.on_stream_started();
        self.finish(&actions)
    }

    pub fn send_answer(&mut self, sdp: String) -> Result<String, JsValue> {
        let actions = self.engine.core.send_answer(sdp);
        self.finish(&actions)
    }

    /// `candidate_json` is the browser's `RTCIceCandidateInit` as JSON.
    pub fn send_ice_candidate(&mut self, candidate_json: &str) -> Result<String, JsValue> {
        let candidate = serde_json::from_str(candidate_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let actions = self.engine.core.send_ice_candidate(candidate);
        self.finish(&actions)
    }

    // --- Snapshots ---

    pub fn capture_video_snapshot(&self, video: &HtmlVideoElement) -> Result<String, JsValue> {
        self.engine.capture_snapshot(&SnapshotSource::Video(video))
    }

    pub fn capture_image_snapshot(&self, image: &HtmlImageElement) -> Result<String, JsValue> {
        self.engine.capture_snapshot(&SnapshotSource::Image(image))
    }

    // --- Queries ---

    pub fn indicators(&self) -> Result<String, JsValue> {
        to_json(&self.engine.core.indicators())
    }

    pub fn roster(&self) -> Result<String, JsValue> {
        to_json(&self.engine.core.roster)
    }

    pub fn local_id(&self) -> Option<String> {
        self.engine.core.local_id.clone()
    }

    pub fn css_transform(&self) -> String {
        self.engine.core.camera.css_transform()
    }
}
