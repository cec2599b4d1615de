use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement};

use events::{ClientEvent, Roster, ServerEvent};

use crate::authority::Authority;
use crate::camera::{Point, ViewTransform, Viewport};
use crate::config::ViewerConfig;
use crate::consts::{ERASER_WIDTH_FACTOR, MARKER_HIT_RADIUS_PX, STROKE_HIT_RADIUS_PX};
use crate::doc::{Annotation, DocStore, StrokeColor};
use crate::hit;
use crate::input::{Button, InputState, Tool, UiState, WheelDelta};
use crate::render;
use crate::scene::{self, Scene};
use crate::sync::{ViewMode, ViewSyncThrottle};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host page to carry out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// Send this event to the relay.
    Send(ClientEvent),
    /// The store changed; redraw the annotation layer.
    RenderNeeded,
    /// Marker total after the latest store change.
    MarkerCount(usize),
    /// Apply the view to the zoomed layer.
    ApplyTransform { view: ViewTransform, css: String },
    /// Ask the user for a label to place at this world position.
    RequestText { x: f64, y: f64 },
    Notice(Notice),
    Status(ConnectionStatus),
    /// Show a broadcast still instead of the feed.
    ShowImage(String),
    ShowLive,
    /// Media-signaling event for the host page's peer connection.
    Media(ServerEvent),
    /// Terminal: leave the session page.
    Leave(LeaveReason),
    /// The roster was replaced.
    RosterChanged,
}

/// One-off messages for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    AccessGranted,
    AccessDenied,
    Disconnected,
    JoinError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveReason {
    Kicked,
    SessionEnded,
    JoinError,
}

/// Connection progress shown in the status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    WaitingForHost,
    Negotiating,
    Live,
    Disconnected,
    Ended,
}

impl ConnectionStatus {
    #[must_use]
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::WaitingForHost => "Searching for Host...",
            Self::Negotiating => "Negotiating...",
            Self::Live => "",
            Self::Disconnected => "Disconnected",
            Self::Ended => "Session ended",
        }
    }

    /// Whether pointer input is accepted.
    #[must_use]
    pub fn accepts_input(self) -> bool {
        !matches!(self, Self::Disconnected | Self::Ended)
    }
}

/// Which UI indicators should be shown.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicators {
    pub tool: Tool,
    pub admin_panel: bool,
    pub broadcast: bool,
    pub follow: bool,
    pub live: bool,
    pub static_image: bool,
    pub awaiting_text: bool,
    pub status_text: &'static str,
    pub marker_count: usize,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: ViewerConfig,
    pub doc: DocStore,
    pub camera: ViewTransform,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub authority: Authority,
    pub sync: ViewSyncThrottle,
    pub roster: Roster,
    /// Participant id assigned by the relay's `welcome`.
    pub local_id: Option<String>,
    pub view_mode: ViewMode,
    pub status: ConnectionStatus,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let mut ui = UiState::default();
        ui.settings.color.clone_from(&config.color);
        ui.settings.thickness = config.thickness.max(1.0);
        ui.settings.text_size = config.text_size;
        Self {
            sync: ViewSyncThrottle::new(config.sync_interval_ms),
            config,
            doc: DocStore::new(),
            camera: ViewTransform::default(),
            viewport: Viewport::default(),
            ui,
            input: InputState::default(),
            authority: Authority::default(),
            roster: Roster::new(),
            local_id: None,
            view_mode: ViewMode::default(),
            status: ConnectionStatus::default(),
        }
    }

    // --- Shared action builders ---

    pub(crate) fn redraw(&self) -> Vec<Action> {
        vec![Action::RenderNeeded, Action::MarkerCount(self.doc.marker_count())]
    }

    pub(crate) fn transform_action(&self) -> Action {
        Action::ApplyTransform { view: self.camera, css: self.camera.css_transform() }
    }

    pub(crate) fn set_status(&mut self, status: ConnectionStatus) -> Vec<Action> {
        if self.status == status {
            return vec![];
        }
        self.status = status;
        vec![Action::Status(status)]
    }

    /// Publish the current view and, when following, offer it to the throttle.
    fn view_changed(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = vec![self.transform_action()];
        if self.authority.should_follow() {
            if let Some(view) = self.sync.offer(self.camera, now_ms) {
                actions.extend(self.sync_message(&view));
            }
        }
        actions
    }

    fn flush_sync(&mut self, now_ms: f64) -> Vec<Action> {
        if !self.authority.should_follow() {
            return vec![];
        }
        match self.sync.flush(now_ms) {
            Some(view) => self.sync_message(&view),
            None => vec![],
        }
    }

    fn sync_message(&self, view: &ViewTransform) -> Vec<Action> {
        self.authority.sync_view(&self.config.room, view).map(Action::Send).into_iter().collect()
    }

    /// Redraw plus a broadcast of `index` when broadcast is on.
    fn committed(&self, index: usize) -> Vec<Action> {
        let mut actions = self.redraw();
        if let Some(item) = self.doc.get(index) {
            actions.extend(self.authority.broadcast_item(&self.config.room, item).map(Action::Send));
        }
        actions
    }

    fn cancel_drawing(&mut self) {
        if matches!(self.input, InputState::Drawing { .. }) {
            self.input = InputState::Idle;
        }
    }

    fn erase_strokes_at(&mut self, world: Point) -> Vec<Action> {
        let radius = self.camera.screen_dist_to_world(STROKE_HIT_RADIUS_PX);
        let hits = hit::strokes_at(&self.doc, world, radius);
        if hits.is_empty() {
            return vec![];
        }
        for index in hits {
            self.doc.remove_at(index);
        }
        self.redraw()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _now_ms: f64) -> Vec<Action> {
        if !self.status.accepts_input() || button != Button::Primary || !screen_pt.is_finite() {
            return vec![];
        }
        if matches!(self.input, InputState::AwaitingText { .. }) {
            return vec![];
        }
        let world = self.camera.to_world(screen_pt, &self.viewport);
        let settings = &self.ui.settings;

        match self.ui.tool {
            Tool::Move => {
                self.input = InputState::Panning { start_screen: screen_pt, start_pan: self.camera.pan() };
                vec![]
            }
            Tool::Draw | Tool::EraseNormal => {
                let stroke = if self.ui.tool == Tool::Draw {
                    Annotation::Stroke {
                        color: StrokeColor::Paint(settings.color.clone()),
                        width: settings.thickness,
                        points: vec![world],
                    }
                } else {
                    Annotation::Stroke {
                        color: StrokeColor::Eraser,
                        width: settings.thickness * ERASER_WIDTH_FACTOR,
                        points: vec![world],
                    }
                };
                let index = self.doc.append(stroke);
                self.input = InputState::Drawing { index };
                self.redraw()
            }
            Tool::EraseStroke => {
                self.input = InputState::Erasing;
                self.erase_strokes_at(world)
            }
            Tool::Count => {
                let radius = self.camera.screen_dist_to_world(MARKER_HIT_RADIUS_PX);
                if let Some(index) = hit::marker_at(&self.doc, world, radius) {
                    self.doc.remove_at(index);
                    return self.redraw();
                }
                let index =
                    self.doc.append(Annotation::Marker { x: world.x, y: world.y, color: settings.color.clone() });
                self.committed(index)
            }
            Tool::Text => {
                self.input = InputState::AwaitingText { world };
                vec![Action::RequestText { x: world.x, y: world.y }]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, now_ms: f64) -> Vec<Action> {
        if !self.status.accepts_input() || !screen_pt.is_finite() {
            return vec![];
        }
        match self.input {
            InputState::Panning { start_screen, start_pan } => {
                self.camera.pan_drag(start_pan, start_screen, screen_pt, &self.viewport);
                self.view_changed(now_ms)
            }
            InputState::Drawing { index } => {
                let world = self.camera.to_world(screen_pt, &self.viewport);
                if self.doc.push_point(index, world) { self.redraw() } else { vec![] }
            }
            InputState::Erasing => {
                let world = self.camera.to_world(screen_pt, &self.viewport);
                self.erase_strokes_at(world)
            }
            InputState::Idle | InputState::AwaitingText { .. } => vec![],
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary {
            return vec![];
        }
        match self.input {
            InputState::Panning { .. } => {
                self.input = InputState::Idle;
                self.flush_sync(now_ms)
            }
            InputState::Drawing { index } => {
                self.input = InputState::Idle;
                match self.doc.get(index) {
                    Some(stroke) => {
                        self.authority.broadcast_item(&self.config.room, stroke).map(Action::Send).into_iter().collect()
                    }
                    None => vec![],
                }
            }
            InputState::Erasing => {
                self.input = InputState::Idle;
                vec![]
            }
            InputState::Idle | InputState::AwaitingText { .. } => vec![],
        }
    }

    /// Zoom one step toward (`dy < 0`) or away from the content under the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, now_ms: f64) -> Vec<Action> {
        let no_zoom = !delta.dy.is_finite() || delta.dy.abs() < f64::EPSILON;
        if !self.status.accepts_input() || !screen_pt.is_finite() || no_zoom {
            return vec![];
        }
        self.camera.zoom_at(screen_pt, -delta.dy.signum(), &self.viewport);
        // A drag in progress continues from the zoomed view.
        if let InputState::Panning { .. } = self.input {
            self.input = InputState::Panning { start_screen: screen_pt, start_pan: self.camera.pan() };
        }
        self.view_changed(now_ms)
    }

    /// Complete a pending text placement. Blank or missing text cancels it.
    pub fn submit_text(&mut self, text: Option<String>) -> Vec<Action> {
        let InputState::AwaitingText { world } = self.input else {
            return vec![];
        };
        self.input = InputState::Idle;
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return vec![];
        };
        let settings = &self.ui.settings;
        let index = self.doc.append(Annotation::Text {
            x: world.x,
            y: world.y,
            text,
            color: settings.color.clone(),
            size: settings.text_size,
        });
        self.committed(index)
    }

    /// Drive time-based work (pending view sync).
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        self.flush_sync(now_ms)
    }

    // --- Tool / settings ---

    /// Set the active tool, cancelling any drag in progress. A pending text
    /// placement survives so its prompt can still be answered.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.input.is_dragging() {
            self.input = InputState::Idle;
        }
        self.ui.tool = tool;
    }

    pub fn set_color(&mut self, color: &str) {
        if !color.is_empty() {
            color.clone_into(&mut self.ui.settings.color);
        }
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        if thickness.is_finite() {
            self.ui.settings.thickness = thickness.max(1.0);
        }
    }

    pub fn set_text_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.ui.settings.text_size = size;
        }
    }

    /// Update the layer placement (CSS px) and re-clamp the view.
    pub fn set_viewport(&mut self, origin_x: f64, origin_y: f64, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Viewport::new(origin_x, origin_y, width, height);
        self.camera.clamp_pan(&self.viewport);
        let mut actions = vec![self.transform_action()];
        actions.extend(self.redraw());
        actions
    }

    // --- Local edits ---

    /// Remove the last item. Local only.
    pub fn undo(&mut self) -> Vec<Action> {
        if self.doc.undo().is_none() {
            return vec![];
        }
        self.cancel_drawing();
        self.redraw()
    }

    /// Clear the local store. Local only.
    pub fn clear_local(&mut self) -> Vec<Action> {
        self.cancel_drawing();
        self.doc.clear();
        self.redraw()
    }

    /// Back to the unzoomed view.
    pub fn reset_view(&mut self, now_ms: f64) -> Vec<Action> {
        self.camera = ViewTransform::default();
        self.view_changed(now_ms)
    }

    // --- Admin ---

    pub fn request_admin(&mut self, key: &str) -> Vec<Action> {
        self.authority.request_access(key, &self.config.room).map(Action::Send).into_iter().collect()
    }

    /// Returns whether the toggle was applied.
    pub fn set_broadcast(&mut self, enabled: bool) -> bool {
        self.authority.set_broadcast(enabled)
    }

    /// Turning follow on immediately publishes the current view.
    pub fn set_follow(&mut self, enabled: bool, now_ms: f64) -> Vec<Action> {
        if !self.authority.set_follow(enabled) {
            return vec![];
        }
        self.sync.reset();
        if !enabled {
            return vec![];
        }
        match self.sync.offer(self.camera, now_ms) {
            Some(view) => self.sync_message(&view),
            None => vec![],
        }
    }

    /// Clear everyone's annotations, including our own.
    pub fn clear_room(&mut self) -> Vec<Action> {
        let Some(msg) = self.authority.clear_all(&self.config.room) else {
            return vec![];
        };
        self.cancel_drawing();
        self.doc.clear();
        let mut actions = vec![Action::Send(msg)];
        actions.extend(self.redraw());
        actions
    }

    pub fn trigger_photo(&mut self) -> Vec<Action> {
        self.authority.trigger_photo(&self.config.room).map(Action::Send).into_iter().collect()
    }

    pub fn broadcast_image(&mut self, image: &str) -> Vec<Action> {
        self.authority.broadcast_image(&self.config.room, image).map(Action::Send).into_iter().collect()
    }

    pub fn return_live(&mut self) -> Vec<Action> {
        self.authority.return_live(&self.config.room).map(Action::Send).into_iter().collect()
    }

    pub fn kick(&mut self, target: &str) -> Vec<Action> {
        if self.local_id.as_deref() == Some(target) {
            return vec![];
        }
        self.authority.kick(&self.config.room, target).map(Action::Send).into_iter().collect()
    }

    // --- Transport ---

    /// The room connection opened: join and re-send any stored admin key.
    pub fn on_transport_open(&mut self) -> Vec<Action> {
        if self.status == ConnectionStatus::Ended {
            return vec![];
        }
        let mut actions = self.set_status(ConnectionStatus::WaitingForHost);
        actions.push(Action::Send(ClientEvent::JoinRoom {
            room: self.config.room.clone(),
            name: self.config.display_name.clone(),
        }));
        actions.extend(self.authority.reauthorize(&self.config.room).map(Action::Send));
        actions
    }

    pub fn on_transport_closed(&mut self) -> Vec<Action> {
        if self.status == ConnectionStatus::Ended {
            return vec![];
        }
        log::warn!("room connection lost");
        self.authority.disconnect();
        self.sync.reset();
        if self.input.is_dragging() {
            self.input = InputState::Idle;
        }
        let mut actions = self.set_status(ConnectionStatus::Disconnected);
        actions.push(Action::Notice(Notice::Disconnected));
        actions
    }

    /// The host's media stream arrived.
    pub fn on_stream_started(&mut self) -> Vec<Action> {
        self.set_status(ConnectionStatus::Live)
    }

    /// Decode and apply one text frame from the relay. Malformed frames are dropped.
    pub fn handle_message(&mut self, text: &str) -> Vec<Action> {
        match events::decode::<ServerEvent>(text) {
            Ok(event) => self.apply_server_event(event),
            Err(err) => {
                log::warn!("dropping relay message: {err}");
                vec![]
            }
        }
    }

    pub fn send_answer(&self, sdp: String) -> Vec<Action> {
        vec![Action::Send(ClientEvent::Answer { room: self.config.room.clone(), sdp })]
    }

    pub fn send_ice_candidate(&self, candidate: Value) -> Vec<Action> {
        vec![Action::Send(ClientEvent::IceCandidate { room: self.config.room.clone(), target: None, candidate })]
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> Scene {
        scene::build(&self.doc)
    }

    #[must_use]
    pub fn indicators(&self) -> Indicators {
        Indicators {
            tool: self.ui.tool,
            admin_panel: self.authority.is_admin(),
            broadcast: self.authority.should_broadcast(),
            follow: self.authority.should_follow(),
            live: self.status == ConnectionStatus::Live,
            static_image: matches!(self.view_mode, ViewMode::StaticImage(_)),
            awaiting_text: matches!(self.input, InputState::AwaitingText { .. }),
            status_text: self.status.status_text(),
            marker_count: self.doc.marker_count(),
        }
    }

    /// Whether roster entry `id` is this viewer.
    #[must_use]
    pub fn is_me(&self, id: &str) -> bool {
        self.local_id.as_deref() == Some(id)
    }
}

/// Source frame for a gallery snapshot.
pub enum SnapshotSource<'a> {
    Video(&'a HtmlVideoElement),
    Image(&'a HtmlImageElement),
}

/// The full canvas engine. Wraps `EngineCore` and owns the annotation canvas.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the annotation canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: ViewerConfig) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx, dpr: 1.0, core: EngineCore::new(config) })
    }

    /// Resize the backing store for `dpr` and update the core viewport.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, origin_x: f64, origin_y: f64, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((width * self.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height * self.dpr).round().max(0.0) as u32);
        self.core.set_viewport(origin_x, origin_y, width, height)
    }

    /// Draw the current store. Returns the marker count.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<usize, JsValue> {
        let scene = self.core.scene();
        let vp = &self.core.viewport;
        render::draw(&self.ctx, &scene, vp.width, vp.height, self.dpr)?;
        Ok(scene.marker_count)
    }

    /// Composite the feed (or still) with the annotations into a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the offscreen canvas cannot be created or drawn.
    pub fn capture_snapshot(&self, source: &SnapshotSource<'_>) -> Result<String, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let out: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let width = self.canvas.width();
        let height = self.canvas.height();
        out.set_width(width);
        out.set_height(height);
        let ctx = context_2d(&out)?;
        let (w, h) = (f64::from(width), f64::from(height));

        match source {
            SnapshotSource::Video(video) => ctx.draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, w, h)?,
            SnapshotSource::Image(image) => ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)?,
        }
        ctx.draw_image_with_html_canvas_element_and_dw_and_dh(&self.canvas, 0.0, 0.0, w, h)?;
        out.to_data_url_with_type("image/png")
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    let ctx = canvas.get_context("2d")?.ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
    Ok(ctx.dyn_into::<CanvasRenderingContext2d>()?)
}
