#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, ZOOM_STEP};

pub use events::Point;

/// Placement of the annotation layer on the page.
///
/// `origin_x` / `origin_y` are the layer's top-left corner in CSS pixels
/// (the canvas bounding rect). `content_width` / `content_height` are the
/// unscaled size of the zoomed content, which normally equals the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Viewport {
    /// A viewport whose content is exactly its own size.
    #[must_use]
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self { origin_x, origin_y, width, height, content_width: width, content_height: height }
    }

    /// Screen point relative to the viewport's top-left corner.
    #[must_use]
    pub fn local(&self, screen: Point) -> Point {
        Point::new(screen.x - self.origin_x, screen.y - self.origin_y)
    }
}

/// Pan/zoom state of the shared view.
///
/// `pan_x` / `pan_y` are in CSS pixels, `scale` is clamped to `[1.0, 5.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    #[serde(rename = "panX")]
    pub pan_x: f64,
    #[serde(rename = "panY")]
    pub pan_y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, scale: MIN_SCALE }
    }
}

/// Clamp a scale into the allowed range. Non-finite input collapses to the minimum.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() { scale.clamp(MIN_SCALE, MAX_SCALE) } else { MIN_SCALE }
}

/// Clamp one pan axis so scaled content never uncovers the viewport.
fn clamp_axis(pan: f64, viewport: f64, content: f64) -> f64 {
    if content < viewport || !pan.is_finite() {
        return 0.0;
    }
    pan.clamp(viewport - content, 0.0)
}

impl ViewTransform {
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, scale: f64) -> Self {
        Self { pan_x, pan_y, scale }
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point, viewport: &Viewport) -> Point {
        let local = viewport.local(screen);
        Point::new((local.x - self.pan_x) / self.scale, (local.y - self.pan_y) / self.scale)
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn to_screen(&self, world: Point, viewport: &Viewport) -> Point {
        Point::new(
            world.x.mul_add(self.scale, self.pan_x) + viewport.origin_x,
            world.y.mul_add(self.scale, self.pan_y) + viewport.origin_y,
        )
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Keep the scaled content covering the viewport on both axes.
    ///
    /// Idempotent: a transform already within bounds is left unchanged.
    pub fn clamp_pan(&mut self, viewport: &Viewport) {
        self.scale = clamp_scale(self.scale);
        self.pan_x = clamp_axis(self.pan_x, viewport.width, viewport.content_width * self.scale);
        self.pan_y = clamp_axis(self.pan_y, viewport.height, viewport.content_height * self.scale);
    }

    /// Zoom by one step in `direction` (positive = in) keeping the world point
    /// under `screen` fixed, then clamp.
    pub fn zoom_at(&mut self, screen: Point, direction: f64, viewport: &Viewport) {
        let world = self.to_world(screen, viewport);
        let local = viewport.local(screen);
        self.scale = clamp_scale((direction * ZOOM_STEP).mul_add(self.scale, self.scale));
        self.pan_x = world.x.mul_add(-self.scale, local.x);
        self.pan_y = world.y.mul_add(-self.scale, local.y);
        self.clamp_pan(viewport);
    }

    /// Set pan from a drag that started at `start_screen` with `start_pan`, then clamp.
    pub fn pan_drag(&mut self, start_pan: Point, start_screen: Point, current: Point, viewport: &Viewport) {
        self.pan_x = start_pan.x + (current.x - start_screen.x);
        self.pan_y = start_pan.y + (current.y - start_screen.y);
        self.clamp_pan(viewport);
    }

    /// CSS `transform` value for the zoomed layer (origin at its top-left).
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan_x, self.pan_y, self.scale)
    }
}
