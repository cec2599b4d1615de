//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed view scale (content exactly fills the viewport).
pub const MIN_SCALE: f64 = 1.0;

/// Largest allowed view scale.
pub const MAX_SCALE: f64 = 5.0;

/// Relative scale change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels within which the stroke eraser hits a stroke point.
pub const STROKE_HIT_RADIUS_PX: f64 = 10.0;

/// Screen-space radius in pixels within which the count tool hits a marker.
pub const MARKER_HIT_RADIUS_PX: f64 = 15.0;

// ── Drawing ─────────────────────────────────────────────────────

/// Eraser width as a multiple of the current thickness.
pub const ERASER_WIDTH_FACTOR: f64 = 5.0;

/// Marker dot radius in world units.
pub const MARKER_RADIUS: f64 = 12.0;

/// Outline width drawn around text labels, in world units.
pub const TEXT_OUTLINE_WIDTH: f64 = 3.0;

// ── Sync ────────────────────────────────────────────────────────

/// Minimum interval between outbound view-sync messages.
pub const SYNC_VIEW_INTERVAL_MS: f64 = 100.0;
