//! Input model: tools, mouse buttons, tool settings, and the gesture state machine.
//!
//! `Tool` and `ToolSettings` capture what a pointer-down will do. `InputState`
//! is the gesture tracked between pointer-down and pointer-up; the engine's
//! handlers move it between variants.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Pan the view by dragging (default).
    #[default]
    Move,
    /// Freehand paint.
    Draw,
    /// Freehand stroke that erases pixels under it.
    EraseNormal,
    /// Remove whole strokes near the pointer.
    EraseStroke,
    /// Toggle numbered count markers.
    Count,
    /// Place a text label.
    Text,
}

impl Tool {
    pub const ALL: [Tool; 6] = [Self::Move, Self::Draw, Self::EraseNormal, Self::EraseStroke, Self::Count, Self::Text];

    /// Name the host page uses for this tool.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Draw => "draw",
            Self::EraseNormal => "erase-normal",
            Self::EraseStroke => "erase-stroke",
            Self::Count => "count",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_owned()))
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen, or single-finger touch.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value. Unknown values count as secondary.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            _ => Self::Secondary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Paint settings applied to newly created items.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub color: String,
    /// Stroke width in world px; never below 1.
    pub thickness: f64,
    pub text_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self { color: "#ff0000".to_owned(), thickness: 3.0, text_size: 24.0 }
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub tool: Tool,
    pub settings: ToolSettings,
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the view with the move tool.
    Panning {
        /// Screen position of the pointer-down.
        start_screen: Point,
        /// Pan at the pointer-down.
        start_pan: Point,
    },
    /// Extending the stroke at `index` (paint or eraser).
    Drawing { index: usize },
    /// Stroke eraser held down.
    Erasing,
    /// Text tool clicked; waiting for the host to submit the label.
    AwaitingText { world: Point },
}

impl InputState {
    /// Whether a drag/draw/erase gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Panning { .. } | Self::Drawing { .. } | Self::Erasing)
    }
}
