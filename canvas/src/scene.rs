//! Display list built from the annotation store.
//!
//! `build` turns the store into a flat list of draw commands in store order,
//! resolving everything the renderer would otherwise compute on the fly:
//! composite mode for eraser strokes and each marker's displayed number.
//! The list is pure data so redraw behavior can be tested without a browser.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::camera::Point;
use crate::doc::{Annotation, DocStore, StrokeColor};

/// Canvas compositing mode for a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    DestinationOut,
}

impl Composite {
    /// Value for `globalCompositeOperation`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::DestinationOut => "destination-out",
        }
    }
}

/// One primitive to draw, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Round-capped polyline. A single point draws a dot.
    Polyline { points: Vec<Point>, color: String, width: f64, composite: Composite },
    /// Count marker with its 1-based rank.
    Marker { center: Point, rank: usize, color: String },
    /// Outlined text label.
    Label { position: Point, text: String, color: String, size: f64 },
}

/// Full redraw for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
    pub marker_count: usize,
}

/// Build the display list for `doc`.
///
/// Strokes with no points produce nothing. Eraser strokes draw opaque black
/// with `destination-out` so they remove coverage beneath them.
#[must_use]
pub fn build(doc: &DocStore) -> Scene {
    let mut scene = Scene::default();
    for item in doc.items() {
        match item {
            Annotation::Stroke { points, .. } if points.is_empty() => {}
            Annotation::Stroke { color, width, points } => {
                let (color, composite) = match color {
                    StrokeColor::Eraser => ("#000000".to_owned(), Composite::DestinationOut),
                    StrokeColor::Paint(c) => (c.clone(), Composite::SourceOver),
                };
                scene.commands.push(DrawCommand::Polyline { points: points.clone(), color, width: *width, composite });
            }
            Annotation::Marker { x, y, color } => {
                scene.marker_count += 1;
                scene.commands.push(DrawCommand::Marker {
                    center: Point::new(*x, *y),
                    rank: scene.marker_count,
                    color: color.clone(),
                });
            }
            Annotation::Text { x, y, text, color, size } => {
                scene.commands.push(DrawCommand::Label {
                    position: Point::new(*x, *y),
                    text: text.clone(),
                    color: color.clone(),
                    size: *size,
                });
            }
        }
    }
    scene
}
