//! Rendering: draws a [`Scene`] onto the annotation layer's 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It draws in world coordinates; pan and zoom are applied by the host as a
//! CSS transform on the layer, so the context only carries the device pixel
//! ratio. Every pass is a full redraw.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Point;
use crate::consts::{MARKER_RADIUS, TEXT_OUTLINE_WIDTH};
use crate::scene::{Composite, DrawCommand, Scene};

/// Marker outline width in world px.
const MARKER_OUTLINE_WIDTH: f64 = 2.0;

/// Draw the full scene.
///
/// `width` and `height` are the layer size in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);

    for command in &scene.commands {
        match command {
            DrawCommand::Polyline { points, color, width, composite } => {
                draw_polyline(ctx, points, color, *width, *composite)?;
            }
            DrawCommand::Marker { center, rank, color } => draw_marker(ctx, *center, *rank, color)?,
            DrawCommand::Label { position, text, color, size } => draw_label(ctx, *position, text, color, *size)?,
        }
    }

    ctx.set_global_composite_operation(Composite::SourceOver.as_str())?;
    Ok(())
}

fn draw_polyline(
    ctx: &CanvasRenderingContext2d,
    points: &[Point],
    color: &str,
    width: f64,
    composite: Composite,
) -> Result<(), JsValue> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    ctx.set_global_composite_operation(composite.as_str())?;

    if rest.is_empty() {
        // Lone point: a round dot the diameter of the stroke.
        ctx.begin_path();
        ctx.arc(first.x, first.y, width * 0.5, 0.0, TAU)?;
        ctx.set_fill_style_str(color);
        ctx.fill();
        return Ok(());
    }

    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.stroke();
    Ok(())
}

fn draw_marker(ctx: &CanvasRenderingContext2d, center: Point, rank: usize, color: &str) -> Result<(), JsValue> {
    ctx.set_global_composite_operation(Composite::SourceOver.as_str())?;

    ctx.begin_path();
    ctx.arc(center.x, center.y, MARKER_RADIUS, 0.0, TAU)?;
    ctx.set_fill_style_str(color);
    ctx.fill();
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(MARKER_OUTLINE_WIDTH);
    ctx.stroke();

    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("bold 12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&rank.to_string(), center.x, center.y)
}

fn draw_label(
    ctx: &CanvasRenderingContext2d,
    position: Point,
    text: &str,
    color: &str,
    size: f64,
) -> Result<(), JsValue> {
    ctx.set_global_composite_operation(Composite::SourceOver.as_str())?;
    ctx.set_font(&format!("bold {size}px sans-serif"));
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");

    ctx.set_stroke_style_str("#000000");
    ctx.set_line_width(TEXT_OUTLINE_WIDTH);
    ctx.set_line_join("round");
    ctx.stroke_text(text, position.x, position.y)?;

    ctx.set_fill_style_str(color);
    ctx.fill_text(text, position.x, position.y)
}
