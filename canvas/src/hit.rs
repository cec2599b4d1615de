#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{Annotation, DocStore};

/// Index of the most recently added marker within `radius` of `world_pt`.
///
/// Scans in reverse insertion order so the newest of overlapping markers wins.
#[must_use]
pub fn marker_at(doc: &DocStore, world_pt: Point, radius: f64) -> Option<usize> {
    doc.items().iter().enumerate().rev().find_map(|(index, item)| match item {
        Annotation::Marker { x, y, .. } if Point::new(*x, *y).distance_to(world_pt) < radius => Some(index),
        _ => None,
    })
}

/// Indices of every painted stroke with a vertex within `radius` of `world_pt`.
///
/// Eraser strokes are never returned. Indices come back in descending order so
/// they can be removed one by one without shifting the rest.
#[must_use]
pub fn strokes_at(doc: &DocStore, world_pt: Point, radius: f64) -> Vec<usize> {
    doc.items()
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, item)| item.is_paint_stroke())
        .filter(|(_, item)| match item {
            Annotation::Stroke { points, .. } => points.iter().any(|p| p.distance_to(world_pt) < radius),
            _ => false,
        })
        .map(|(index, _)| index)
        .collect()
}
