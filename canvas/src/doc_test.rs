use super::*;

fn marker(x: f64, y: f64) -> Annotation {
    Annotation::Marker { x, y, color: "#ff0000".into() }
}

fn stroke(points: &[(f64, f64)]) -> Annotation {
    Annotation::Stroke {
        color: StrokeColor::Paint("#00ff00".into()),
        width: 3.0,
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
    }
}

fn text(label: &str) -> Annotation {
    Annotation::Text { x: 0.0, y: 0.0, text: label.into(), color: "#fff".into(), size: 24.0 }
}

// =============================================================
// Append / remove / clear
// =============================================================

#[test]
fn new_store_is_empty() {
    let doc = DocStore::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
    assert_eq!(doc.marker_count(), 0);
}

#[test]
fn append_returns_sequential_indices() {
    let mut doc = DocStore::new();
    assert_eq!(doc.append(marker(1.0, 1.0)), 0);
    assert_eq!(doc.append(stroke(&[(0.0, 0.0)])), 1);
    assert_eq!(doc.append(text("a")), 2);
    assert_eq!(doc.len(), 3);
}

#[test]
fn remove_at_shifts_later_items() {
    let mut doc = DocStore::new();
    doc.append(text("a"));
    doc.append(text("b"));
    doc.append(text("c"));
    assert_eq!(doc.remove_at(1), Some(text("b")));
    assert_eq!(doc.items(), &[text("a"), text("c")]);
}

#[test]
fn remove_at_out_of_range_is_noop() {
    let mut doc = DocStore::new();
    doc.append(text("a"));
    assert_eq!(doc.remove_at(5), None);
    assert_eq!(doc.len(), 1);
}

#[test]
fn clear_removes_everything() {
    let mut doc = DocStore::new();
    doc.append(marker(1.0, 1.0));
    doc.append(stroke(&[(0.0, 0.0), (1.0, 1.0)]));
    doc.clear();
    assert!(doc.is_empty());
    assert_eq!(doc.marker_count(), 0);
}

#[test]
fn undo_pops_last_item() {
    let mut doc = DocStore::new();
    doc.append(text("a"));
    doc.append(text("b"));
    assert_eq!(doc.undo(), Some(text("b")));
    assert_eq!(doc.undo(), Some(text("a")));
    assert_eq!(doc.undo(), None);
}

// =============================================================
// Strokes
// =============================================================

#[test]
fn push_point_extends_stroke() {
    let mut doc = DocStore::new();
    let idx = doc.append(stroke(&[(0.0, 0.0)]));
    assert!(doc.push_point(idx, Point::new(2.0, 3.0)));
    assert_eq!(doc.get(idx), Some(&stroke(&[(0.0, 0.0), (2.0, 3.0)])));
}

#[test]
fn push_point_rejects_non_stroke_and_missing_index() {
    let mut doc = DocStore::new();
    let idx = doc.append(marker(0.0, 0.0));
    assert!(!doc.push_point(idx, Point::new(1.0, 1.0)));
    assert!(!doc.push_point(9, Point::new(1.0, 1.0)));
    assert_eq!(doc.get(idx), Some(&marker(0.0, 0.0)));
}

// =============================================================
// Markers
// =============================================================

#[test]
fn marker_rank_counts_only_markers() {
    let mut doc = DocStore::new();
    doc.append(marker(0.0, 0.0));
    doc.append(stroke(&[(0.0, 0.0)]));
    doc.append(marker(1.0, 0.0));
    doc.append(text("x"));
    doc.append(marker(2.0, 0.0));
    assert_eq!(doc.marker_rank(0), Some(1));
    assert_eq!(doc.marker_rank(1), None);
    assert_eq!(doc.marker_rank(2), Some(2));
    assert_eq!(doc.marker_rank(4), Some(3));
    assert_eq!(doc.marker_rank(7), None);
    assert_eq!(doc.marker_count(), 3);
}

#[test]
fn markers_renumber_after_removal() {
    let mut doc = DocStore::new();
    doc.append(marker(0.0, 0.0));
    doc.append(marker(1.0, 0.0));
    doc.append(marker(2.0, 0.0));
    doc.remove_at(1);
    assert_eq!(doc.marker_rank(0), Some(1));
    assert_eq!(doc.marker_rank(1), Some(2));
    assert_eq!(doc.marker_count(), 2);
}

/// One recorded store mutation.
#[derive(Debug, Clone)]
enum Op {
    Append(Annotation),
    RemoveAt(usize),
    Clear,
    PushPoint(usize, Point),
}

fn apply(doc: &mut DocStore, op: &Op) {
    match op {
        Op::Append(item) => {
            doc.append(item.clone());
        }
        Op::RemoveAt(index) => {
            doc.remove_at(*index);
        }
        Op::Clear => doc.clear(),
        Op::PushPoint(index, point) => {
            doc.push_point(*index, *point);
        }
    }
}

fn marker_ranks(scene: &crate::scene::Scene) -> Vec<usize> {
    scene
        .commands
        .iter()
        .filter_map(|c| match c {
            crate::scene::DrawCommand::Marker { rank, .. } => Some(*rank),
            _ => None,
        })
        .collect()
}

#[test]
fn replaying_mutation_log_reproduces_live_store() {
    let ops = vec![
        Op::Append(marker(0.0, 0.0)),
        Op::Append(stroke(&[(0.0, 0.0)])),
        Op::PushPoint(1, Point::new(4.0, 4.0)),
        Op::Append(marker(1.0, 1.0)),
        Op::Clear,
        Op::Append(marker(2.0, 2.0)),
        Op::Append(stroke(&[(1.0, 1.0)])),
        Op::Append(marker(3.0, 3.0)),
        Op::Append(marker(4.0, 4.0)),
        Op::PushPoint(1, Point::new(9.0, 9.0)),
        Op::RemoveAt(0),
        Op::Append(text("note")),
        Op::RemoveAt(42),
        Op::PushPoint(2, Point::new(1.0, 1.0)),
    ];

    let mut live = DocStore::new();
    let mut log = Vec::new();
    for op in &ops {
        apply(&mut live, op);
        log.push(op.clone());
        assert_eq!(crate::scene::build(&live).marker_count, live.marker_count());
    }

    let mut replayed = DocStore::new();
    for op in &log {
        apply(&mut replayed, op);
    }

    let live_scene = crate::scene::build(&live);
    let replayed_scene = crate::scene::build(&replayed);
    assert_eq!(live_scene, replayed_scene);
    assert_eq!(live.marker_count(), replayed.marker_count());

    // Only the post-clear items survive; the earliest marker was removed.
    assert_eq!(replayed.len(), 4);
    assert_eq!(replayed.marker_count(), 2);
    assert_eq!(marker_ranks(&replayed_scene), vec![1, 2]);
    let Some(Annotation::Stroke { points, .. }) = replayed.get(0) else {
        panic!("expected stroke first");
    };
    assert_eq!(points.len(), 2);
}
