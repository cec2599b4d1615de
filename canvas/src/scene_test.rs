use super::*;

fn marker(x: f64) -> Annotation {
    Annotation::Marker { x, y: 0.0, color: "#0000ff".into() }
}

fn stroke(color: StrokeColor, points: &[(f64, f64)]) -> Annotation {
    Annotation::Stroke { color, width: 4.0, points: points.iter().map(|&(x, y)| Point::new(x, y)).collect() }
}

fn ranks(scene: &Scene) -> Vec<usize> {
    scene
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Marker { rank, .. } => Some(*rank),
            _ => None,
        })
        .collect()
}

// =============================================================
// Strokes
// =============================================================

#[test]
fn empty_store_builds_empty_scene() {
    let scene = build(&DocStore::new());
    assert!(scene.commands.is_empty());
    assert_eq!(scene.marker_count, 0);
}

#[test]
fn paint_stroke_uses_source_over() {
    let mut doc = DocStore::new();
    doc.append(stroke(StrokeColor::Paint("#123456".into()), &[(0.0, 0.0), (5.0, 5.0)]));
    let scene = build(&doc);
    assert_eq!(
        scene.commands,
        vec![DrawCommand::Polyline {
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            color: "#123456".into(),
            width: 4.0,
            composite: Composite::SourceOver,
        }]
    );
}

#[test]
fn eraser_stroke_uses_destination_out() {
    let mut doc = DocStore::new();
    doc.append(stroke(StrokeColor::Eraser, &[(1.0, 1.0)]));
    let scene = build(&doc);
    let DrawCommand::Polyline { composite, .. } = &scene.commands[0] else {
        panic!("expected polyline");
    };
    assert_eq!(*composite, Composite::DestinationOut);
    assert_eq!(composite.as_str(), "destination-out");
}

#[test]
fn pointless_stroke_is_skipped() {
    let mut doc = DocStore::new();
    doc.append(stroke(StrokeColor::Paint("#000".into()), &[]));
    doc.append(stroke(StrokeColor::Paint("#000".into()), &[(3.0, 3.0)]));
    assert_eq!(build(&doc).commands.len(), 1);
}

// =============================================================
// Markers / text
// =============================================================

#[test]
fn marker_ranks_follow_store_order() {
    let mut doc = DocStore::new();
    doc.append(marker(0.0));
    doc.append(stroke(StrokeColor::Paint("#000".into()), &[(0.0, 0.0)]));
    doc.append(marker(1.0));
    doc.append(marker(2.0));
    let scene = build(&doc);
    assert_eq!(ranks(&scene), vec![1, 2, 3]);
    assert_eq!(scene.marker_count, 3);
}

#[test]
fn marker_ranks_close_gap_after_removal() {
    let mut doc = DocStore::new();
    doc.append(marker(0.0));
    doc.append(marker(1.0));
    doc.append(marker(2.0));
    doc.remove_at(1);
    let scene = build(&doc);
    assert_eq!(ranks(&scene), vec![1, 2]);
    let DrawCommand::Marker { center, .. } = &scene.commands[1] else {
        panic!("expected marker");
    };
    assert_eq!(*center, Point::new(2.0, 0.0));
}

#[test]
fn text_becomes_label() {
    let mut doc = DocStore::new();
    doc.append(Annotation::Text { x: 4.0, y: 5.0, text: "cell".into(), color: "#fff".into(), size: 30.0 });
    assert_eq!(
        build(&doc).commands,
        vec![DrawCommand::Label { position: Point::new(4.0, 5.0), text: "cell".into(), color: "#fff".into(), size: 30.0 }]
    );
}

#[test]
fn replay_produces_identical_scene() {
    let mut live = DocStore::new();
    live.append(marker(0.0));
    let s = live.append(stroke(StrokeColor::Paint("#000".into()), &[(0.0, 0.0)]));
    live.push_point(s, Point::new(9.0, 9.0));
    live.append(stroke(StrokeColor::Eraser, &[(4.0, 4.0)]));
    live.append(marker(3.0));
    live.remove_at(0);

    let mut replay = DocStore::new();
    for item in live.items() {
        replay.append(item.clone());
    }
    assert_eq!(build(&replay), build(&live));
}
