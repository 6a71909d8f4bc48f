use super::*;

fn edge(kind: EdgeKind, note: Option<&str>) -> Edge {
    Edge {
        kind,
        artist_id: "a".to_string(),
        from: "b_1_a".to_string(),
        to: "c_1_a".to_string(),
        x1: 0.0,
        y1: 1.0,
        x2: 2.0,
        y2: 3.0,
        note: note.map(str::to_string),
    }
}

#[test]
fn edge_kind_is_serialized_as_type() {
    let v = serde_json::to_value(edge(EdgeKind::Migration, Some("To Bass"))).unwrap();
    assert_eq!(v["type"], "migration");
    assert_eq!(v["note"], "To Bass");
    assert!(v.get("kind").is_none());
}

#[test]
fn absent_note_is_omitted() {
    let v = serde_json::to_value(edge(EdgeKind::Continuity, None)).unwrap();
    assert_eq!(v["type"], "continuity");
    assert!(v.get("note").is_none());
}

#[test]
fn warnings_are_tagged_by_kind() {
    let w = CompileWarning::PlacementOverflow {
        version_id: "b_2".to_string(),
        steps: 100,
    };
    let v = serde_json::to_value(&w).unwrap();
    assert_eq!(v["kind"], "placement_overflow");
    assert_eq!(v["version_id"], "b_2");

    let layout = Layout {
        warnings: vec![w],
        ..Layout::default()
    };
    assert!(layout.has_overflow_for("b_2"));
    assert!(!layout.has_overflow_for("b_1"));
}

#[test]
fn layout_round_trips_through_json() {
    let layout = Layout {
        edges: vec![edge(EdgeKind::Continuity, None)],
        ..Layout::default()
    };
    let json = layout.to_json_pretty().unwrap();
    let back: Layout = serde_json::from_str(&json).unwrap();
    assert_eq!(back, layout);
}
