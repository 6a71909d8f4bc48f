use super::*;
use crate::compile::layout::CanvasSize;

fn sample() -> Layout {
    let mut layout = Layout {
        canvas: CanvasSize {
            width: 400.0,
            height: 300.0,
        },
        ..Layout::default()
    };
    layout.versions.insert(
        "b_1".to_string(),
        VersionBox {
            id: "b_1".to_string(),
            band_id: "b".to_string(),
            band_name: "BAND".to_string(),
            sublabel: "#1 (1990 - 1995)".to_string(),
            number: 1,
            start_year: 1990.0,
            end_year: 1995.0,
            x: 20.0,
            y: 28.0,
            width: 110.0,
            height: 184.0,
            beam_y: 88.0,
        },
    );
    layout.members.push(MemberNode {
        id: "b_1_a".to_string(),
        artist_id: "a".to_string(),
        version_id: "b_1".to_string(),
        band_id: "b".to_string(),
        name: "A".to_string(),
        role: None,
        column: 0,
        x: 30.0,
        y: 108.0,
        beam_y: 88.0,
        start_year: 1990.0,
        end_year: 1995.0,
        is_replacement: false,
        replaced_from: None,
    });
    layout
}

#[test]
fn equal_layouts_hash_equal() {
    assert_eq!(fingerprint_layout(&sample()), fingerprint_layout(&sample()));
}

#[test]
fn geometry_changes_the_fingerprint() {
    let a = sample();
    let mut b = sample();
    b.members[0].x += 0.5;
    assert_ne!(fingerprint_layout(&a), fingerprint_layout(&b));
}

#[test]
fn optional_fields_are_distinguished() {
    let a = sample();
    let mut b = sample();
    b.members[0].role = Some(String::new());
    assert_ne!(fingerprint_layout(&a), fingerprint_layout(&b));
}

#[test]
fn display_is_32_hex_digits() {
    let s = fingerprint_layout(&sample()).to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn moving_text_between_adjacent_fields_changes_the_fingerprint() {
    let a = sample();
    let mut b = sample();
    b.members[0].artist_id = "aB".to_string();
    b.members[0].version_id = "_1".to_string();
    let mut c = sample();
    c.members[0].artist_id = "a".to_string();
    c.members[0].version_id = "B_1".to_string();
    assert_ne!(fingerprint_layout(&b), fingerprint_layout(&c));
    assert_ne!(fingerprint_layout(&a), fingerprint_layout(&b));
}
