use super::*;

fn cross(o: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    (a - o).cross(b - o)
}

#[test]
fn zero_offset_is_a_straight_segment() {
    let p1 = PixelPoint::new(817.4, 425.5);
    let p2 = PixelPoint::new(390.6, 379.2);
    let arc = arc_path(p1, p2, 0.0);
    assert!(cross(p1, p2, arc.control()).abs() < 1e-9);
    assert_eq!(arc.control(), p1.midpoint(p2));
}

#[test]
fn control_point_matches_perpendicular_offset() {
    let arc = arc_path(PixelPoint::new(0.0, 0.0), PixelPoint::new(100.0, 0.0), 0.2);
    assert_eq!(arc.control(), PixelPoint::new(50.0, 20.0));

    let arc = arc_path(PixelPoint::new(0.0, 0.0), PixelPoint::new(0.0, 100.0), 0.3);
    assert_eq!(arc.control(), PixelPoint::new(-30.0, 50.0));
}

#[test]
fn negated_offset_mirrors_across_the_chord() {
    let p1 = PixelPoint::new(817.4, 425.5);
    let p2 = PixelPoint::new(756.0, 418.0);
    let a = arc_path(p1, p2, 0.2);
    let b = arc_path(p1, p2, -0.2);

    // Mirrored control points share the chord midpoint as their midpoint...
    let mid = a.control().midpoint(b.control());
    assert!((mid - p1.midpoint(p2)).hypot() < 1e-9);
    // ...and sit on opposite sides of the chord at equal distance.
    let sa = cross(p1, p2, a.control());
    let sb = cross(p1, p2, b.control());
    assert!(sa * sb < 0.0);
    assert!((sa + sb).abs() < 1e-6);
}

#[test]
fn arc_path_is_deterministic() {
    let p1 = PixelPoint::new(1.5, 2.5);
    let p2 = PixelPoint::new(40.25, -7.0);
    assert_eq!(arc_path(p1, p2, -0.3), arc_path(p1, p2, -0.3));
    assert_eq!(arc_path(p1, p2, -0.3).svg_d(), arc_path(p1, p2, -0.3).svg_d());
}

#[test]
fn svg_d_uses_quadratic_command() {
    let arc = arc_path(PixelPoint::new(0.0, 0.0), PixelPoint::new(100.0, 0.0), 0.2);
    assert_eq!(arc.svg_d(), "M 0,0 Q 50,20 100,0");
}

#[test]
fn trimming_follows_arc_length() {
    let arc = arc_path(PixelPoint::new(0.0, 0.0), PixelPoint::new(200.0, 0.0), 0.3);
    assert!(arc.trimmed(0.0).is_none());
    assert!(arc.trimmed(-1.0).is_none());
    assert!(arc.trimmed(f64::NAN).is_none());
    assert_eq!(arc.trimmed(1.0), Some(arc.curve()));

    let half = arc.trimmed(0.5).unwrap();
    let half_len = half.arclen(1e-3);
    assert!((half_len - arc.arc_length() * 0.5).abs() < 0.05);
    // The arc is symmetric, so half its length ends at the apex above the chord midpoint.
    assert!((half.p2.x - 100.0).abs() < 0.05);
}

#[test]
fn trimming_a_degenerate_arc_returns_the_point() {
    let p = PixelPoint::new(5.0, 5.0);
    let arc = arc_path(p, p, 0.4);
    let q = arc.trimmed(0.5).unwrap();
    assert_eq!(q.p0, p);
    assert_eq!(q.p2, p);
}

#[test]
fn coordinates_are_formatted_compactly() {
    assert_eq!(fmt_coord(1.0), "1");
    assert_eq!(fmt_coord(1.25), "1.25");
    assert_eq!(fmt_coord(-0.0001), "0");
    assert_eq!(fmt_coord(817.377372), "817.377");
}
