use super::*;

fn widget_projection() -> Projection {
    Projection::new(ProjectionConfig::default()).unwrap()
}

fn assert_close(p: Point, x: f64, y: f64) {
    assert!(
        (p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3,
        "got {p:?}, want ({x}, {y})"
    );
}

#[test]
fn center_projects_onto_translate() {
    let proj = widget_projection();
    let p = proj.project(GeoPoint::new(-10.0, 30.0)).unwrap();
    assert!((p.x - 600.0).abs() < 1e-9);
    assert!((p.y - 400.0).abs() < 1e-9);
}

#[test]
fn widget_locations_land_where_expected() {
    let proj = widget_projection();
    assert_close(
        proj.project(GeoPoint::new(78.9629, 20.5937)).unwrap(),
        817.3774,
        425.4631,
    );
    assert_close(
        proj.project(GeoPoint::new(53.8478, 23.4241)).unwrap(),
        756.0096,
        418.0025,
    );
    assert_close(
        proj.project(GeoPoint::new(-95.7129, 37.0902)).unwrap(),
        390.5639,
        379.1884,
    );
}

#[test]
fn projection_is_deterministic() {
    let a = widget_projection();
    let b = widget_projection();
    let p = GeoPoint::new(12.5, -33.25);
    assert_eq!(a.project(p), a.project(p));
    assert_eq!(a.project(p), b.project(p));
}

#[test]
fn north_is_up() {
    let proj = widget_projection();
    let south = proj.project(GeoPoint::new(0.0, -10.0)).unwrap();
    let north = proj.project(GeoPoint::new(0.0, 10.0)).unwrap();
    assert!(north.y < south.y);
}

#[test]
fn out_of_domain_returns_none() {
    let proj = widget_projection();
    assert_eq!(proj.project(GeoPoint::new(181.0, 0.0)), None);
    assert_eq!(proj.project(GeoPoint::new(0.0, -91.0)), None);
    assert_eq!(proj.project(GeoPoint::new(0.0, 90.0)), None);
    assert_eq!(proj.project(GeoPoint::new(f64::NAN, 0.0)), None);
    assert_eq!(proj.project(GeoPoint::new(0.0, f64::INFINITY)), None);
}

#[test]
fn equirectangular_keeps_the_poles() {
    let proj = Projection::new(ProjectionConfig {
        kind: ProjectionKind::Equirectangular,
        scale: 100.0,
        center: GeoPoint::new(0.0, 0.0),
        translate: Point::new(0.0, 0.0),
    })
    .unwrap();
    let p = proj.project(GeoPoint::new(180.0, 90.0)).unwrap();
    assert_close(p, 100.0 * std::f64::consts::PI, -50.0 * std::f64::consts::PI);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = ProjectionConfig::default();
    cfg.scale = 0.0;
    assert!(Projection::new(cfg).is_err());

    let mut cfg = ProjectionConfig::default();
    cfg.center = GeoPoint::new(0.0, 90.0);
    assert!(Projection::new(cfg).is_err());
}
