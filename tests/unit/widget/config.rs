use super::*;
use crate::foundation::core::Point;

#[test]
fn default_is_the_stock_widget() {
    let cfg = WidgetConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.canvas, Canvas { width: 1200, height: 800 });
    assert_eq!(cfg.origin.caption, "Flash Space");
    assert_eq!(cfg.destinations[0].curve_offset, 0.2);
    assert_eq!(cfg.destinations[1].curve_offset, -0.3);
    assert_eq!(cfg.visibility_threshold, 0.3);
    assert_eq!(cfg.held_out, [RegionCode::new("ATA")]);
    assert_eq!(cfg.style.highlight.hex(), "#06b6d4");
    assert_eq!(cfg.style.fill_fade(), Duration::from_millis(500));
}

#[test]
fn timings_round_trip_through_milliseconds() {
    let timings = StepTimings::from(TimingConfig::default());
    assert_eq!(timings, StepTimings::default());
    assert_eq!(TimingConfig::default().draw_ms, 1500);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = WidgetConfig::from_reader(
        r#"{"visibility_threshold": 0.5, "style": {"line_width": 2.0}}"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.visibility_threshold, 0.5);
    assert_eq!(cfg.style.line_width, 2.0);
    assert_eq!(cfg.style.border_width, 0.5);
    assert_eq!(cfg.destinations, WidgetConfig::default().destinations);
}

#[test]
fn invalid_values_are_rejected() {
    let cases: [fn(&mut WidgetConfig); 8] = [
        |c| c.canvas.width = 0,
        |c| c.projection.scale = -1.0,
        |c| c.visibility_threshold = 1.5,
        |c| c.zoom.to_scale = 0.0,
        |c| c.destinations[1].curve_offset = f64::NAN,
        |c| c.style.line_width = -1.0,
        |c| c.style.font_size = 0.0,
        |c| {
            c.timing.draw_ms = 0;
            c.timing.label_ms = 0;
            c.timing.hold_ms = 0;
            c.timing.rest_ms = 0;
        },
    ];
    for (i, mutate) in cases.into_iter().enumerate() {
        let mut cfg = WidgetConfig::default();
        mutate(&mut cfg);
        assert!(
            matches!(cfg.validate(), Err(RouteglowError::Validation(_))),
            "case {i}"
        );
    }
}

#[test]
fn malformed_json_is_a_serialization_error() {
    assert!(matches!(
        WidgetConfig::from_reader("{".as_bytes()),
        Err(RouteglowError::Serde(_))
    ));
    assert!(matches!(
        WidgetConfig::from_reader(r#"{"visibility_threshold": -1}"#.as_bytes()),
        Err(RouteglowError::Validation(_))
    ));
}

#[test]
fn missing_config_file_names_the_path() {
    let err = WidgetConfig::from_path("tests/data/no-such-config.json").unwrap_err();
    assert!(err.to_string().contains("no-such-config.json"));
}

#[test]
fn zoom_endpoints_center_the_origin_then_settle() {
    let cfg = WidgetConfig::default();
    let origin = Point::new(817.3774, 425.4631);
    let placed = cfg.map_from(origin).to_affine() * origin;
    assert!((placed.x - 600.0).abs() < 1e-9 && (placed.y - 400.0).abs() < 1e-9);
    assert_eq!(cfg.map_to().scale, Vec2::new(1.5, 1.5));
    assert_eq!(cfg.map_to().translate, Vec2::ZERO);
}
