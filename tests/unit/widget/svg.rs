use super::*;
use std::time::Duration;

use crate::foundation::core::{Transform2D, Vec2};
use crate::geo::atlas::Atlas;
use crate::geo::projection::{GeoPoint, Projection};
use crate::widget::config::WidgetConfig;
use crate::widget::scene::LineState;

fn layout(config: &WidgetConfig) -> MapLayout {
    let atlas = Atlas::from_json_str(include_str!("../../data/mini_world.geojson")).unwrap();
    let projection = Projection::new(config.projection).unwrap();
    MapLayout::build(config, &projection, &config.region_table(), Some(&atlas))
}

fn scene(layout: &MapLayout, lines: [LineState; 2], labels: [f64; 2]) -> Scene {
    Scene {
        at: Duration::ZERO,
        map: Transform2D::scale_then_translate(1.5, Vec2::ZERO),
        lines,
        labels,
        fills: vec![Rgba8::opaque(0x1a, 0x1a, 0x1a); layout.regions.len()],
    }
}

const HIDDEN: LineState = LineState {
    fraction: 0.0,
    opacity: 0.0,
};

#[test]
fn document_has_canvas_size_background_and_map_transform() {
    let config = WidgetConfig::default();
    let layout = layout(&config);
    let svg = scene_svg(config.canvas, &layout, &config.style, &scene(&layout, [HIDDEN; 2], [0.0; 2]));

    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="800""#));
    assert!(svg.contains(r##"fill="#0a0f1d""##));
    assert!(svg.contains(r#"transform="matrix(1.5 0 0 1.5 0 0)""#));
    assert!(svg.contains(r#"stdDeviation="2.5""#));
    assert_eq!(svg.matches("data-key=").count(), 4);
    assert!(svg.ends_with("</g></svg>"));
}

#[test]
fn hidden_overlays_are_not_emitted() {
    let config = WidgetConfig::default();
    let layout = layout(&config);
    let svg = scene_svg(config.canvas, &layout, &config.style, &scene(&layout, [HIDDEN; 2], [0.0; 2]));
    assert!(!svg.contains("stroke-dasharray"));
    assert!(!svg.contains(">UAE<"));
    // The origin marker is static.
    assert!(svg.contains(">Flash Space</text>"));
}

#[test]
fn drawn_lines_and_visible_labels_are_emitted() {
    let config = WidgetConfig::default();
    let layout = layout(&config);
    let half = LineState {
        fraction: 0.5,
        opacity: 0.8,
    };
    let svg = scene_svg(config.canvas, &layout, &config.style, &scene(&layout, [half, HIDDEN], [1.0, 0.0]));
    assert_eq!(svg.matches(r#"stroke-dasharray="4 4""#).count(), 1);
    assert!(svg.contains(r#"opacity="0.8""#));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(">UAE</text>"));
    assert!(!svg.contains(">USA</text>"));
}

#[test]
fn translucent_fills_carry_an_opacity() {
    let config = WidgetConfig::default();
    let layout = layout(&config);
    let mut s = scene(&layout, [HIDDEN; 2], [0.0; 2]);
    s.fills[0] = config.style.highlight;
    let svg = scene_svg(config.canvas, &layout, &config.style, &s);
    assert!(svg.contains(r##"fill="#06b6d4" fill-opacity="0.4""##));
}

#[test]
fn skipped_legs_render_nothing() {
    let mut config = WidgetConfig::default();
    config.destinations[0].coords = GeoPoint::new(10.0, -90.0);
    let layout = layout(&config);
    let full = LineState {
        fraction: 1.0,
        opacity: 1.0,
    };
    let svg = scene_svg(config.canvas, &layout, &config.style, &scene(&layout, [full; 2], [1.0; 2]));
    assert_eq!(svg.matches("stroke-dasharray").count(), 1);
    assert!(!svg.contains(">UAE</text>"));
    assert!(svg.contains(">USA</text>"));
}

#[test]
fn text_is_escaped() {
    let mut config = WidgetConfig::default();
    config.origin.caption = "R&D <HQ>".to_string();
    let layout = layout(&config);
    let svg = scene_svg(config.canvas, &layout, &config.style, &scene(&layout, [HIDDEN; 2], [0.0; 2]));
    assert!(svg.contains(">R&amp;D &lt;HQ&gt;</text>"));
}
