use super::*;
use crate::geo::projection::GeoPoint;

const GEOJSON: &str = include_str!("../../data/mini_world.geojson");

fn build(config: &WidgetConfig, atlas: Option<&Atlas>) -> MapLayout {
    let projection = Projection::new(config.projection).unwrap();
    MapLayout::build(config, &projection, &config.region_table(), atlas)
}

fn near(p: PixelPoint, x: f64, y: f64) -> bool {
    (p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3
}

#[test]
fn legs_start_at_the_projected_origin() {
    let layout = build(&WidgetConfig::default(), None);
    let origin = layout.origin.unwrap();
    assert!(near(origin, 817.3774, 425.4631));

    let uae = layout.legs[0].as_ref().unwrap();
    assert!(near(uae.destination, 756.0096, 418.0025));
    assert_eq!(uae.arc.start(), origin);
    assert_eq!(uae.label, "UAE");

    let usa = layout.legs[1].as_ref().unwrap();
    assert!(near(usa.destination, 390.5639, 379.1884));
    assert_eq!(layout.caption, "Flash Space");
}

#[test]
fn unprojectable_destination_drops_only_its_leg() {
    let mut config = WidgetConfig::default();
    config.destinations[1].coords = GeoPoint::new(0.0, 90.0);
    let layout = build(&config, None);
    assert!(layout.legs[0].is_some());
    assert!(layout.legs[1].is_none());
}

#[test]
fn unprojectable_origin_drops_both_legs() {
    let mut config = WidgetConfig::default();
    config.origin.coords = GeoPoint::new(200.0, 0.0);
    let layout = build(&config, None);
    assert_eq!(layout.origin, None);
    assert!(layout.legs.iter().all(Option::is_none));
}

#[test]
fn held_out_regions_are_never_laid_out() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();
    let layout = build(&WidgetConfig::default(), Some(&atlas));
    assert_eq!(layout.regions.len(), 4);
    assert!(
        layout
            .regions
            .iter()
            .all(|r| !r.codes.contains(&RegionCode::new("ATA")))
    );
}

#[test]
fn region_paths_close_every_ring() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();
    let layout = build(&WidgetConfig::default(), Some(&atlas));
    let usa = layout
        .regions
        .iter()
        .find(|r| r.codes.contains(&RegionCode::new("USA")))
        .unwrap();
    assert_eq!(usa.path_d.matches('M').count(), 2);
    assert_eq!(usa.path_d.matches('Z').count(), 2);
    assert!(usa.path_d.starts_with('M'));
}

#[test]
fn regions_resolve_codes_from_any_field() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();
    let layout = build(&WidgetConfig::default(), Some(&atlas));
    for code in ["IND", "ARE", "USA", "BRA"] {
        assert!(
            layout
                .regions
                .iter()
                .any(|r| r.codes.contains(&RegionCode::new(code))),
            "{code}"
        );
    }
}
