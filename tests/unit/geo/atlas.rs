use super::*;

const GEOJSON: &str = include_str!("../../data/mini_world.geojson");
const TOPOJSON: &str = include_str!("../../data/mini_world.topo.json");

fn by_name<'a>(atlas: &'a Atlas, name: &str) -> &'a Region {
    atlas
        .regions
        .iter()
        .find(|r| r.identity.name.as_deref() == Some(name))
        .unwrap()
}

#[test]
fn geojson_keeps_only_area_features() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();
    // Null geometry and the point feature are dropped.
    assert_eq!(atlas.regions.len(), 5);
}

#[test]
fn geojson_identity_fields_are_read_from_id_and_properties() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();

    let india = by_name(&atlas, "India");
    assert_eq!(india.identity.id.as_deref(), Some("IND"));
    assert_eq!(india.identity.iso_a3, None);

    let uae = by_name(&atlas, "United Arab Emirates");
    assert_eq!(uae.identity.id, None);
    assert_eq!(uae.identity.iso_a3.as_deref(), Some("ARE"));

    let usa = by_name(&atlas, "United States of America");
    assert_eq!(usa.identity.id.as_deref(), Some("840"));
    assert_eq!(usa.polygons.len(), 2);
}

#[test]
fn geojson_accepts_positions_with_altitude() {
    let atlas = Atlas::from_json_str(GEOJSON).unwrap();
    let brazil = by_name(&atlas, "Brazil");
    assert_eq!(brazil.polygons[0][0][0], GeoPoint::new(-74.0, -33.0));
}

#[test]
fn topojson_decodes_quantized_arcs() {
    let atlas = Atlas::from_json_str(TOPOJSON).unwrap();
    // Only the "countries" object is used.
    assert_eq!(atlas.regions.len(), 3);

    let uae = by_name(&atlas, "United Arab Emirates");
    assert_eq!(uae.identity.id.as_deref(), Some("784"));
    assert_eq!(
        uae.polygons[0][0],
        vec![
            GeoPoint::new(50.0, 20.0),
            GeoPoint::new(55.0, 20.0),
            GeoPoint::new(55.0, 25.0),
            GeoPoint::new(50.0, 25.0),
            GeoPoint::new(50.0, 20.0),
        ]
    );
}

#[test]
fn topojson_reverses_negative_arc_references() {
    let atlas = Atlas::from_json_str(TOPOJSON).unwrap();
    let oman = by_name(&atlas, "Oman");
    assert_eq!(
        oman.polygons[0][0],
        vec![
            GeoPoint::new(50.0, 20.0),
            GeoPoint::new(50.0, 25.0),
            GeoPoint::new(55.0, 25.0),
            GeoPoint::new(55.0, 20.0),
            GeoPoint::new(50.0, 20.0),
        ]
    );
}

#[test]
fn topojson_multipolygons_and_numeric_ids() {
    let atlas = Atlas::from_json_str(TOPOJSON).unwrap();
    let india = by_name(&atlas, "India");
    assert_eq!(india.identity.id.as_deref(), Some("356"));
    assert_eq!(india.polygons.len(), 1);
    assert_eq!(india.polygons[0][0].len(), 5);
    assert_eq!(india.polygons[0][0][2], GeoPoint::new(80.0, 30.0));
}

#[test]
fn topojson_null_geometries_are_skipped() {
    let text = r#"{
        "type": "Topology",
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "ARE", "arcs": [[0]]},
                    {"type": null, "id": "XXX"}
                ]
            }
        },
        "arcs": [[[50, 20], [55, 20], [55, 25], [50, 25], [50, 20]]]
    }"#;
    let atlas = Atlas::from_json_str(text).unwrap();
    assert_eq!(atlas.regions.len(), 1);
    assert_eq!(atlas.regions[0].identity.id.as_deref(), Some("ARE"));
    assert_eq!(atlas.regions[0].polygons[0][0].len(), 5);
}

#[test]
fn region_keys_are_unique() {
    for text in [GEOJSON, TOPOJSON] {
        let atlas = Atlas::from_json_str(text).unwrap();
        let mut keys: Vec<_> = atlas.regions.iter().map(|r| r.key.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), atlas.regions.len());
    }
}

#[test]
fn malformed_documents_are_geometry_errors() {
    assert!(matches!(
        Atlas::from_json_str(r#"{"type":"Feature"}"#),
        Err(RouteglowError::Geometry(_))
    ));
    assert!(matches!(
        Atlas::from_json_str(r#"{"features":[]}"#),
        Err(RouteglowError::Geometry(_))
    ));
    let bad_arc = r#"{"type":"Topology","objects":{"x":{"type":"Polygon","arcs":[[7]]}},"arcs":[]}"#;
    assert!(matches!(
        Atlas::from_json_str(bad_arc),
        Err(RouteglowError::Geometry(_))
    ));
    assert!(matches!(
        Atlas::from_json_str("not json"),
        Err(RouteglowError::Serde(_))
    ));
}

#[test]
fn load_reports_missing_files() {
    let err = Atlas::load(Path::new("tests/data/does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("does-not-exist.json"));
}
