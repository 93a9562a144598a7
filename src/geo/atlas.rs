use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{RouteglowError, RouteglowResult},
    geo::projection::GeoPoint,
};

/// Identifying fields of one region, as supplied by the geometry source.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RegionIdentity {
    /// Feature id (numeric ISO code in world-atlas, alpha-3 in Natural Earth exports).
    pub id: Option<String>,
    /// ISO 3166-1 alpha-3 code property.
    pub iso_a3: Option<String>,
    /// Display name property.
    pub name: Option<String>,
}

/// Polygon as a list of rings; the first ring is the exterior.
pub type Polygon = Vec<Vec<GeoPoint>>;

/// One renderable region.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Region {
    /// Stable key, unique within the atlas.
    pub key: String,
    /// Identifying fields used for highlight matching.
    pub identity: RegionIdentity,
    /// Geographic outline.
    pub polygons: Vec<Polygon>,
}

/// Decoded world geometry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Atlas {
    pub regions: Vec<Region>,
}

impl Atlas {
    /// Read and decode a GeoJSON or TopoJSON file.
    #[tracing::instrument]
    pub fn load(path: &Path) -> RouteglowResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read world geometry '{}'", path.display()))?;
        let atlas = Self::from_json_str(&text)?;
        tracing::debug!(regions = atlas.regions.len(), "world geometry decoded");
        Ok(atlas)
    }

    /// Decode from JSON text, dispatching on the top-level `type`.
    pub fn from_json_str(text: &str) -> RouteglowResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match value.get("type").and_then(|t| t.as_str()) {
            Some("Topology") => Self::from_topojson(serde_json::from_value(value)?),
            Some("FeatureCollection") => Self::from_geojson(serde_json::from_value(value)?),
            Some(other) => Err(RouteglowError::geometry(format!(
                "unsupported geometry document type '{other}'"
            ))),
            None => Err(RouteglowError::geometry(
                "geometry document has no 'type' field",
            )),
        }
    }

    fn from_geojson(fc: FeatureCollection) -> RouteglowResult<Self> {
        let mut regions = Vec::with_capacity(fc.features.len());
        for (idx, feature) in fc.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let polygons = match geometry {
                GeoGeometry::Polygon { coordinates } => vec![rings_from_positions(&coordinates)?],
                GeoGeometry::MultiPolygon { coordinates } => coordinates
                    .iter()
                    .map(|p| rings_from_positions(p))
                    .collect::<RouteglowResult<Vec<_>>>()?,
                GeoGeometry::Unsupported => continue,
            };
            regions.push(Region {
                key: format!("geo-{idx}"),
                identity: identity_of(feature.id.as_ref(), feature.properties.as_ref()),
                polygons,
            });
        }
        Ok(Self { regions })
    }

    fn from_topojson(topo: Topology) -> RouteglowResult<Self> {
        let arcs = decode_arcs(&topo)?;

        // world-atlas files carry both "countries" and "land"; prefer the per-country layer.
        let objects: Vec<&TopoObject> = match topo.objects.get("countries") {
            Some(countries) => vec![countries],
            None => topo.objects.values().collect(),
        };

        let mut regions = Vec::new();
        for object in objects {
            collect_topo_regions(object, &arcs, &mut regions)?;
        }
        Ok(Self { regions })
    }
}

#[derive(serde::Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(serde::Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<GeoGeometry>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(serde::Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<TopoTransform>,
    objects: BTreeMap<String, TopoObject>,
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(serde::Deserialize)]
struct TopoTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(serde::Deserialize)]
struct TopoObject {
    /// `null` for a geometry without coordinates.
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    arcs: Option<serde_json::Value>,
    #[serde(default)]
    geometries: Vec<TopoObject>,
}

fn position(coords: &[f64]) -> RouteglowResult<GeoPoint> {
    match coords {
        [lon, lat, ..] => Ok(GeoPoint::new(*lon, *lat)),
        _ => Err(RouteglowError::geometry(
            "position must have at least two coordinates",
        )),
    }
}

fn rings_from_positions(rings: &[Vec<Vec<f64>>]) -> RouteglowResult<Polygon> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|c| position(c))
                .collect::<RouteglowResult<Vec<_>>>()
        })
        .collect()
}

fn decode_arcs(topo: &Topology) -> RouteglowResult<Vec<Vec<GeoPoint>>> {
    let mut out = Vec::with_capacity(topo.arcs.len());
    for arc in &topo.arcs {
        let mut points = Vec::with_capacity(arc.len());
        let mut acc = [0.0f64; 2];
        for c in arc {
            let p = position(c)?;
            points.push(match &topo.transform {
                // Quantized arcs are delta-encoded.
                Some(t) => {
                    acc[0] += p.lon;
                    acc[1] += p.lat;
                    GeoPoint::new(
                        acc[0] * t.scale[0] + t.translate[0],
                        acc[1] * t.scale[1] + t.translate[1],
                    )
                }
                None => p,
            });
        }
        out.push(points);
    }
    Ok(out)
}

fn stitch_ring(indices: &[i64], arcs: &[Vec<GeoPoint>]) -> RouteglowResult<Vec<GeoPoint>> {
    let mut ring: Vec<GeoPoint> = Vec::new();
    for &i in indices {
        // Negative indices reference the one's complement arc, reversed.
        let (idx, reversed) = if i < 0 { (!i, true) } else { (i, false) };
        let arc = usize::try_from(idx)
            .ok()
            .and_then(|idx| arcs.get(idx))
            .ok_or_else(|| RouteglowError::geometry(format!("arc index {i} out of range")))?;

        let mut points: Vec<GeoPoint> = arc.clone();
        if reversed {
            points.reverse();
        }
        // Consecutive arcs share their joining point.
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

fn collect_topo_regions(
    object: &TopoObject,
    arcs: &[Vec<GeoPoint>],
    out: &mut Vec<Region>,
) -> RouteglowResult<()> {
    let parse_err =
        |e: serde_json::Error| RouteglowError::geometry(format!("malformed topology arcs: {e}"));

    let polygons = match object.kind.as_deref() {
        Some("GeometryCollection") => {
            for child in &object.geometries {
                collect_topo_regions(child, arcs, out)?;
            }
            return Ok(());
        }
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> =
                serde_json::from_value(object.arcs.clone().unwrap_or_default())
                    .map_err(parse_err)?;
            vec![
                rings
                    .iter()
                    .map(|r| stitch_ring(r, arcs))
                    .collect::<RouteglowResult<Polygon>>()?,
            ]
        }
        Some("MultiPolygon") => {
            let polys: Vec<Vec<Vec<i64>>> =
                serde_json::from_value(object.arcs.clone().unwrap_or_default())
                    .map_err(parse_err)?;
            polys
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|r| stitch_ring(r, arcs))
                        .collect::<RouteglowResult<Polygon>>()
                })
                .collect::<RouteglowResult<Vec<Polygon>>>()?
        }
        _ => return Ok(()),
    };

    out.push(Region {
        key: format!("topo-{}", out.len()),
        identity: identity_of(object.id.as_ref(), object.properties.as_ref()),
        polygons,
    });
    Ok(())
}

fn identity_of(
    id: Option<&serde_json::Value>,
    properties: Option<&serde_json::Map<String, serde_json::Value>>,
) -> RegionIdentity {
    fn scalar(v: &serde_json::Value) -> Option<String> {
        match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
    let prop = |keys: &[&str]| {
        properties.and_then(|p| keys.iter().find_map(|k| p.get(*k).and_then(scalar)))
    };

    RegionIdentity {
        id: id.and_then(scalar),
        iso_a3: prop(&["iso_a3", "ISO_A3", "adm0_a3", "ADM0_A3"]),
        name: prop(&["name", "NAME", "admin", "ADMIN"]),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/atlas.rs"]
mod tests;
