use crate::geo::arc::{ArcPath, arc_path, fmt_coord};
use crate::geo::atlas::{Atlas, Region};
use crate::geo::projection::{PixelPoint, Projection};
use crate::region::table::{RegionCode, RegionTable};
use crate::widget::config::WidgetConfig;

/// A drawable region with its resolved codes and projected outline.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionShape {
    pub key: String,
    pub codes: Vec<RegionCode>,
    /// SVG path data of all rings (`M .. L .. Z` per ring).
    pub path_d: String,
}

/// Projected geometry of one connector leg.
#[derive(Clone, Debug, PartialEq)]
pub struct LegLayout {
    pub destination: PixelPoint,
    pub arc: ArcPath,
    pub label: String,
}

/// Everything projected once at widget construction.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    pub regions: Vec<RegionShape>,
    /// `None` when either end of the leg failed to project.
    pub legs: [Option<LegLayout>; 2],
    pub origin: Option<PixelPoint>,
    pub caption: String,
}

impl MapLayout {
    #[tracing::instrument(skip_all, fields(regions = atlas.map_or(0, |a| a.regions.len())))]
    pub fn build(
        config: &WidgetConfig,
        projection: &Projection,
        table: &RegionTable,
        atlas: Option<&Atlas>,
    ) -> Self {
        let origin = projection.project(config.origin.coords);
        let legs = config.destinations.each_ref().map(|dest| {
            let Some(from) = origin else {
                tracing::warn!(code = %dest.code, "origin does not project; leg skipped");
                return None;
            };
            let Some(to) = projection.project(dest.coords) else {
                tracing::warn!(code = %dest.code, "destination does not project; leg skipped");
                return None;
            };
            Some(LegLayout {
                destination: to,
                arc: arc_path(from, to, dest.curve_offset),
                label: dest.label.clone(),
            })
        });

        let mut regions = Vec::new();
        let mut held_out = 0_usize;
        for region in atlas.map(|a| a.regions.as_slice()).unwrap_or_default() {
            let codes = table.resolve(&region.identity);
            if table.is_held_out(&codes) {
                held_out += 1;
                continue;
            }
            let path_d = region_path_d(region, projection);
            if path_d.is_empty() {
                continue;
            }
            regions.push(RegionShape {
                key: region.key.clone(),
                codes,
                path_d,
            });
        }
        tracing::debug!(drawn = regions.len(), held_out, "map layout built");

        Self {
            regions,
            legs,
            origin,
            caption: config.origin.caption.clone(),
        }
    }
}

fn region_path_d(region: &Region, projection: &Projection) -> String {
    let mut d = String::new();
    for ring in region.polygons.iter().flatten() {
        let points: Vec<PixelPoint> = ring.iter().filter_map(|p| projection.project(*p)).collect();
        if points.len() < 3 {
            continue;
        }
        for (i, p) in points.iter().enumerate() {
            if !d.is_empty() {
                d.push(' ');
            }
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&fmt_coord(p.x));
            d.push(',');
            d.push_str(&fmt_coord(p.y));
        }
        d.push_str(" Z");
    }
    d
}

#[cfg(test)]
#[path = "../../tests/unit/widget/layout.rs"]
mod tests;
