use std::f64::consts::FRAC_PI_4;

use crate::foundation::{
    core::{Point, Vec2},
    error::{RouteglowError, RouteglowResult},
};

/// A projected point in canvas pixels (y grows downward).
pub type PixelPoint = Point;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Geographic coordinate in degrees.
pub struct GeoPoint {
    /// Longitude in `[-180, 180]`.
    pub lon: f64,
    /// Latitude in `[-90, 90]`.
    pub lat: f64,
}

impl GeoPoint {
    /// Build a coordinate from longitude and latitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Raw planar projection family.
pub enum ProjectionKind {
    /// Spherical Mercator.
    #[default]
    Mercator,
    /// Plate carrée.
    Equirectangular,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Fixed projection parameters.
pub struct ProjectionConfig {
    /// Projection family.
    #[serde(default)]
    pub kind: ProjectionKind,
    /// Pixels per radian.
    pub scale: f64,
    /// Coordinate that lands on `translate`.
    pub center: GeoPoint,
    /// Pixel position of `center`.
    pub translate: PixelPoint,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Mercator,
            scale: 140.0,
            center: GeoPoint::new(-10.0, 30.0),
            translate: Point::new(600.0, 400.0),
        }
    }
}

/// Geographic to pixel projection with a fixed configuration.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    config: ProjectionConfig,
    // Raw projected center, subtracted before scaling.
    center_raw: Vec2,
}

impl Projection {
    /// Build a projection, validating scale and center.
    pub fn new(config: ProjectionConfig) -> RouteglowResult<Self> {
        if !config.scale.is_finite() || config.scale <= 0.0 {
            return Err(RouteglowError::validation(
                "projection scale must be finite and > 0",
            ));
        }
        if !config.translate.x.is_finite() || !config.translate.y.is_finite() {
            return Err(RouteglowError::validation(
                "projection translate must be finite",
            ));
        }
        let center_raw = raw(config.kind, config.center).ok_or_else(|| {
            RouteglowError::validation("projection center is outside the projection domain")
        })?;
        Ok(Self { config, center_raw })
    }

    /// The configuration this projection was built from.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project a coordinate to pixels, or `None` when it is outside the domain.
    pub fn project(&self, p: GeoPoint) -> Option<PixelPoint> {
        let r = raw(self.config.kind, p)?;
        let k = self.config.scale;
        let x = self.config.translate.x + k * (r.x - self.center_raw.x);
        let y = self.config.translate.y - k * (r.y - self.center_raw.y);
        (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
    }
}

fn raw(kind: ProjectionKind, p: GeoPoint) -> Option<Vec2> {
    if !p.lon.is_finite() || !p.lat.is_finite() {
        return None;
    }
    if p.lon.abs() > 180.0 || p.lat.abs() > 90.0 {
        return None;
    }

    let lambda = p.lon.to_radians();
    let phi = p.lat.to_radians();
    match kind {
        ProjectionKind::Equirectangular => Some(Vec2::new(lambda, phi)),
        ProjectionKind::Mercator => {
            // The poles map to infinity.
            if p.lat.abs() >= 90.0 {
                return None;
            }
            let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
            y.is_finite().then(|| Vec2::new(lambda, y))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/projection.rs"]
mod tests;
