use kurbo::{ParamCurve, ParamCurveArclen, QuadBez};

use crate::geo::projection::PixelPoint;

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Quadratic connector curve between two projected points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPath {
    curve: QuadBez,
}

/// Arc from `p1` to `p2` bowed sideways by `curve_offset`.
///
/// The control point sits at the chord midpoint displaced by `curve_offset` times the
/// chord rotated a quarter turn, `(-dy, dx)`. Zero gives a straight segment; the sign picks
/// which side the arc bows to.
pub fn arc_path(p1: PixelPoint, p2: PixelPoint, curve_offset: f64) -> ArcPath {
    let d = p2 - p1;
    let control = PixelPoint::new(
        p1.x + d.x * 0.5 - d.y * curve_offset,
        p1.y + d.y * 0.5 + d.x * curve_offset,
    );
    ArcPath {
        curve: QuadBez::new(p1, control, p2),
    }
}

impl ArcPath {
    /// Start point.
    pub fn start(&self) -> PixelPoint {
        self.curve.p0
    }

    /// Quadratic control point.
    pub fn control(&self) -> PixelPoint {
        self.curve.p1
    }

    /// End point.
    pub fn end(&self) -> PixelPoint {
        self.curve.p2
    }

    /// The underlying curve.
    pub fn curve(&self) -> QuadBez {
        self.curve
    }

    /// Curve length in pixels.
    pub fn arc_length(&self) -> f64 {
        self.curve.arclen(ARCLEN_ACCURACY)
    }

    /// Prefix of the curve covering `fraction` of its length, `None` when nothing is drawn.
    pub fn trimmed(&self, fraction: f64) -> Option<QuadBez> {
        if !(fraction > 0.0) {
            return None;
        }
        if fraction >= 1.0 {
            return Some(self.curve);
        }
        let len = self.arc_length();
        if len <= f64::EPSILON {
            return Some(self.curve);
        }
        let t = self.curve.inv_arclen(len * fraction, ARCLEN_ACCURACY);
        Some(self.curve.subsegment(0.0..t))
    }

    /// SVG path data `M x,y Q cx,cy x2,y2` for the full curve.
    pub fn svg_d(&self) -> String {
        quad_svg_d(&self.curve)
    }

    /// SVG path data for [`ArcPath::trimmed`].
    pub fn trimmed_svg_d(&self, fraction: f64) -> Option<String> {
        self.trimmed(fraction).map(|q| quad_svg_d(&q))
    }
}

fn quad_svg_d(q: &QuadBez) -> String {
    format!(
        "M {},{} Q {},{} {},{}",
        fmt_coord(q.p0.x),
        fmt_coord(q.p0.y),
        fmt_coord(q.p1.x),
        fmt_coord(q.p1.y),
        fmt_coord(q.p2.x),
        fmt_coord(q.p2.y)
    )
}

/// Fixed-precision coordinate for SVG output; keeps documents stable across platforms.
pub(crate) fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/arc.rs"]
mod tests;
