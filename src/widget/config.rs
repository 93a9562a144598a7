use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::core::{Canvas, Rgba8, Transform2D, Vec2};
use crate::foundation::error::{RouteglowError, RouteglowResult};
use crate::geo::projection::{GeoPoint, Projection, ProjectionConfig};
use crate::region::table::{RegionCode, RegionTable};
use crate::timeline::step::StepTimings;

/// The origin marker; the map also zooms in on it before activation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Origin {
    pub code: RegionCode,
    pub caption: String,
    pub coords: GeoPoint,
}

/// One connector destination.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Destination {
    pub code: RegionCode,
    pub label: String,
    pub coords: GeoPoint,
    /// Signed curvature of the connector, see [`crate::geo::arc::arc_path`].
    pub curve_offset: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Magnification around the origin before activation.
    pub from_scale: f64,
    pub to_scale: f64,
    pub to_translate: Vec2,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            from_scale: 3.5,
            to_scale: 1.5,
            to_translate: Vec2::ZERO,
        }
    }
}

/// Step durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub zoom_ms: u64,
    pub zoom_ease: Ease,
    pub settle_ms: u64,
    pub draw_ms: u64,
    pub draw_ease: Ease,
    pub label_ms: u64,
    pub label_ease: Ease,
    pub hold_ms: u64,
    pub rest_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::from(StepTimings::default())
    }
}

impl From<StepTimings> for TimingConfig {
    fn from(t: StepTimings) -> Self {
        let ms = |d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self {
            zoom_ms: ms(t.zoom),
            zoom_ease: t.zoom_ease,
            settle_ms: ms(t.settle),
            draw_ms: ms(t.draw),
            draw_ease: t.draw_ease,
            label_ms: ms(t.label),
            label_ease: t.label_ease,
            hold_ms: ms(t.hold),
            rest_ms: ms(t.rest),
        }
    }
}

impl From<TimingConfig> for StepTimings {
    fn from(t: TimingConfig) -> Self {
        Self {
            zoom: Duration::from_millis(t.zoom_ms),
            zoom_ease: t.zoom_ease,
            settle: Duration::from_millis(t.settle_ms),
            draw: Duration::from_millis(t.draw_ms),
            draw_ease: t.draw_ease,
            label: Duration::from_millis(t.label_ms),
            label_ease: t.label_ease,
            hold: Duration::from_millis(t.hold_ms),
            rest: Duration::from_millis(t.rest_ms),
        }
    }
}

/// Colors, strokes and typography.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: Rgba8,
    pub land: Rgba8,
    pub highlight: Rgba8,
    pub border: Rgba8,
    pub border_width: f64,
    /// Fill fade between land and highlight.
    pub fill_fade_ms: u64,
    pub fill_fade_ease: Ease,
    pub accent: Rgba8,
    pub line_width: f64,
    pub line_dash: [f64; 2],
    /// Drop-shadow blur radius of lines and dots.
    pub glow_radius: f64,
    pub text_glow_radius: f64,
    pub text: Rgba8,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    /// Letter spacing in em.
    pub letter_spacing: f64,
    pub marker_radius: f64,
    /// Label text sits this far above its dot.
    pub label_lift: f64,
    pub caption_offset: Vec2,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(0x0a, 0x0f, 0x1d),
            land: Rgba8::opaque(0x1a, 0x1a, 0x1a),
            highlight: Rgba8::new(6, 182, 212, 102),
            border: Rgba8::opaque(0x33, 0x33, 0x33),
            border_width: 0.5,
            fill_fade_ms: 500,
            fill_fade_ease: Ease::Css,
            accent: Rgba8::opaque(0x06, 0xb6, 0xd4),
            line_width: 1.5,
            line_dash: [4.0, 4.0],
            glow_radius: 5.0,
            text_glow_radius: 3.0,
            text: Rgba8::opaque(0xff, 0xff, 0xff),
            font_family: "Inter, sans-serif".to_string(),
            font_size: 14.0,
            font_weight: 600,
            letter_spacing: 0.05,
            marker_radius: 3.0,
            label_lift: 10.0,
            caption_offset: Vec2::new(10.0, 4.0),
        }
    }
}

impl StyleConfig {
    pub fn fill_fade(&self) -> Duration {
        Duration::from_millis(self.fill_fade_ms)
    }
}

/// Complete widget configuration. `Default` is the stock widget.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub canvas: Canvas,
    pub projection: ProjectionConfig,
    pub origin: Origin,
    pub destinations: [Destination; 2],
    pub zoom: ZoomConfig,
    pub timing: TimingConfig,
    /// Visible fraction that activates the timeline.
    pub visibility_threshold: f64,
    pub style: StyleConfig,
    /// Regions never drawn.
    pub held_out: Vec<RegionCode>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1200,
                height: 800,
            },
            projection: ProjectionConfig::default(),
            origin: Origin {
                code: RegionCode::new("IND"),
                caption: "Flash Space".to_string(),
                coords: GeoPoint::new(78.9629, 20.5937),
            },
            destinations: [
                Destination {
                    code: RegionCode::new("ARE"),
                    label: "UAE".to_string(),
                    coords: GeoPoint::new(53.8478, 23.4241),
                    curve_offset: 0.2,
                },
                Destination {
                    code: RegionCode::new("USA"),
                    label: "USA".to_string(),
                    coords: GeoPoint::new(-95.7129, 37.0902),
                    curve_offset: -0.3,
                },
            ],
            zoom: ZoomConfig::default(),
            timing: TimingConfig::default(),
            visibility_threshold: 0.3,
            style: StyleConfig::default(),
            held_out: vec![RegionCode::new("ATA")],
        }
    }
}

impl WidgetConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> RouteglowResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| RouteglowError::serde(format!("parse widget config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RouteglowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RouteglowError::validation(format!("open widget config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> RouteglowResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(RouteglowError::validation("canvas width/height must be > 0"));
        }
        Projection::new(self.projection)?;

        let threshold = self.visibility_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(RouteglowError::validation(
                "visibility_threshold must be within [0, 1]",
            ));
        }
        for (name, scale) in [
            ("zoom.from_scale", self.zoom.from_scale),
            ("zoom.to_scale", self.zoom.to_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(RouteglowError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.zoom.to_translate.x.is_finite() || !self.zoom.to_translate.y.is_finite() {
            return Err(RouteglowError::validation("zoom.to_translate must be finite"));
        }
        for dest in &self.destinations {
            if !dest.curve_offset.is_finite() {
                return Err(RouteglowError::validation(format!(
                    "curve_offset of '{}' must be finite",
                    dest.code
                )));
            }
        }

        let s = &self.style;
        for (name, v) in [
            ("style.border_width", s.border_width),
            ("style.line_width", s.line_width),
            ("style.line_dash[0]", s.line_dash[0]),
            ("style.line_dash[1]", s.line_dash[1]),
            ("style.glow_radius", s.glow_radius),
            ("style.text_glow_radius", s.text_glow_radius),
            ("style.marker_radius", s.marker_radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(RouteglowError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !s.font_size.is_finite() || s.font_size <= 0.0 {
            return Err(RouteglowError::validation("style.font_size must be > 0"));
        }

        let cycle = StepTimings::from(self.timing);
        let loop_ms = 2 * (cycle.draw + cycle.label) + cycle.hold + cycle.rest;
        if loop_ms.is_zero() {
            return Err(RouteglowError::validation(
                "timing must give the loop a non-zero duration",
            ));
        }
        Ok(())
    }

    /// Map transform while zoomed in on `origin_px`.
    pub fn map_from(&self, origin_px: crate::foundation::core::Point) -> Transform2D {
        crate::timeline::step::zoom_on(origin_px, self.zoom.from_scale, self.canvas.center())
    }

    /// Alias table with this configuration's held-out regions.
    pub fn region_table(&self) -> RegionTable {
        let mut table = RegionTable::builtin();
        for code in &self.held_out {
            table.hold_out(code.clone());
        }
        table
    }

    pub fn map_to(&self) -> Transform2D {
        Transform2D::scale_then_translate(self.zoom.to_scale, self.zoom.to_translate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/config.rs"]
mod tests;
