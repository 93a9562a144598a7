//! Routeglow renders an animated world route map.
//!
//! A fixed projection places an origin and two destinations on a world map. A looping
//! timeline zooms out from the origin, draws curved connectors to each destination,
//! fades in their labels and lights up the matching countries.
//!
//! - Build a [`MapWidget`] from a [`WidgetConfig`] and an optional [`Atlas`]
//! - Render any instant offline with [`MapWidget::scene_at`] / [`MapWidget::render_svg_at`]
//! - Or [`MapWidget::mount`] it to run the timeline live on a tokio runtime
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod geo;
pub(crate) mod region;
pub(crate) mod timeline;
pub(crate) mod widget;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rgba8, Transform2D, Vec2,
};
pub use crate::foundation::error::{RouteglowError, RouteglowResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::lerp::Lerp;
pub use crate::geo::arc::{ArcPath, arc_path};
pub use crate::geo::atlas::{Atlas, Region, RegionIdentity};
pub use crate::geo::projection::{GeoPoint, PixelPoint, Projection, ProjectionConfig, ProjectionKind};
pub use crate::region::highlight::{HighlightHistory, HighlightSet};
pub use crate::region::table::{RegionCode, RegionTable};
pub use crate::timeline::controller::{
    HighlightHandle, RunOutcome, TimelineController, TimelineTargets,
};
pub use crate::timeline::gate::{VisibilityGate, VisibilityReporter, visibility_channel};
pub use crate::timeline::schedule::{Schedule, TimelineState};
pub use crate::timeline::step::{
    HighlightEffect, Step, StepPlan, StepTimings, TimelineConfig, zoom_on,
};
pub use crate::timeline::target::{
    Leg, TargetDriver, TargetHandle, TargetId, TargetPatch, TargetRequest, TargetSnapshot,
    TargetState, TargetStore, Transition,
};
pub use crate::widget::config::{
    Destination, Origin, StyleConfig, TimingConfig, WidgetConfig, ZoomConfig,
};
pub use crate::widget::layout::{LegLayout, MapLayout, RegionShape};
pub use crate::widget::map_widget::{MapWidget, MountOptions, MountedWidget};
pub use crate::widget::raster::{FrameRGBA, Rasterizer};
pub use crate::widget::scene::{LineState, Scene};
pub use crate::widget::svg::scene_svg;
