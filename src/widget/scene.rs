use std::time::Duration;

use crate::animation::lerp::Lerp;
use crate::foundation::core::{Rgba8, Transform2D};
use crate::region::highlight::HighlightHistory;
use crate::timeline::target::TargetSnapshot;
use crate::widget::config::StyleConfig;
use crate::widget::layout::MapLayout;

/// Drawn state of one connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineState {
    /// Portion of the arc drawn, `[0, 1]`.
    pub fraction: f64,
    pub opacity: f64,
}

/// Sampled, render-ready state of the whole widget at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub at: Duration,
    pub map: Transform2D,
    pub lines: [LineState; 2],
    pub labels: [f64; 2],
    /// Fill per [`MapLayout::regions`] entry.
    pub fills: Vec<Rgba8>,
}

impl Scene {
    pub fn sample(
        layout: &MapLayout,
        style: &StyleConfig,
        targets: &TargetSnapshot,
        highlight: &HighlightHistory,
        at: Duration,
    ) -> Self {
        let fade = style.fill_fade();
        let fills = layout
            .regions
            .iter()
            .map(|region| {
                let w = highlight.weight(&region.codes, at, fade, style.fill_fade_ease);
                Rgba8::lerp(&style.land, &style.highlight, w)
            })
            .collect();

        Self {
            at,
            map: targets.map.transform,
            lines: targets.lines.map(|t| LineState {
                fraction: t.path_length.clamp(0.0, 1.0),
                opacity: t.opacity.clamp(0.0, 1.0),
            }),
            labels: targets.labels.map(|t| t.opacity.clamp(0.0, 1.0)),
            fills,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/scene.rs"]
mod tests;
