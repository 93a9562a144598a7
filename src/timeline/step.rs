use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::core::{Point, Transform2D, Vec2};
use crate::foundation::error::{RouteglowError, RouteglowResult};
use crate::region::highlight::HighlightSet;
use crate::region::table::RegionCode;
use crate::timeline::target::{Leg, TargetId, TargetPatch, TargetRequest, Transition};

/// One step of the widget timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Step {
    HideAll,
    ZoomOut,
    Pause(Duration),
    DrawLine(Leg),
    ShowLabel(Leg),
    Hold(Duration),
    Reset,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Self::HideAll => "hide-all",
            Self::ZoomOut => "zoom-out",
            Self::Pause(_) => "pause",
            Self::DrawLine(Leg::First) => "draw-line-1",
            Self::DrawLine(Leg::Second) => "draw-line-2",
            Self::ShowLabel(Leg::First) => "show-label-1",
            Self::ShowLabel(Leg::Second) => "show-label-2",
            Self::Hold(_) => "hold",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Highlight mutation applied when a step's wait completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HighlightEffect {
    Append(RegionCode),
    Reset,
}

impl HighlightEffect {
    pub fn apply(&self, set: &mut HighlightSet) {
        match self {
            Self::Append(code) => set.push(code.clone()),
            Self::Reset => set.reset(),
        }
    }
}

/// Everything a sequencer does for one step: issue `requests`, wait, then apply
/// `highlight`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepPlan {
    pub step: Step,
    pub requests: Vec<TargetRequest>,
    pub wait: Duration,
    pub highlight: Option<HighlightEffect>,
}

/// Durations and easing of the timeline steps.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepTimings {
    pub zoom: Duration,
    pub zoom_ease: Ease,
    /// Pause after the zoom, before the first loop iteration.
    pub settle: Duration,
    pub draw: Duration,
    pub draw_ease: Ease,
    pub label: Duration,
    pub label_ease: Ease,
    pub hold: Duration,
    /// Pause after reset, before the next iteration.
    pub rest: Duration,
}

impl Default for StepTimings {
    fn default() -> Self {
        Self {
            zoom: Duration::from_millis(500),
            zoom_ease: Ease::EaseInOut,
            settle: Duration::from_millis(300),
            draw: Duration::from_millis(1500),
            draw_ease: Ease::EaseInOut,
            label: Duration::from_millis(200),
            label_ease: Ease::EaseOut,
            hold: Duration::from_millis(2000),
            rest: Duration::from_millis(100),
        }
    }
}

/// Map transform that magnifies by `scale` about `focus` and places it at `anchor`.
pub fn zoom_on(focus: Point, scale: f64, anchor: Point) -> Transform2D {
    Transform2D::scale_then_translate(
        scale,
        Vec2::new(anchor.x - focus.x * scale, anchor.y - focus.y * scale),
    )
}

/// Full description of the timeline: timings, map zoom endpoints, highlight codes.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineConfig {
    pub timings: StepTimings,
    pub map_from: Transform2D,
    pub map_to: Transform2D,
    pub base: RegionCode,
    pub destinations: [RegionCode; 2],
}

impl TimelineConfig {
    pub fn validate(&self) -> RouteglowResult<()> {
        if self.cycle().is_zero() {
            return Err(RouteglowError::validation(
                "timeline loop must have a non-zero duration",
            ));
        }
        for code in std::iter::once(&self.base).chain(self.destinations.iter()) {
            if code.as_str().is_empty() {
                return Err(RouteglowError::validation("region code must be non-empty"));
            }
        }
        for (name, t) in [("map_from", &self.map_from), ("map_to", &self.map_to)] {
            let finite = [t.translate.x, t.translate.y, t.scale.x, t.scale.y]
                .iter()
                .all(|v| v.is_finite());
            if !finite || t.scale.x <= 0.0 || t.scale.y <= 0.0 {
                return Err(RouteglowError::validation(format!(
                    "{name} must have a finite, positive scale"
                )));
            }
        }
        Ok(())
    }

    /// Steps run once after activation.
    pub fn prelude_steps(&self) -> [Step; 3] {
        [Step::HideAll, Step::ZoomOut, Step::Pause(self.timings.settle)]
    }

    /// Steps of one loop iteration.
    pub fn loop_steps(&self) -> [Step; 7] {
        [
            Step::DrawLine(Leg::First),
            Step::ShowLabel(Leg::First),
            Step::DrawLine(Leg::Second),
            Step::ShowLabel(Leg::Second),
            Step::Hold(self.timings.hold),
            Step::Reset,
            Step::Pause(self.timings.rest),
        ]
    }

    /// The whole, endless step sequence.
    pub fn steps(&self) -> impl Iterator<Item = Step> + use<> {
        self.prelude_steps()
            .into_iter()
            .chain(self.loop_steps().into_iter().cycle())
    }

    pub fn prelude(&self) -> Duration {
        self.prelude_steps().iter().map(|s| self.wait_of(*s)).sum()
    }

    /// Length of one loop iteration.
    pub fn cycle(&self) -> Duration {
        self.loop_steps().iter().map(|s| self.wait_of(*s)).sum()
    }

    fn wait_of(&self, step: Step) -> Duration {
        let t = &self.timings;
        match step {
            Step::HideAll | Step::Reset => Duration::ZERO,
            Step::ZoomOut => t.zoom,
            Step::Pause(d) | Step::Hold(d) => d,
            Step::DrawLine(_) => t.draw,
            Step::ShowLabel(_) => t.label,
        }
    }

    pub fn plan(&self, step: Step) -> StepPlan {
        let t = &self.timings;
        let hide_overlays = || {
            TargetId::OVERLAYS
                .into_iter()
                .map(|id| TargetRequest::new(id, TargetPatch::hidden(), Transition::Instant))
                .collect::<Vec<_>>()
        };
        let (requests, highlight) = match step {
            Step::HideAll => (hide_overlays(), None),
            Step::Reset => (hide_overlays(), Some(HighlightEffect::Reset)),
            Step::ZoomOut => (
                vec![
                    TargetRequest::new(
                        TargetId::Map,
                        TargetPatch::default().transform(self.map_to),
                        Transition::tween(t.zoom, t.zoom_ease),
                    )
                    .starting_at(TargetPatch::default().transform(self.map_from)),
                ],
                None,
            ),
            Step::DrawLine(leg) => (
                vec![
                    TargetRequest::new(
                        TargetId::Line(leg),
                        TargetPatch::default().path_length(1.0).opacity(1.0),
                        Transition::tween(t.draw, t.draw_ease),
                    )
                    .starting_at(TargetPatch::hidden()),
                ],
                Some(HighlightEffect::Append(
                    self.destinations[leg.index()].clone(),
                )),
            ),
            Step::ShowLabel(leg) => (
                vec![TargetRequest::new(
                    TargetId::Label(leg),
                    TargetPatch::default().opacity(1.0),
                    Transition::tween(t.label, t.label_ease),
                )],
                None,
            ),
            Step::Pause(_) | Step::Hold(_) => (Vec::new(), None),
        };
        StepPlan {
            step,
            requests,
            wait: self.wait_of(step),
            highlight,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/step.rs"]
mod tests;
