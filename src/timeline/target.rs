use std::sync::Arc;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::foundation::core::Transform2D;

/// One of the two connector legs (origin -> destination).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Leg {
    First,
    Second,
}

impl Leg {
    pub const ALL: [Leg; 2] = [Leg::First, Leg::Second];

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// 1-based leg number as shown in target names.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

/// Addressable animation target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum TargetId {
    Map,
    Line(Leg),
    Label(Leg),
}

impl TargetId {
    pub const ALL: [TargetId; 5] = [
        TargetId::Map,
        TargetId::Line(Leg::First),
        TargetId::Label(Leg::First),
        TargetId::Line(Leg::Second),
        TargetId::Label(Leg::Second),
    ];

    /// The line and label targets, in the order hide/reset requests are issued.
    pub const OVERLAYS: [TargetId; 4] = [
        TargetId::Line(Leg::First),
        TargetId::Label(Leg::First),
        TargetId::Line(Leg::Second),
        TargetId::Label(Leg::Second),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Line(Leg::First) => "line-1",
            Self::Label(Leg::First) => "label-1",
            Self::Line(Leg::Second) => "line-2",
            Self::Label(Leg::Second) => "label-2",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Map => 0,
            Self::Line(leg) => 1 + leg.index() * 2,
            Self::Label(leg) => 2 + leg.index() * 2,
        }
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Displayed state of a target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetState {
    /// Path-completion fraction in `[0, 1]`.
    pub path_length: f64,
    pub opacity: f64,
    pub transform: Transform2D,
}

impl TargetState {
    pub const HIDDEN: TargetState = TargetState {
        path_length: 0.0,
        opacity: 0.0,
        transform: Transform2D {
            translate: kurbo::Vec2::ZERO,
            scale: kurbo::Vec2::new(1.0, 1.0),
            anchor: kurbo::Vec2::ZERO,
        },
    };

    pub fn with_transform(transform: Transform2D) -> Self {
        Self {
            path_length: 1.0,
            opacity: 1.0,
            transform,
        }
    }
}

impl Default for TargetState {
    fn default() -> Self {
        Self::HIDDEN
    }
}

impl Lerp for TargetState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            path_length: f64::lerp(&a.path_length, &b.path_length, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
            transform: Transform2D::lerp(&a.transform, &b.transform, t),
        }
    }
}

/// Partial state; unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform2D>,
}

impl TargetPatch {
    /// Path and opacity both at 0.
    pub fn hidden() -> Self {
        Self::default().path_length(0.0).opacity(0.0)
    }

    pub fn path_length(mut self, v: f64) -> Self {
        self.path_length = Some(v);
        self
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn transform(mut self, v: Transform2D) -> Self {
        self.transform = Some(v);
        self
    }

    pub fn apply(&self, state: TargetState) -> TargetState {
        TargetState {
            path_length: self.path_length.unwrap_or(state.path_length),
            opacity: self.opacity.unwrap_or(state.opacity),
            transform: self.transform.unwrap_or(state.transform),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    Instant,
    Tween { duration: Duration, ease: Ease },
}

impl Transition {
    pub fn tween(duration: Duration, ease: Ease) -> Self {
        if duration.is_zero() {
            Self::Instant
        } else {
            Self::Tween { duration, ease }
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            Self::Instant => Duration::ZERO,
            Self::Tween { duration, .. } => duration,
        }
    }
}

/// "Animate `target` to `patch`", optionally jumping to `from` first.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetRequest {
    pub target: TargetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<TargetPatch>,
    pub to: TargetPatch,
    pub transition: Transition,
}

impl TargetRequest {
    pub fn new(target: TargetId, to: TargetPatch, transition: Transition) -> Self {
        Self {
            target,
            from: None,
            to,
            transition,
        }
    }

    pub fn starting_at(mut self, from: TargetPatch) -> Self {
        self.from = Some(from);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Track {
    from: TargetState,
    to: TargetState,
    start: Duration,
    transition: Transition,
}

impl Track {
    fn settled(state: TargetState) -> Self {
        Self {
            from: state,
            to: state,
            start: Duration::ZERO,
            transition: Transition::Instant,
        }
    }

    fn sample(&self, at: Duration) -> TargetState {
        match self.transition {
            Transition::Instant => self.to,
            Transition::Tween { duration, ease } => {
                let elapsed = at.saturating_sub(self.start);
                if elapsed >= duration {
                    return self.to;
                }
                let t = ease.apply(elapsed.as_secs_f64() / duration.as_secs_f64());
                TargetState::lerp(&self.from, &self.to, t)
            }
        }
    }
}

/// Target states at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetSnapshot {
    pub map: TargetState,
    pub lines: [TargetState; 2],
    pub labels: [TargetState; 2],
}

/// Interpolating state for every target; the last submitted request wins.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetStore {
    tracks: [Track; 5],
}

impl TargetStore {
    /// Map at `map_transform`, lines and labels hidden.
    pub fn new(map_transform: Transform2D) -> Self {
        let mut tracks = [Track::settled(TargetState::HIDDEN); 5];
        tracks[TargetId::Map.slot()] = Track::settled(TargetState::with_transform(map_transform));
        Self { tracks }
    }

    /// Apply `request` issued at `at`. The tween starts from the currently displayed
    /// value unless the request names an explicit start.
    pub fn submit(&mut self, at: Duration, request: &TargetRequest) {
        let track = &mut self.tracks[request.target.slot()];
        let current = track.sample(at);
        let from = match &request.from {
            Some(patch) => patch.apply(current),
            None => current,
        };
        *track = Track {
            from,
            to: request.to.apply(from),
            start: at,
            transition: request.transition,
        };
    }

    pub fn sample(&self, target: TargetId, at: Duration) -> TargetState {
        self.tracks[target.slot()].sample(at)
    }

    pub fn snapshot(&self, at: Duration) -> TargetSnapshot {
        TargetSnapshot {
            map: self.sample(TargetId::Map, at),
            lines: Leg::ALL.map(|leg| self.sample(TargetId::Line(leg), at)),
            labels: Leg::ALL.map(|leg| self.sample(TargetId::Label(leg), at)),
        }
    }
}

/// Receiver of target requests (live store, recorder, ...).
pub trait TargetDriver: Send + Sync {
    fn submit(&self, request: TargetRequest);
}

/// Explicit handle to one animation target.
#[derive(Clone)]
pub struct TargetHandle {
    id: TargetId,
    driver: Arc<dyn TargetDriver>,
}

impl TargetHandle {
    pub fn new(id: TargetId, driver: Arc<dyn TargetDriver>) -> Self {
        Self { id, driver }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Forward `request` to this handle's target.
    pub fn submit(&self, mut request: TargetRequest) {
        request.target = self.id;
        self.driver.submit(request);
    }
}

impl std::fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/target.rs"]
mod tests;
