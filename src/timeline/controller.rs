use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::region::highlight::HighlightSet;
use crate::timeline::gate::VisibilityGate;
use crate::timeline::step::{HighlightEffect, TimelineConfig};
use crate::timeline::target::{Leg, TargetDriver, TargetHandle, TargetId};

/// Handles to every target the timeline animates.
#[derive(Clone, Debug)]
pub struct TimelineTargets {
    pub map: TargetHandle,
    pub lines: [TargetHandle; 2],
    pub labels: [TargetHandle; 2],
}

impl TimelineTargets {
    /// All five handles backed by one driver.
    pub fn from_driver(driver: Arc<dyn TargetDriver>) -> Self {
        let handle = |id| TargetHandle::new(id, driver.clone());
        Self {
            map: handle(TargetId::Map),
            lines: Leg::ALL.map(|leg| handle(TargetId::Line(leg))),
            labels: Leg::ALL.map(|leg| handle(TargetId::Label(leg))),
        }
    }

    pub fn handle(&self, id: TargetId) -> &TargetHandle {
        match id {
            TargetId::Map => &self.map,
            TargetId::Line(leg) => &self.lines[leg.index()],
            TargetId::Label(leg) => &self.labels[leg.index()],
        }
    }
}

/// Write side of the shared highlight set.
#[derive(Clone, Debug)]
pub struct HighlightHandle {
    tx: Arc<watch::Sender<HighlightSet>>,
}

impl HighlightHandle {
    pub fn new(initial: HighlightSet) -> (Self, watch::Receiver<HighlightSet>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn apply(&self, effect: &HighlightEffect) {
        self.tx.send_modify(|set| effect.apply(set));
    }

    pub fn subscribe(&self) -> watch::Receiver<HighlightSet> {
        self.tx.subscribe()
    }
}

/// Why [`TimelineController::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Cancellation fired; `steps` steps had been started.
    Cancelled { steps: u64 },
    /// The visibility reporter went away before the gate opened.
    GateClosed,
    /// The configured loop limit was reached.
    Completed { steps: u64 },
}

/// Drives the targets through the timeline in real time.
pub struct TimelineController {
    config: TimelineConfig,
    targets: TimelineTargets,
    highlight: HighlightHandle,
    loop_limit: Option<u64>,
}

impl TimelineController {
    pub fn new(config: TimelineConfig, targets: TimelineTargets, highlight: HighlightHandle) -> Self {
        Self {
            config,
            targets,
            highlight,
            loop_limit: None,
        }
    }

    /// Stop after `loops` full loop iterations instead of running forever.
    pub fn with_loop_limit(mut self, loops: u64) -> Self {
        self.loop_limit = Some(loops);
        self
    }

    /// Wait for the gate, then run the step sequence until cancelled.
    ///
    /// Every suspension point also waits on `cancel`; once it fires no further
    /// request or highlight change is issued.
    pub async fn run(self, gate: VisibilityGate, cancel: CancellationToken) -> RunOutcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return RunOutcome::Cancelled { steps: 0 },
            opened = gate.wait_open() => {
                if !opened {
                    return RunOutcome::GateClosed;
                }
            }
        }

        let activated = Instant::now();
        tracing::info!("timeline activated");

        let limit = self.loop_limit.map(|loops| {
            let per_loop = self.config.loop_steps().len() as u64;
            self.config.prelude_steps().len() as u64 + loops.saturating_mul(per_loop)
        });
        let mut deadline = activated;
        let mut started = 0_u64;

        for step in self.config.steps() {
            if limit.is_some_and(|limit| started >= limit) {
                break;
            }
            if cancel.is_cancelled() {
                return RunOutcome::Cancelled { steps: started };
            }

            let plan = self.config.plan(step);
            started += 1;
            tracing::debug!(
                step = %step,
                at_ms = deadline.duration_since(activated).as_millis() as u64,
                requests = plan.requests.len(),
                "timeline step"
            );
            for request in plan.requests {
                self.targets.handle(request.target).submit(request);
            }

            deadline += plan.wait;
            if !plan.wait.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return RunOutcome::Cancelled { steps: started },
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            if let Some(effect) = &plan.highlight {
                self.highlight.apply(effect);
            }
        }

        tracing::info!(steps = started, "timeline loop limit reached");
        RunOutcome::Completed { steps: started }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/controller.rs"]
mod tests;
