use std::time::Duration;

use crate::foundation::error::RouteglowResult;
use crate::region::highlight::{HighlightHistory, HighlightSet};
use crate::timeline::step::{Step, TimelineConfig};
use crate::timeline::target::{TargetRequest, TargetSnapshot, TargetStore};

/// Widget timeline state at one instant after activation.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineState {
    pub at: Duration,
    /// Step active at `at` (the last step started at or before it).
    pub step: Step,
    /// Loop iteration index, `None` during the prelude.
    pub iteration: Option<u64>,
    pub targets: TargetSnapshot,
    pub highlight: HighlightHistory,
}

/// Deterministic replay of the timeline against a virtual clock.
///
/// Runs exactly the step sequence the live controller runs, so any instant can be
/// sampled without waiting for it.
#[derive(Clone, Debug)]
pub struct Schedule {
    config: TimelineConfig,
}

struct Replay<'a> {
    config: &'a TimelineConfig,
    clock: Duration,
    store: TargetStore,
    set: HighlightSet,
    history: HighlightHistory,
    step: Step,
}

impl<'a> Replay<'a> {
    fn new(config: &'a TimelineConfig) -> Self {
        let set = HighlightSet::new(config.base.clone());
        Self {
            config,
            clock: Duration::ZERO,
            store: TargetStore::new(config.map_from),
            history: HighlightHistory::new(set.clone()),
            set,
            step: Step::HideAll,
        }
    }

    /// Run `steps` until the first one that starts after `until`. Returns `false` once
    /// `until` is reached.
    fn run(
        &mut self,
        steps: impl IntoIterator<Item = Step>,
        until: Duration,
        mut log: impl FnMut(Duration, &TargetRequest),
    ) -> bool {
        for step in steps {
            if self.clock > until {
                return false;
            }
            let plan = self.config.plan(step);
            self.step = step;
            for request in &plan.requests {
                self.store.submit(self.clock, request);
                log(self.clock, request);
            }
            let end = self.clock + plan.wait;
            if end > until {
                return false;
            }
            if let Some(effect) = &plan.highlight {
                effect.apply(&mut self.set);
                self.history.record(end, self.set.clone());
            }
            self.clock = end;
        }
        true
    }
}

impl Schedule {
    pub fn new(config: TimelineConfig) -> RouteglowResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Loop iteration running at `at`, `None` during the prelude.
    pub fn iteration_at(&self, at: Duration) -> Option<u64> {
        let into_loop = at.checked_sub(self.config.prelude())?;
        let cycle = self.config.cycle().as_nanos().max(1);
        u64::try_from(into_loop.as_nanos() / cycle).ok()
    }

    /// Full state at `at` since activation.
    #[tracing::instrument(skip(self))]
    pub fn state_at(&self, at: Duration) -> TimelineState {
        let mut replay = Replay::new(&self.config);
        let iteration = self.iteration_at(at);
        let finished_prelude = replay.run(self.config.prelude_steps(), at, |_, _| {});

        if let (true, Some(k)) = (finished_prelude, iteration) {
            // Every iteration starts from the same settled targets; replaying the
            // previous one as well restores fades that straddle the boundary.
            let first = k.saturating_sub(1);
            replay.clock = self.config.prelude() + mul(self.config.cycle(), first);
            let iterations = if k == 0 { 1 } else { 2 };
            let steps = (0..iterations).flat_map(|_| self.config.loop_steps());
            replay.run(steps, at, |_, _| {});
        }

        TimelineState {
            at,
            step: replay.step,
            iteration,
            targets: replay.store.snapshot(at),
            highlight: replay.history,
        }
    }

    /// Every target request issued up to and including `until`, with its issue time.
    pub fn requests_until(&self, until: Duration) -> Vec<(Duration, TargetRequest)> {
        let mut out = Vec::new();
        let mut replay = Replay::new(&self.config);
        replay.run(self.config.steps(), until, |at, req| out.push((at, *req)));
        out
    }
}

fn mul(d: Duration, n: u64) -> Duration {
    let nanos = d.as_nanos().saturating_mul(u128::from(n));
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
