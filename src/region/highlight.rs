use std::collections::VecDeque;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::region::table::RegionCode;

/// Ordered sequence of highlighted region codes.
///
/// The set always starts from (and resets to) its base entry; each completed draw step
/// appends one code.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HighlightSet {
    base: RegionCode,
    entries: Vec<RegionCode>,
}

impl HighlightSet {
    pub fn new(base: impl Into<RegionCode>) -> Self {
        let base = base.into();
        Self {
            entries: vec![base.clone()],
            base,
        }
    }

    pub fn push(&mut self, code: impl Into<RegionCode>) {
        self.entries.push(code.into());
    }

    /// Back to the single base entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(self.base.clone());
    }

    pub fn base(&self) -> &RegionCode {
        &self.base
    }

    pub fn entries(&self) -> &[RegionCode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &RegionCode) -> bool {
        self.entries.contains(code)
    }

    /// Whether a region answering to any of `codes` is lit.
    pub fn is_highlighted(&self, codes: &[RegionCode]) -> bool {
        codes.iter().any(|c| self.contains(c))
    }
}

/// Changes kept for fade sampling; anything older is treated as settled.
const RETAINED_CHANGES: usize = 8;

#[derive(Clone, Debug, PartialEq)]
struct HighlightChange {
    at: Duration,
    after: HighlightSet,
}

/// Current highlight set plus its recent changes, enough to sample fill fades.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightHistory {
    settled: HighlightSet,
    changes: VecDeque<HighlightChange>,
    current: HighlightSet,
}

/// One region's fill transition.
#[derive(Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    since: Option<Duration>,
}

impl Fade {
    fn value(self, at: Duration, fade: Duration, ease: Ease) -> f64 {
        let Some(since) = self.since else {
            return self.to;
        };
        let elapsed = at.saturating_sub(since);
        if fade.is_zero() || elapsed >= fade {
            return self.to;
        }
        let t = ease.apply(elapsed.as_secs_f64() / fade.as_secs_f64());
        self.from + (self.to - self.from) * t
    }
}

fn membership(set: &HighlightSet, codes: &[RegionCode]) -> f64 {
    if set.is_highlighted(codes) { 1.0 } else { 0.0 }
}

impl HighlightHistory {
    pub fn new(initial: HighlightSet) -> Self {
        Self {
            settled: initial.clone(),
            changes: VecDeque::new(),
            current: initial,
        }
    }

    pub fn current(&self) -> &HighlightSet {
        &self.current
    }

    /// Record the set observed at `at`. Identical sets are not a change.
    pub fn record(&mut self, at: Duration, set: HighlightSet) {
        if set == self.current {
            return;
        }
        self.current = set.clone();
        self.changes.push_back(HighlightChange { at, after: set });
        if self.changes.len() > RETAINED_CHANGES
            && let Some(oldest) = self.changes.pop_front()
        {
            self.settled = oldest.after;
        }
    }

    /// Highlight weight in `[0, 1]` for a region answering to `codes`.
    ///
    /// Each flip of the region's membership starts a `fade` from the weight shown at
    /// that moment, so a fade interrupted by a later change continues smoothly.
    pub fn weight(&self, codes: &[RegionCode], at: Duration, fade: Duration, ease: Ease) -> f64 {
        let settled = membership(&self.settled, codes);
        let mut shown = Fade {
            from: settled,
            to: settled,
            since: None,
        };
        for change in &self.changes {
            let target = membership(&change.after, codes);
            if target != shown.to {
                shown = Fade {
                    from: shown.value(change.at, fade, ease),
                    to: target,
                    since: Some(change.at),
                };
            }
        }
        shown.value(at, fade, ease)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/highlight.rs"]
mod tests;
