use tokio::sync::watch;

/// Host-side end of the visibility channel.
#[derive(Debug)]
pub struct VisibilityReporter {
    tx: watch::Sender<f64>,
}

impl VisibilityReporter {
    /// Report the fraction of the widget currently visible. Out-of-range and
    /// non-finite ratios are clamped to `[0, 1]`.
    pub fn report(&self, ratio: f64) {
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.tx.send_replace(ratio);
    }

    pub fn latest(&self) -> f64 {
        *self.tx.borrow()
    }
}

/// One-shot activation gate: opens the first time the visible ratio reaches the
/// threshold and never closes again.
#[derive(Debug)]
pub struct VisibilityGate {
    rx: watch::Receiver<f64>,
    threshold: f64,
    _keep_open: Option<watch::Sender<f64>>,
}

pub fn visibility_channel(threshold: f64) -> (VisibilityReporter, VisibilityGate) {
    let (tx, rx) = watch::channel(0.0);
    (
        VisibilityReporter { tx },
        VisibilityGate {
            rx,
            threshold,
            _keep_open: None,
        },
    )
}

impl VisibilityGate {
    /// Gate that is already open (headless playback).
    pub fn open() -> Self {
        let (tx, rx) = watch::channel(1.0);
        Self {
            rx,
            threshold: 0.0,
            _keep_open: Some(tx),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Wait until the ratio first reaches the threshold. Consumes the gate, so it can
    /// fire at most once. Returns `false` if the reporter went away first.
    pub async fn wait_open(mut self) -> bool {
        let threshold = self.threshold;
        let opened = self.rx.wait_for(|ratio| *ratio >= threshold).await.is_ok();
        if opened {
            tracing::debug!(threshold, "visibility gate opened");
        }
        opened
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/gate.rs"]
mod tests;
