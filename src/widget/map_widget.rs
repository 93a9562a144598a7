use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::foundation::error::{RouteglowError, RouteglowResult};
use crate::geo::atlas::Atlas;
use crate::geo::projection::Projection;
use crate::region::highlight::{HighlightHistory, HighlightSet};
use crate::timeline::controller::{HighlightHandle, RunOutcome, TimelineController, TimelineTargets};
use crate::timeline::gate::{VisibilityReporter, visibility_channel};
use crate::timeline::schedule::Schedule;
use crate::timeline::step::TimelineConfig;
use crate::timeline::target::{TargetDriver, TargetRequest, TargetStore};
use crate::widget::config::WidgetConfig;
use crate::widget::layout::MapLayout;
use crate::widget::raster::{FrameRGBA, Rasterizer};
use crate::widget::scene::Scene;
use crate::widget::svg::scene_svg;

/// The animated map: configuration, projected layout and timeline.
///
/// Offline rendering samples the deterministic [`Schedule`]; [`MapWidget::mount`] runs
/// the same timeline live on the tokio runtime.
#[derive(Clone, Debug)]
pub struct MapWidget {
    config: WidgetConfig,
    layout: Arc<MapLayout>,
    schedule: Schedule,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Stop after this many loop iterations.
    pub loop_limit: Option<u64>,
}

impl MapWidget {
    /// Validate `config` and project everything once. Without an atlas only the
    /// connectors, labels and origin marker are drawn.
    #[tracing::instrument(skip_all)]
    pub fn new(config: WidgetConfig, atlas: Option<&Atlas>) -> RouteglowResult<Self> {
        config.validate()?;
        let projection = Projection::new(config.projection)?;
        let layout = MapLayout::build(&config, &projection, &config.region_table(), atlas);

        let origin_px = layout.origin.unwrap_or(config.canvas.center());
        let timeline = TimelineConfig {
            timings: config.timing.into(),
            map_from: config.map_from(origin_px),
            map_to: config.map_to(),
            base: config.origin.code.clone(),
            destinations: config.destinations.each_ref().map(|d| d.code.clone()),
        };
        let schedule = Schedule::new(timeline)?;

        Ok(Self {
            config,
            layout: Arc::new(layout),
            schedule,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Scene before activation: zoomed in on the origin, overlays hidden.
    pub fn idle_scene(&self) -> Scene {
        let timeline = self.schedule.config();
        let targets = TargetStore::new(timeline.map_from).snapshot(Duration::ZERO);
        let highlight = HighlightHistory::new(HighlightSet::new(timeline.base.clone()));
        Scene::sample(
            &self.layout,
            &self.config.style,
            &targets,
            &highlight,
            Duration::ZERO,
        )
    }

    /// Scene `at` after activation.
    pub fn scene_at(&self, at: Duration) -> Scene {
        let state = self.schedule.state_at(at);
        Scene::sample(
            &self.layout,
            &self.config.style,
            &state.targets,
            &state.highlight,
            at,
        )
    }

    pub fn render_svg(&self, scene: &Scene) -> String {
        scene_svg(self.config.canvas, &self.layout, &self.config.style, scene)
    }

    pub fn render_svg_at(&self, at: Duration) -> String {
        self.render_svg(&self.scene_at(at))
    }

    pub fn render_frame_at(&self, at: Duration, raster: &Rasterizer) -> RouteglowResult<FrameRGBA> {
        let frame = raster.render(&self.render_svg_at(at))?;
        if frame.width != self.config.canvas.width || frame.height != self.config.canvas.height {
            return Err(RouteglowError::render(format!(
                "rendered {}x{} frame for a {}x{} canvas",
                frame.width, frame.height, self.config.canvas.width, self.config.canvas.height
            )));
        }
        Ok(frame)
    }

    /// Start the live timeline. Must be called inside a tokio runtime.
    pub fn mount(&self) -> RouteglowResult<MountedWidget> {
        self.mount_with(MountOptions::default())
    }

    pub fn mount_with(&self, opts: MountOptions) -> RouteglowResult<MountedWidget> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RouteglowError::validation(format!("mount needs a tokio runtime: {e}")))?;

        let timeline = self.schedule.config().clone();
        let targets = Arc::new(LiveTargets {
            origin: Instant::now(),
            store: Mutex::new(TargetStore::new(timeline.map_from)),
        });
        let initial = HighlightSet::new(timeline.base.clone());
        let (highlight, highlight_rx) = HighlightHandle::new(initial.clone());
        let (reporter, gate) = visibility_channel(self.config.visibility_threshold);
        let cancel = CancellationToken::new();

        let mut controller = TimelineController::new(
            timeline,
            TimelineTargets::from_driver(targets.clone()),
            highlight,
        );
        if let Some(loops) = opts.loop_limit {
            controller = controller.with_loop_limit(loops);
        }
        let task = runtime.spawn(controller.run(gate, cancel.clone()));
        tracing::info!(threshold = self.config.visibility_threshold, "widget mounted");

        Ok(MountedWidget {
            layout: self.layout.clone(),
            config: self.config.clone(),
            targets,
            highlight_rx,
            history: Mutex::new(HighlightHistory::new(initial)),
            reporter,
            cancel,
            task: Some(task),
        })
    }
}

/// Live target state shared between the controller task and the render side.
struct LiveTargets {
    origin: Instant,
    store: Mutex<TargetStore>,
}

impl LiveTargets {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl TargetDriver for LiveTargets {
    fn submit(&self, request: TargetRequest) {
        let at = self.elapsed();
        tracing::debug!(
            id = %request.target,
            at_ms = at.as_millis() as u64,
            transition_ms = request.transition.duration().as_millis() as u64,
            "target request"
        );
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submit(at, &request);
    }
}

/// A widget whose timeline is running. Dropping it cancels the timeline.
pub struct MountedWidget {
    layout: Arc<MapLayout>,
    config: WidgetConfig,
    targets: Arc<LiveTargets>,
    highlight_rx: watch::Receiver<HighlightSet>,
    history: Mutex<HighlightHistory>,
    reporter: VisibilityReporter,
    cancel: CancellationToken,
    task: Option<JoinHandle<RunOutcome>>,
}

impl MountedWidget {
    /// Forward the host's visible ratio; the timeline starts the first time it reaches
    /// the configured threshold.
    pub fn report_visibility(&self, ratio: f64) {
        self.reporter.report(ratio);
    }

    pub fn highlight(&self) -> HighlightSet {
        self.highlight_rx.borrow().clone()
    }

    /// Time since mount.
    pub fn elapsed(&self) -> Duration {
        self.targets.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Current scene. Highlight changes are timestamped when first observed here.
    pub fn scene(&self) -> Scene {
        let at = self.targets.elapsed();
        let targets = self
            .targets
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(at);
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.record(at, self.highlight_rx.borrow().clone());
        Scene::sample(&self.layout, &self.config.style, &targets, &history, at)
    }

    pub fn render_svg(&self) -> String {
        scene_svg(self.config.canvas, &self.layout, &self.config.style, &self.scene())
    }

    /// Wait for the timeline to end on its own (loop limit or closed gate).
    pub async fn finished(&mut self) -> Option<RunOutcome> {
        let task = self.task.take()?;
        task.await.ok()
    }

    /// Cancel the timeline and wait for the task to stop.
    pub async fn unmount(mut self) -> Option<RunOutcome> {
        self.cancel.cancel();
        let outcome = match self.task.take() {
            Some(task) => task.await.ok(),
            None => None,
        };
        tracing::info!(?outcome, "widget unmounted");
        outcome
    }
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for MountedWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedWidget")
            .field("elapsed", &self.elapsed())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/map_widget.rs"]
mod tests;
