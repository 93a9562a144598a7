use super::*;
use crate::region::table::RegionCode;

fn atlas() -> Atlas {
    Atlas::from_json_str(include_str!("../../data/mini_world.geojson")).unwrap()
}

fn widget() -> MapWidget {
    MapWidget::new(WidgetConfig::default(), Some(&atlas())).unwrap()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn construction_validates_the_config() {
    let mut config = WidgetConfig::default();
    config.visibility_threshold = f64::NAN;
    assert!(matches!(
        MapWidget::new(config, None),
        Err(RouteglowError::Validation(_))
    ));
}

#[test]
fn idle_scene_is_zoomed_in_with_only_the_base_lit() {
    let w = widget();
    let scene = w.idle_scene();
    assert_eq!(scene.map, w.schedule().config().map_from);
    assert!(scene.lines.iter().all(|l| l.opacity == 0.0));
    let lit = scene
        .fills
        .iter()
        .filter(|f| **f == w.config().style.highlight)
        .count();
    assert_eq!(lit, 1);
}

#[test]
fn offline_frames_follow_the_schedule() {
    let w = widget();
    assert!(!w.render_svg_at(ms(600)).contains(">UAE</text>"));
    let svg = w.render_svg_at(ms(2600));
    assert!(svg.contains(">UAE</text>"));
    assert!(!svg.contains(">USA</text>"));
    assert!(w.render_svg_at(ms(4300)).contains(">USA</text>"));
    assert!(!w.render_svg_at(ms(6250)).contains(">UAE</text>"));
}

#[test]
fn widget_without_atlas_still_draws_overlays() {
    let w = MapWidget::new(WidgetConfig::default(), None).unwrap();
    assert!(w.layout().regions.is_empty());
    let svg = w.render_svg_at(ms(5000));
    assert_eq!(svg.matches("stroke-dasharray").count(), 2);
}

#[test]
fn rendered_frames_match_the_canvas() {
    let w = widget();
    let frame = w.render_frame_at(ms(5000), &Rasterizer::new(None)).unwrap();
    assert_eq!((frame.width, frame.height), (1200, 800));
    // Top-left corner is background.
    assert_eq!(frame.pixel(0, 0), Some([0x0a, 0x0f, 0x1d, 255]));
}

#[test]
fn mount_outside_a_runtime_is_an_error() {
    assert!(widget().mount().is_err());
}

#[tokio::test(start_paused = true)]
async fn mounted_widget_waits_for_visibility() {
    let w = widget();
    let mounted = w.mount().unwrap();
    mounted.report_visibility(0.1);
    tokio::time::sleep(ms(5000)).await;

    let scene = mounted.scene();
    assert_eq!(scene.map, w.schedule().config().map_from);
    assert_eq!(mounted.highlight().len(), 1);
    assert!(mounted.is_running());

    assert!(matches!(
        mounted.unmount().await,
        Some(RunOutcome::Cancelled { steps: 0 })
    ));
}

#[tokio::test(start_paused = true)]
async fn mounted_widget_animates_once_visible() {
    let w = widget();
    let mounted = w.mount().unwrap();
    mounted.report_visibility(0.6);
    tokio::time::sleep(ms(3000)).await;

    assert_eq!(
        mounted.highlight().entries(),
        [RegionCode::new("IND"), RegionCode::new("ARE")]
    );
    let scene = mounted.scene();
    assert_eq!(scene.map, w.schedule().config().map_to);
    assert_eq!(scene.lines[0].fraction, 1.0);
    assert_eq!(scene.labels[0], 1.0);
    assert!(mounted.render_svg().contains(">UAE</text>"));

    assert!(matches!(
        mounted.unmount().await,
        Some(RunOutcome::Cancelled { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn loop_limit_ends_the_live_run() {
    let w = widget();
    let mut mounted = w.mount_with(MountOptions { loop_limit: Some(1) }).unwrap();
    mounted.report_visibility(1.0);
    assert_eq!(
        mounted.finished().await,
        Some(RunOutcome::Completed { steps: 10 })
    );
    assert!(!mounted.is_running());
    let elapsed = mounted.elapsed();
    assert!(elapsed >= ms(800 + 5500) && elapsed < ms(800 + 5500 + 10), "{elapsed:?}");
}

#[test]
fn short_legs_do_not_cut_the_previous_fill_fade() {
    let mut config = WidgetConfig::default();
    config.timing.draw_ms = 200;
    config.timing.label_ms = 100;
    let w = MapWidget::new(config, Some(&atlas())).unwrap();
    let are = w
        .layout()
        .regions
        .iter()
        .position(|r| r.codes.contains(&RegionCode::new("ARE")))
        .unwrap();

    // ARE is appended at 1000ms, USA at 1300ms; the 500ms ARE fade is still running.
    let fill = w.scene_at(ms(1350)).fills[are];
    let style = &w.config().style;
    assert_ne!(fill, style.highlight);
    assert_ne!(fill, style.land);
    assert_eq!(w.scene_at(ms(1500)).fills[are], style.highlight);
}
