use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use routeglow::{
    Atlas, Fps, FrameIndex, MapWidget, MountOptions, Rasterizer, RunOutcome, WidgetConfig,
};

#[derive(Parser, Debug)]
#[command(name = "routeglow", version, about = "Animated world route map renderer")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one instant of the timeline as PNG or SVG.
    Frame(FrameArgs),
    /// Render a range of the timeline as numbered PNG files.
    Frames(FramesArgs),
    /// Run the live timeline in real time, logging every target request.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct WidgetArgs {
    /// World geometry (GeoJSON FeatureCollection or TopoJSON Topology).
    #[arg(long)]
    geometry: Option<PathBuf>,

    /// Widget config JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra directory of .ttf/.otf/.ttc fonts for text rendering.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Milliseconds since activation.
    #[arg(long)]
    at_ms: u64,

    /// Output path; `.svg` writes the SVG document, anything else a PNG.
    #[arg(long)]
    out: PathBuf,

    /// Render the pre-activation state instead of `--at-ms`.
    #[arg(long, default_value_t = false)]
    idle: bool,

    #[command(flatten)]
    widget: WidgetArgs,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[arg(long, default_value_t = 0)]
    from_ms: u64,

    /// End of the range (exclusive).
    #[arg(long)]
    to_ms: u64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    widget: WidgetArgs,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Stop after this many loop iterations (runs until Ctrl-C otherwise).
    #[arg(long)]
    loops: Option<u64>,

    /// Write the live scene as SVG when playback stops.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(flatten)]
    widget: WidgetArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_filter = match cli.cmd {
        Command::Play(_) => "routeglow=debug",
        _ => "routeglow=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_widget(args: &WidgetArgs) -> anyhow::Result<MapWidget> {
    let config = match &args.config {
        Some(path) => WidgetConfig::from_path(path)
            .with_context(|| format!("load widget config '{}'", path.display()))?,
        None => WidgetConfig::default(),
    };
    let atlas = match &args.geometry {
        Some(path) => Some(Atlas::load(path)?),
        None => {
            tracing::warn!("no --geometry given; rendering without country outlines");
            None
        }
    };
    Ok(MapWidget::new(config, atlas.as_ref())?)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let widget = load_widget(&args.widget)?;
    let scene = if args.idle {
        widget.idle_scene()
    } else {
        widget.scene_at(Duration::from_millis(args.at_ms))
    };
    let svg = widget.render_svg(&scene);

    ensure_parent(&args.out)?;
    if is_svg(&args.out) {
        std::fs::write(&args.out, svg)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    } else {
        let raster = Rasterizer::new(args.widget.font_dir.as_deref());
        raster.render(&svg)?.save_png(&args.out)?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.to_ms > args.from_ms, "--to-ms must be greater than --from-ms");
    if args.threads == Some(0) {
        anyhow::bail!("--threads must be >= 1 when set");
    }
    let fps = Fps::new(args.fps, 1)?;
    let widget = load_widget(&args.widget)?;
    let raster = Rasterizer::new(args.widget.font_dir.as_deref());

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let start = Duration::from_millis(args.from_ms);
    let count = fps.frames_in(Duration::from_millis(args.to_ms - args.from_ms));

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build rayon thread pool")?;

    tracing::info!(count, fps = args.fps, "rendering frame range");
    pool.install(|| {
        (0..count).into_par_iter().try_for_each_init(
            || raster.clone(),
            |raster, i| -> anyhow::Result<()> {
                let at = start + fps.frame_time(FrameIndex(i));
                let path = args.out_dir.join(format!("frame_{i:05}.png"));
                widget.render_frame_at(at, raster)?.save_png(&path)?;
                Ok(())
            },
        )
    })?;

    eprintln!("wrote {count} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let widget = load_widget(&args.widget)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(async {
        let mut mounted = widget.mount_with(MountOptions {
            loop_limit: args.loops,
        })?;
        mounted.report_visibility(1.0);

        let outcome = tokio::select! {
            outcome = mounted.finished() => outcome,
            _ = tokio::signal::ctrl_c() => None,
        };

        if let Some(path) = &args.snapshot {
            ensure_parent(path)?;
            std::fs::write(path, mounted.render_svg())
                .with_context(|| format!("write svg '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }

        let outcome = match outcome {
            Some(outcome) => Some(outcome),
            None => mounted.unmount().await,
        };
        match outcome {
            Some(RunOutcome::Completed { steps }) => eprintln!("played {steps} steps"),
            Some(RunOutcome::Cancelled { steps }) => eprintln!("stopped after {steps} steps"),
            Some(RunOutcome::GateClosed) | None => eprintln!("stopped"),
        }
        Ok(())
    })
}
