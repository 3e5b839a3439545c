use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrubreel::{
    FrameRGBA, FsFrameLoader, LoadDispatcher, Preloader, ScrollHeight, ScrollMetrics,
    ScrollerOpts, SequenceConfig, SequenceScroller, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrubreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preload a sequence and print a JSON readiness report.
    Probe(ProbeArgs),
    /// Render the pinned box for one scroll position as a PNG.
    Frame(FrameArgs),
    /// Sweep the container top to bottom, writing one PNG per step.
    Scrub(ScrubArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory frame paths resolve against (defaults to the config's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Override loader threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Seconds to wait for every frame to settle.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Container top relative to the viewport top, in pixels (negative once scrolled past).
    #[arg(long, allow_hyphen_values = true)]
    top: f64,

    /// Container height: pixels, `<n>px` or `<n>vh`.
    #[arg(long, default_value = "400vh")]
    height: ScrollHeight,

    /// Viewport as `WxH`.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Viewport,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Container height: pixels, `<n>px` or `<n>vh`.
    #[arg(long, default_value = "400vh")]
    height: ScrollHeight,

    /// Viewport as `WxH`.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Viewport,

    /// Number of evenly spaced scroll positions.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Output directory for `step_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    Viewport::parse(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
    }
}

struct Loaded {
    config: SequenceConfig,
    opts: ScrollerOpts,
    loader: Arc<FsFrameLoader>,
    dispatcher: LoadDispatcher,
    timeout: Duration,
}

fn load_source(args: &SourceArgs, height: ScrollHeight) -> anyhow::Result<Loaded> {
    let config = SequenceConfig::from_path(&args.config)?;
    let root = match &args.assets {
        Some(dir) => dir.clone(),
        None => args
            .config
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let opts = ScrollerOpts {
        height,
        load_threads: args.threads,
        ..ScrollerOpts::default()
    };
    Ok(Loaded {
        config,
        loader: Arc::new(FsFrameLoader::new(root)),
        dispatcher: opts.dispatcher()?,
        opts,
        timeout: Duration::from_secs(args.timeout),
    })
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let src = load_source(&args.source, ScrollerOpts::default().height)?;
    let mut preloader = Preloader::new();
    preloader.start(src.config, src.loader, &src.dispatcher);
    preloader.wait_settled(src.timeout)?;

    let report = serde_json::to_string_pretty(&preloader.snapshot())?;
    println!("{report}");
    Ok(())
}

fn ready_scroller(src: Loaded, viewport: Viewport) -> anyhow::Result<SequenceScroller> {
    let mut scroller = SequenceScroller::from_opts(src.config, &src.opts, Vec::new());
    scroller.set_viewport(viewport);
    scroller.start(src.loader, &src.dispatcher);
    scroller.preloader_mut().wait_settled(src.timeout)?;
    scroller.tick()?;
    Ok(scroller)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let src = load_source(&args.source, args.height)?;
    let mut scroller = ready_scroller(src, args.viewport)?;

    let height = scroller.height().resolve(args.viewport);
    let metrics = ScrollMetrics::new(args.top, height, args.viewport);
    scroller.handle_scroll(metrics)?;
    let frame = scroller.compose(args.viewport)?;
    write_png(&args.out, &frame)?;

    eprintln!(
        "wrote {} (frame {})",
        args.out.display(),
        scroller.current_frame()
    );
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 1, "--steps must be >= 1");
    let src = load_source(&args.source, args.height)?;
    let mut scroller = ready_scroller(src, args.viewport)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let height = scroller.height().resolve(args.viewport);
    let span = (height - f64::from(args.viewport.height)).max(0.0);
    for step in 0..args.steps {
        let t = if args.steps == 1 {
            0.0
        } else {
            f64::from(step) / f64::from(args.steps - 1)
        };
        scroller.handle_scroll(ScrollMetrics::new(-span * t, height, args.viewport))?;
        let frame = scroller.compose(args.viewport)?;
        let out = args.out_dir.join(format!("step_{step:04}.png"));
        write_png(&out, &frame)?;
        tracing::info!(step, frame = scroller.current_frame(), "wrote {}", out.display());
    }

    eprintln!("wrote {} steps to {}", args.steps, args.out_dir.display());
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
