use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gifavatar::{
    FrameIndex, MotionStyle, RenderJob, Rgb8, SampleCtx, StrokeConfig, TimingConfig,
};

#[derive(Parser, Debug)]
#[command(name = "gifavatar", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a looping GIF avatar from a cutout image.
    Render(RenderArgs),
    /// Render a single frame of the deterministic animation as a PNG.
    Frame(FrameArgs),
    /// Draw an outline around a cutout and write it as a PNG.
    Stroke(StrokeArgs),
    /// Print the sampled transform of a style at one instant as JSON.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Render job JSON; defaults are used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Cutout image (PNG, WebP, ...).
    #[arg(long)]
    image: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Override the job's motion style.
    #[arg(long, value_parser = parse_style)]
    style: Option<MotionStyle>,

    /// Capture a live, sampler-driven surface in real time instead of synthesizing frames.
    #[arg(long, default_value_t = false)]
    live: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Render job JSON; defaults are used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Cutout image.
    #[arg(long)]
    image: PathBuf,

    /// Frame index (0-based, lead-in included).
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct StrokeArgs {
    /// Cutout image.
    #[arg(long)]
    image: PathBuf,

    /// Outline thickness in pixels.
    #[arg(long, default_value_t = 8)]
    weight: u32,

    /// Outline color (`#rgb` or `#rrggbb`).
    #[arg(long, default_value = "#ffffff")]
    color: Rgb8,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Motion style name.
    #[arg(long, value_parser = parse_style)]
    style: MotionStyle,

    /// Seconds since the cycle started (lead-in included).
    #[arg(long)]
    t: f64,

    /// Frames per second.
    #[arg(long, default_value_t = gifavatar::DEFAULT_FPS)]
    fps: u32,

    /// Cycle length in seconds.
    #[arg(long, default_value_t = gifavatar::DEFAULT_TOTAL_DURATION_SECS)]
    total: f64,

    /// Frozen lead-in in seconds.
    #[arg(long, default_value_t = gifavatar::DEFAULT_STILL_LEAD_SECS)]
    lead: f64,

    /// Output frame edge length in pixels.
    #[arg(long, default_value_t = gifavatar::DEFAULT_FRAME_PX)]
    size: u32,
}

fn parse_style(s: &str) -> Result<MotionStyle, String> {
    MotionStyle::parse_strict(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Stroke(args) => cmd_stroke(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn load_job(in_path: Option<&Path>) -> anyhow::Result<RenderJob> {
    let job = match in_path {
        Some(p) => RenderJob::from_path(p)?,
        None => RenderJob::default(),
    };
    Ok(job)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut job = load_job(args.in_path.as_deref())?;
    if let Some(style) = args.style {
        job.style = style;
    }
    if args.parallel {
        job.threading.parallel = true;
    }
    if args.threads.is_some() {
        job.threading.threads = args.threads;
    }

    let source = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;
    let encoded = if args.live {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("build tokio runtime")?;
        rt.block_on(gifavatar::render_avatar_live(&source, &job))?
    } else {
        gifavatar::render_avatar(&source, &job)?
    };

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &encoded.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {} ms/frame)",
        args.out.display(),
        encoded.frame_count,
        encoded.frame_delay_ms
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = load_job(args.in_path.as_deref())?;
    job.validate()?;
    let img = gifavatar::decode_source_path(&args.image)?;
    let sprite = gifavatar::prepare_sprite(&img, &job.transform, &job.stroke)?;
    let frame = job.scene(&sprite).render_frame(FrameIndex(args.index))?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_stroke(args: StrokeArgs) -> anyhow::Result<()> {
    let img = gifavatar::decode_source_path(&args.image)?;
    let stroked = gifavatar::apply_stroke(&img, &StrokeConfig::new(args.weight, args.color))?;

    ensure_parent_dir(&args.out)?;
    stroked
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        stroked.width(),
        stroked.height()
    );
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let timing = TimingConfig {
        fps: args.fps,
        total_duration_secs: args.total,
        still_lead_secs: args.lead,
    };
    timing.validate()?;
    let ctx = SampleCtx::new(&timing, args.size);
    let tr = gifavatar::sample(args.style, args.t, &ctx);
    println!("{}", serde_json::to_string(&tr)?);
    Ok(())
}
