use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gifweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an animated GIF from still images.
    Build(BuildArgs),
    /// Print the frame/duration plan without encoding anything.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Input manifest JSON (items are added before any --image).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Image to append, optionally with a hold duration in ms (`photo.png:1500`).
    #[arg(long = "image", value_name = "PATH[:MS]")]
    images: Vec<String>,

    /// Canvas width (overrides the manifest).
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (overrides the manifest).
    #[arg(long)]
    height: Option<u32>,

    /// Frames per fade and cross-fade (overrides the manifest).
    #[arg(long)]
    steps: Option<u32>,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Palette quantization speed, 1 (best) to 30 (fastest).
    #[arg(long, default_value_t = 10)]
    speed: i32,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Emit the plan as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_image_arg(arg: &str) -> anyhow::Result<(PathBuf, u32)> {
    if let Some((path, ms)) = arg.rsplit_once(':')
        && !path.is_empty()
        && !ms.is_empty()
        && ms.bytes().all(|b| b.is_ascii_digit())
    {
        let ms: u32 = ms
            .parse()
            .with_context(|| format!("parse hold duration in '{arg}'"))?;
        return Ok((PathBuf::from(path), ms));
    }
    Ok((PathBuf::from(arg), gifweave::DEFAULT_HOLD_MS))
}

fn load_sources(src: &SourceArgs) -> anyhow::Result<(gifweave::Sequence, gifweave::ExportOpts)> {
    let loader = gifweave::FsImageLoader;
    let (mut seq, mut opts, mut rejected) = match &src.in_path {
        Some(path) => {
            let manifest = gifweave::Manifest::load(path)?;
            let (seq, rejected) = manifest.to_sequence(&loader);
            (seq, manifest.export_opts(), rejected)
        }
        None => (
            gifweave::Sequence::new(),
            gifweave::ExportOpts::default(),
            Vec::new(),
        ),
    };

    for arg in &src.images {
        let (path, hold_ms) = parse_image_arg(arg)?;
        if let Err(err) = seq.add(&path, hold_ms) {
            rejected.push(err);
        }
    }
    for err in &rejected {
        eprintln!("skipped: {err}");
    }

    if let Some(w) = src.width {
        opts.canvas.width = w;
    }
    if let Some(h) = src.height {
        opts.canvas.height = h;
    }
    if let Some(s) = src.steps {
        opts.transition_steps = s;
    }
    opts.validate()?;
    Ok((seq, opts))
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let (seq, export) = load_sources(&args.src)?;
    let opts = gifweave::RenderToGifOpts {
        export,
        gif: gifweave::GifSinkOpts {
            overwrite: !args.no_overwrite,
            speed: args.speed,
        },
    };

    let stats = gifweave::render_to_gif(&seq, &gifweave::FsImageLoader, &args.out, opts)
        .with_context(|| format!("build gif '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} images, {} frames, {} ms)",
        args.out.display(),
        stats.sources,
        stats.frames,
        stats.total_ms
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (seq, opts) = load_sources(&args.src)?;
    let segments = gifweave::plan(seq.items(), opts.transition_steps)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    let frames: u64 = segments.iter().map(|s| u64::from(s.frames)).sum();
    let total_ms: u64 = segments.iter().map(gifweave::Segment::total_ms).sum();
    println!(
        "canvas {}x{}, {} steps, {} frames, {} ms",
        opts.canvas.width, opts.canvas.height, opts.transition_steps, frames, total_ms
    );
    for seg in &segments {
        let label = match seg.kind {
            gifweave::SegmentKind::FadeIn => "fade in".to_string(),
            gifweave::SegmentKind::Hold { item } => {
                format!("hold {}", seq.items()[item].display_name)
            }
            gifweave::SegmentKind::CrossFade { from } => format!(
                "cross-fade {} -> {}",
                seq.items()[from].display_name,
                seq.items()[from + 1].display_name
            ),
            gifweave::SegmentKind::FadeOut => "fade out".to_string(),
        };
        println!("  {label:<40} {:>4} x {:>6} ms", seg.frames, seg.frame_ms);
    }
    Ok(())
}
