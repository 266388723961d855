use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kinema", version)]
struct Cli {
    /// Log more (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of the timeline as a PNG.
    Frame(FrameArgs),
    /// Render every frame as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Skip the extra frame showing the settled scene.
    #[arg(long, default_value_t = false)]
    no_final_frame: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Background used to flatten transparent pixels, as a hex colour.
    #[arg(long, default_value = "#000000")]
    bg: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(in_path: &std::path::Path) -> anyhow::Result<kinema::Script> {
    let mut engine = kinema::TextLayoutEngine::new();
    kinema::Script::from_path(in_path, &mut engine)
        .with_context(|| format!("load scene script '{}'", in_path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let script = load(&args.in_path)?;
    let frame = script.render_frame(kinema::CpuBackend::default(), kinema::FrameIndex(args.frame))?;

    kinema::ensure_parent_dir(&args.out)?;
    kinema::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let script = load(&args.in_path)?;
    let sink = kinema::PngSequenceSink::new(&args.out_dir);
    let stats = script.run(kinema::CpuBackend::default(), sink, !args.no_final_frame)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let bg = kinema::Rgba8::parse(&args.bg)
        .with_context(|| format!("invalid --bg colour '{}'", args.bg))?;
    let script = load(&args.in_path)?;

    let sink = kinema::FfmpegSink::new(kinema::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        background: bg,
    });
    let stats = script.run(kinema::CpuBackend::default(), sink, true)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}
