use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "layerbake", version, about)]
struct Cli {
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every frame of a layout as a numbered PNG sequence.
    Render(RenderArgs),
    /// Render a single composited frame as a PNG.
    Frame(FrameArgs),
    /// Print canvas geometry and per-layer sources as JSON.
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PivotArg {
    Center,
    TopLeft,
}

impl From<PivotArg> for layerbake::Pivot {
    fn from(p: PivotArg) -> Self {
        match p {
            PivotArg::Center => Self::Center,
            PivotArg::TopLeft => Self::TopLeft,
        }
    }
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Rotation pivot.
    #[arg(long, value_enum, default_value_t = PivotArg::Center)]
    pivot: PivotArg,
}

#[derive(Parser, Debug)]
struct FrameCountArgs {
    /// Force the total frame count instead of the longest source loop.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    frames: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Layout JSON.
    layout: PathBuf,

    /// Output directory (created if missing).
    out_dir: PathBuf,

    #[command(flatten)]
    common: LayoutArgs,

    #[command(flatten)]
    count: FrameCountArgs,

    /// Output file name prefix.
    #[arg(long, default_value = "frame_")]
    prefix: String,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    threads: Option<u64>,

    /// Frames per parallel batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Layout JSON.
    layout: PathBuf,

    /// Frame index (0-based, sampled cyclically).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    common: LayoutArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Layout JSON.
    layout: PathBuf,

    #[command(flatten)]
    common: LayoutArgs,

    #[command(flatten)]
    count: FrameCountArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn export_opts(common: &LayoutArgs, frames: Option<u64>) -> layerbake::ExportOpts {
    layerbake::ExportOpts {
        frames,
        pivot: common.pivot.into(),
        ..layerbake::ExportOpts::default()
    }
}

fn open_session(
    layout: &std::path::Path,
    opts: layerbake::ExportOpts,
) -> anyhow::Result<layerbake::ExportSession> {
    let layout = layerbake::Layout::from_path(layout)?;
    Ok(layerbake::ExportSession::new(&layout, opts)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = layerbake::ExportOpts {
        parallel: args.parallel,
        threads: args.threads.map(|n| n as usize),
        chunk_size: args.chunk_size,
        ..export_opts(&args.common, args.count.frames)
    };
    let mut sess = open_session(&args.layout, opts)?;

    let sink_opts = layerbake::PngSequenceOpts {
        prefix: args.prefix,
        ..layerbake::PngSequenceOpts::default()
    };
    let mut sink = layerbake::PngSequenceSink::new(&args.out_dir, sink_opts);
    let stats = sess.export(&mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_written,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut sess = open_session(&args.layout, export_opts(&args.common, None))?;
    let frame = sess.render_frame(layerbake::FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    frame
        .to_straight_image()
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let sess = open_session(&args.layout, export_opts(&args.common, args.count.frames))?;
    let report = serde_json::json!({
        "bbox": sess.bbox(),
        "canvas": sess.geometry(),
        "total_frames": sess.total_frames(),
        "layers": sess.layers(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
