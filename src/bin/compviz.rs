use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use compviz::{
    Canvas, Fps, FrameIndex, FrameRange, Rasterizer, Scene, SceneKind, Theme, pipeline,
};

#[derive(Parser, Debug)]
#[command(name = "compviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in scenes and their durations.
    List(CommonArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Write the SVG document for a single frame.
    Svg(SvgArgs),
    /// Render a scene to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Dump the baked scene (units and keyframes) as JSON.
    Dump(DumpArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneChoice {
    AstGeneration,
    IdentifyBasicBlocks,
    BuildBasicBlocks,
    FinalCfg,
    BlockMerging,
}

impl From<SceneChoice> for SceneKind {
    fn from(choice: SceneChoice) -> Self {
        match choice {
            SceneChoice::AstGeneration => SceneKind::AstGeneration,
            SceneChoice::IdentifyBasicBlocks => SceneKind::IdentifyBasicBlocks,
            SceneChoice::BuildBasicBlocks => SceneKind::BuildBasicBlocks,
            SceneChoice::FinalCfg => SceneKind::FinalCfg,
            SceneChoice::BlockMerging => SceneKind::BlockMerging,
        }
    }
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,
}

impl CommonArgs {
    fn build(&self, choice: SceneChoice) -> anyhow::Result<Scene> {
        let fps = Fps::new(self.fps, 1)?;
        let canvas = Canvas {
            width: self.width,
            height: self.height,
        };
        let kind: SceneKind = choice.into();
        Ok(kind.build(fps, canvas, &Theme::default())?)
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene to render.
    #[arg(long, value_enum)]
    scene: SceneChoice,

    /// Frame index (0-based).
    #[arg(long, conflicts_with = "last")]
    frame: Option<u64>,

    /// Render the final frame (still-image output).
    #[arg(long)]
    last: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Scene to render.
    #[arg(long, value_enum)]
    scene: SceneChoice,

    /// Frame index (0-based).
    #[arg(long, conflicts_with = "last")]
    frame: Option<u64>,

    /// Use the final frame.
    #[arg(long)]
    last: bool,

    /// Output SVG path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene to render.
    #[arg(long, value_enum)]
    scene: SceneChoice,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); the scene end when omitted.
    #[arg(long)]
    end: Option<u64>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Scene to dump.
    #[arg(long, value_enum)]
    scene: SceneChoice,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Render(args) => cmd_render(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn pick_frame(scene: &Scene, frame: Option<u64>, last: bool) -> anyhow::Result<FrameIndex> {
    match (frame, last) {
        (Some(f), false) => Ok(FrameIndex(f)),
        (None, true) => Ok(FrameIndex(scene.duration.0 - 1)),
        (None, false) => anyhow::bail!("pass either --frame <N> or --last"),
        (Some(_), true) => unreachable!("clap rejects --frame with --last"),
    }
}

fn cmd_list(args: CommonArgs) -> anyhow::Result<()> {
    for choice in [
        SceneChoice::AstGeneration,
        SceneChoice::IdentifyBasicBlocks,
        SceneChoice::BuildBasicBlocks,
        SceneChoice::FinalCfg,
        SceneChoice::BlockMerging,
    ] {
        let scene = args.build(choice)?;
        println!(
            "{:24} {:5} frames  {:6.2}s  {} units",
            scene.name,
            scene.duration.0,
            scene.len_secs(),
            scene.units.len()
        );
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = args.common.build(args.scene)?;
    let frame = pick_frame(&scene, args.frame, args.last)?;
    let rasterizer = Rasterizer::new();
    pipeline::render_png(&scene, frame, &rasterizer, &Theme::default(), &args.out)?;
    println!("wrote '{}'", args.out.display());
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let scene = args.common.build(args.scene)?;
    let frame = pick_frame(&scene, args.frame, args.last)?;
    let svg = pipeline::render_svg(&scene, frame, &Theme::default())?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, svg)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("wrote '{}'", path.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = args.common.build(args.scene)?;
    let end = args.end.unwrap_or(scene.duration.0);
    let range = FrameRange::new(FrameIndex(args.start), FrameIndex(end))?;
    let rasterizer = Rasterizer::new();
    pipeline::render_to_mp4(&scene, range, &rasterizer, &Theme::default(), &args.out)?;
    println!("wrote '{}'", args.out.display());
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let scene = args.common.build(args.scene)?;
    let json = serde_json::to_string_pretty(&scene).context("serialize scene")?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("wrote '{}'", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
