use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotfade::{Config, CounterConfig, EncoderConfig, Layout, TrackSelector, TrailConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Render a MIDI track as a video of fading dots")]
struct Cli {
    /// Log per-track and per-frame details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the video
    Render(RenderArgs),
    /// Print note count, ranges and duration of a track
    Inspect(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Standard MIDI file
    input: PathBuf,

    /// RON config file, flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Track index
    #[arg(short, long, conflicts_with = "track_name")]
    track: Option<usize>,

    /// Track name, as stored in the track name meta event
    #[arg(long)]
    track_name: Option<String>,

    /// Only use notes on this channel (0-15)
    #[arg(long)]
    channel: Option<u8>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Line,
    Octaves,
    Scatter,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output video, or a directory with --png-sequence
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    /// Seconds each dot takes to fade out
    #[arg(long)]
    fade: Option<f64>,

    /// Canvas size, e.g. 1920x1080
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Seconds of video before the first note
    #[arg(long)]
    lead_in: Option<f64>,

    /// Seconds of video after the last note ends
    #[arg(long)]
    tail: Option<f64>,

    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Seed for the scatter layout
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Leave a permanent marker for every note played
    #[arg(long)]
    trail: bool,

    /// Show a running note count drawn with this font
    #[arg(long, value_name = "FONT")]
    counter: Option<PathBuf>,

    /// Write numbered png frames instead of running ffmpeg
    #[arg(long)]
    png_sequence: bool,

    /// ffmpeg executable
    #[arg(long)]
    ffmpeg: Option<String>,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", value))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok((w, h))
}

impl InputArgs {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        config.input = self.input.clone();
        if let Some(index) = self.track {
            config.track = TrackSelector::Index(index);
        }
        if let Some(name) = &self.track_name {
            config.track = TrackSelector::Name(name.clone());
        }
        if self.channel.is_some() {
            config.channel = self.channel;
        }
        Ok(config)
    }
}

impl RenderArgs {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = self.input.config()?;
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(fade) = self.fade {
            config.fade_seconds = fade;
        }
        if let Some((width, height)) = self.size {
            config.width = width;
            config.height = height;
        }
        if let Some(lead_in) = self.lead_in {
            config.lead_in = lead_in;
        }
        if let Some(tail) = self.tail {
            config.tail = tail;
        }
        if let Some(layout) = self.layout {
            config.layout = match layout {
                LayoutArg::Line => Layout::Line,
                LayoutArg::Octaves => Layout::Octaves,
                LayoutArg::Scatter => Layout::Scatter { seed: self.seed },
            };
        }
        if self.trail && config.trail.is_none() {
            config.trail = Some(TrailConfig::default());
        }
        if let Some(font) = &self.counter {
            let counter = config.counter.get_or_insert_with(CounterConfig::default);
            counter.font = font.clone();
        }
        if self.png_sequence {
            config.encoder = EncoderConfig::PngSequence;
        }
        if let (Some(program), EncoderConfig::Ffmpeg { program: current, .. }) =
            (&self.ffmpeg, &mut config.encoder)
        {
            *current = program.clone();
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dotfade=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => {
            let config = args.config()?;
            let summary = dotfade::run(&config)?;
            tracing::info!(
                notes = summary.notes,
                frames = summary.frames,
                seconds = summary.seconds,
                "wrote {}",
                config.output.display()
            );
        }
        Command::Inspect(args) => {
            let config = args.config()?;
            let report = dotfade::inspect(&config)?;
            println!("{}", report);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
