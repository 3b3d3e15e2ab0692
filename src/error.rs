use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid MIDI file: {0}")]
    Malformed(#[from] midly::Error),
    #[error("SMPTE timecode timing is not supported, only ticks per beat")]
    UnsupportedTiming,
    #[error("header declares zero ticks per beat")]
    ZeroTicksPerBeat,
    #[error("track {0} not found")]
    TrackNotFound(String),
    #[error("no notes on channel {channel} in track {track}")]
    ChannelNotFound { track: String, channel: u8 },
    #[error("track {0} contains no notes")]
    NoNotes(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Syntax(String),
    #[error("fps must be at least 1, got {0}")]
    Fps(u32),
    #[error("fade_seconds must be positive and finite, got {0}")]
    Fade(f64),
    #[error("canvas must be at least 1x1 pixels, got {0}x{1}")]
    Canvas(u32, u32),
    #[error("{name} must be a non-negative number of seconds, got {value}")]
    Padding { name: &'static str, value: f64 },
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("channel must be within 0..=15, got {0}")]
    Channel(u8),
    #[error("the yuv420p pixel format needs an even canvas size, got {0}x{1}")]
    OddCanvas(u32, u32),
    #[error("ffmpeg arguments must contain the {0} placeholder")]
    MissingPlaceholder(&'static str),
    #[error("failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a TrueType or OpenType font")]
    Font(PathBuf),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("video writer is not open")]
    NotOpen,
    #[error("video writer is already open")]
    AlreadyOpen,
    #[error("video writer is already closed")]
    Closed,
    #[error("frame {got} arrived after frame {last}, frames must be strictly increasing")]
    OutOfOrder { last: u64, got: u64 },
    #[error("frame {index} is {got_width}x{got_height}, the stream is {width}x{height}")]
    DimensionMismatch {
        index: u64,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    #[error("failed to start encoder {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("encoder exited with {status}, see {log}")]
    EncoderExited { status: String, log: PathBuf },
    #[error("failed to write frame data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
