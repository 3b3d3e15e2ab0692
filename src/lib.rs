pub mod config;
pub mod error;
pub mod midi;
pub mod pipeline;
pub mod render;
pub mod video;

pub use config::{Config, CounterConfig, EncoderConfig, TrailConfig};
pub use error::{ConfigError, EncodeError, Error, ParseError, Result};
pub use midi::{NoteEvent, NoteStats, TrackSelector, extract, extract_from_bytes};
pub use pipeline::{Report, Summary, inspect, render_to, run};
pub use render::{Frame, Layout, RenderSettings, Renderer, render};
pub use video::{Encoder, FfmpegEncoder, PngSequenceEncoder, VideoWriter};
