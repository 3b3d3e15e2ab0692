use std::fs;
use std::path::{Path, PathBuf};

use image::Rgb;
use rusttype::Font;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::midi::{NoteStats, TrackSelector};
use crate::render::{CounterStyle, Layout, Palette, Placement, RenderSettings, TrailStyle};
use crate::video::{DEFAULT_ARGS, REQUIRED_ARGS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    pub radius: f64,
    pub color: [u8; 3],
    pub alpha: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            color: [128, 128, 128],
            alpha: 1.0,
        }
    }
}

/// Zero padded count of the notes played, centered on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// TrueType or OpenType font file.
    pub font: PathBuf,
    pub size: f32,
    pub color: [u8; 3],
    pub digits: usize,
    /// Seconds from the first frame until the counter is fully opaque.
    pub fade_in_seconds: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            font: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf"),
            size: 64.0,
            color: [255, 255, 255],
            digits: 5,
            fade_in_seconds: 4.25,
        }
    }
}

impl CounterConfig {
    fn load(&self) -> Result<CounterStyle, ConfigError> {
        let data = fs::read(&self.font).map_err(|source| ConfigError::FontRead {
            path: self.font.clone(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| ConfigError::Font(self.font.clone()))?;
        Ok(CounterStyle {
            font,
            size: self.size,
            color: Rgb(self.color),
            digits: self.digits,
            fade_in: self.fade_in_seconds,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncoderConfig {
    Ffmpeg { program: String, args: Vec<String> },
    /// `output` is a directory that receives one png per frame.
    PngSequence,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig::Ffmpeg {
            program: "ffmpeg".to_string(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub track: TrackSelector,
    pub channel: Option<u8>,
    pub fps: u32,
    pub fade_seconds: f64,
    pub width: u32,
    pub height: u32,
    /// Seconds rendered before the first MIDI tick.
    pub lead_in: f64,
    /// Seconds rendered after the last note is released.
    pub tail: f64,
    pub background: [u8; 3],
    pub dot_radius: f64,
    /// Brightness of the quietest note, 0..=1.
    pub min_brightness: f64,
    pub layout: Layout,
    pub trail: Option<TrailConfig>,
    pub counter: Option<CounterConfig>,
    pub encoder: EncoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("dotfade.mp4"),
            track: TrackSelector::default(),
            channel: None,
            fps: 30,
            fade_seconds: 1.0,
            width: 1280,
            height: 720,
            lead_in: 0.0,
            tail: 0.0,
            background: [0, 0, 0],
            dot_radius: 6.0,
            min_brightness: 0.2,
            layout: Layout::default(),
            trail: None,
            counter: None,
            encoder: EncoderConfig::default(),
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

fn check_padding(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Padding { name, value })
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ron_string = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&ron_string)
    }

    pub fn from_ron(ron_string: &str) -> Result<Self, ConfigError> {
        ron::from_str(ron_string).map_err(|e| ConfigError::Syntax(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Syntax(e.to_string()))
    }

    /// Checks only what note extraction needs.
    pub fn validate_input(&self) -> Result<(), ConfigError> {
        match self.channel {
            Some(channel) if channel > 15 => Err(ConfigError::Channel(channel)),
            _ => Ok(()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Fps(self.fps));
        }
        if !(self.fade_seconds.is_finite() && self.fade_seconds > 0.0) {
            return Err(ConfigError::Fade(self.fade_seconds));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Canvas(self.width, self.height));
        }
        check_padding("lead_in", self.lead_in)?;
        check_padding("tail", self.tail)?;
        check_range("dot_radius", self.dot_radius, 0.0, f64::MAX)?;
        check_range("min_brightness", self.min_brightness, 0.0, 1.0)?;
        if let Some(trail) = &self.trail {
            check_range("trail.radius", trail.radius, 0.0, f64::MAX)?;
            check_range("trail.alpha", trail.alpha, 0.0, 1.0)?;
        }
        if let Some(counter) = &self.counter {
            check_range("counter.size", counter.size as f64, 1.0, 4096.0)?;
            check_padding("counter.fade_in_seconds", counter.fade_in_seconds)?;
        }
        self.validate_input()?;
        if let EncoderConfig::Ffmpeg { args, .. } = &self.encoder {
            for &required in REQUIRED_ARGS {
                if !args.iter().any(|arg| arg.contains(required)) {
                    return Err(ConfigError::MissingPlaceholder(required));
                }
            }
            let chroma_subsampled = args.iter().any(|arg| arg == "yuv420p");
            if chroma_subsampled && (self.width % 2 != 0 || self.height % 2 != 0) {
                return Err(ConfigError::OddCanvas(self.width, self.height));
            }
        }
        Ok(())
    }

    /// Loads the counter font, if any.
    pub fn render_settings(&self, stats: &NoteStats) -> Result<RenderSettings, ConfigError> {
        let counter = self.counter.as_ref().map(CounterConfig::load).transpose()?;
        Ok(RenderSettings {
            fps: self.fps,
            fade_seconds: self.fade_seconds,
            width: self.width,
            height: self.height,
            lead_in: self.lead_in,
            background: Rgb(self.background),
            dot_radius: self.dot_radius,
            palette: Palette {
                pitch_range: stats.pitch_range,
                velocity_range: stats.velocity_range,
                min_brightness: self.min_brightness,
            },
            placement: Placement {
                width: self.width,
                height: self.height,
                layout: self.layout.clone(),
            },
            trail: self.trail.as_ref().map(|trail| TrailStyle {
                radius: trail.radius,
                color: Rgb(trail.color),
                alpha: trail.alpha,
            }),
            counter,
        })
    }

    /// Seconds of MIDI time the video has to cover: until the last note is
    /// released and the last dot has faded out.
    pub fn piece_seconds(&self, stats: &NoteStats) -> f64 {
        stats.end_time.max(stats.last_onset + self.fade_seconds)
    }

    /// `ceil((lead_in + piece_seconds + tail) * fps)`, never zero.
    pub fn frame_count(&self, stats: &NoteStats) -> u64 {
        let seconds = self.lead_in + self.piece_seconds(stats) + self.tail;
        ((seconds * self.fps as f64).ceil() as u64).max(1)
    }
}
