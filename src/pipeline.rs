use std::fmt;

use crate::config::{Config, EncoderConfig};
use crate::error::{EncodeError, Result};
use crate::midi::{self, NoteEvent, NoteStats, pitch_name};
use crate::render::{RenderSettings, Renderer};
use crate::video::{Encoder, FfmpegEncoder, PngSequenceEncoder, VideoWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub notes: usize,
    pub frames: u64,
    pub seconds: f64,
}

/// Renders `frame_count` frames in order and streams them into `encoder`.
pub fn render_to<E: Encoder>(
    notes: &[NoteEvent],
    settings: RenderSettings,
    frame_count: u64,
    encoder: E,
) -> Result<(), EncodeError> {
    let fps = settings.fps;
    let size = (settings.width, settings.height);
    let mut renderer = Renderer::new(notes, settings);
    let mut writer = VideoWriter::create(encoder, fps, size)?;

    let step = (frame_count / 10).max(1);
    for index in 0..frame_count {
        let frame = renderer.render(index);
        writer.write(&frame)?;

        let done = index + 1;
        if done % step == 0 || done == frame_count {
            tracing::info!(
                frame = done,
                total = frame_count,
                "rendered {}%",
                done * 100 / frame_count
            );
        }
    }

    writer.close()
}

fn encoder_for(config: &Config) -> Box<dyn Encoder> {
    match &config.encoder {
        EncoderConfig::Ffmpeg { program, args } => Box::new(FfmpegEncoder::new(
            program.clone(),
            args.clone(),
            config.output.clone(),
        )),
        EncoderConfig::PngSequence => Box::new(PngSequenceEncoder::new(config.output.clone())),
    }
}

/// Validate, extract, render and encode. Nothing is rendered unless the
/// config and the MIDI input are both valid.
pub fn run(config: &Config) -> Result<Summary> {
    config.validate()?;
    let notes = midi::extract(&config.input, &config.track, config.channel)?;
    let stats = NoteStats::from_notes(&notes);
    let settings = config.render_settings(&stats)?;
    let frames = config.frame_count(&stats);

    tracing::info!(
        notes = notes.len(),
        frames,
        fps = config.fps,
        width = config.width,
        height = config.height,
        output = %config.output.display(),
        "rendering"
    );
    for note in &notes {
        tracing::trace!(
            onset = note.onset,
            duration = note.duration,
            velocity = note.velocity,
            "note {}",
            note.name()
        );
    }

    render_to(&notes, settings, frames, encoder_for(config))?;

    Ok(Summary {
        notes: notes.len(),
        frames,
        seconds: frames as f64 / config.fps as f64,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stats: NoteStats,
    pub first_onset: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.stats.pitch_range;
        let (quiet, loud) = self.stats.velocity_range;
        writeln!(f, "Note count: {}", self.stats.count)?;
        writeln!(
            f,
            "Pitch range: {} - {} ({} - {})",
            low,
            high,
            pitch_name(low),
            pitch_name(high)
        )?;
        writeln!(f, "Velocity range: {} - {}", quiet, loud)?;
        writeln!(f, "First onset: {:.3}s", self.first_onset)?;
        writeln!(f, "Last onset: {:.3}s", self.stats.last_onset)?;
        write!(f, "Total time: {:.3}s", self.stats.end_time)
    }
}

pub fn inspect(config: &Config) -> Result<Report> {
    config.validate_input()?;
    let notes = midi::extract(&config.input, &config.track, config.channel)?;
    Ok(Report {
        stats: NoteStats::from_notes(&notes),
        first_onset: notes.first().map_or(0.0, |n| n.onset),
    })
}
