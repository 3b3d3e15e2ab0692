use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use midly::{Smf, Timing};
use serde::{Deserialize, Serialize};

use super::message::{MidiMessage, TimedMessage, decode_track, track_name};
use super::note::NoteEvent;
use crate::error::ParseError;

pub const DEFAULT_MICROS_PER_BEAT: u32 = 500_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackSelector {
    Index(usize),
    Name(String),
}

impl Default for TrackSelector {
    fn default() -> Self {
        TrackSelector::Index(0)
    }
}

impl fmt::Display for TrackSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSelector::Index(index) => write!(f, "#{}", index),
            TrackSelector::Name(name) => write!(f, "{:?}", name),
        }
    }
}

/// Constant tempo used for the whole piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    pub micros_per_beat: u32,
    pub ticks_per_beat: u16,
}

impl Tempo {
    /// Last tempo event in file order wins; later changes are not honored
    /// piecewise.
    pub fn scan(tracks: &[Vec<TimedMessage>], ticks_per_beat: u16) -> Self {
        let mut seen: Vec<u32> = Vec::new();
        for message in tracks.iter().flatten() {
            if let MidiMessage::Tempo { micros_per_beat } = message.message {
                seen.push(micros_per_beat);
            }
        }

        let micros_per_beat = seen.last().copied().unwrap_or(DEFAULT_MICROS_PER_BEAT);
        if seen.iter().any(|&t| t != micros_per_beat) {
            tracing::warn!(
                tempo_events = seen.len(),
                micros_per_beat,
                "file changes tempo, using the last tempo for the whole piece"
            );
        }

        Tempo {
            micros_per_beat,
            ticks_per_beat,
        }
    }

    pub fn seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.micros_per_beat as f64 / 1_000_000.0 / self.ticks_per_beat as f64
    }

    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_beat as f64
    }
}

struct OpenNote {
    onset_tick: u64,
    velocity: u8,
    order: usize,
}

struct ClosedNote {
    onset_tick: u64,
    end_tick: u64,
    channel: u8,
    pitch: u8,
    velocity: u8,
    order: usize,
}

/// Pairs note on/off messages. Returns notes in onset order, with ticks
/// still absolute.
fn pair_notes(messages: &[TimedMessage], channel: Option<u8>) -> Vec<ClosedNote> {
    let mut open: HashMap<(u8, u8), OpenNote> = HashMap::new();
    let mut closed = Vec::new();
    let mut tick = 0u64;
    let mut order = 0usize;

    for timed in messages {
        tick += timed.delta_ticks as u64;
        match timed.message {
            MidiMessage::NoteOn {
                channel: ch,
                pitch,
                velocity,
            } if channel.is_none_or(|c| c == ch) => {
                // last onset wins, an unreleased earlier onset is dropped
                open.insert(
                    (ch, pitch),
                    OpenNote {
                        onset_tick: tick,
                        velocity,
                        order,
                    },
                );
                order += 1;
            }
            MidiMessage::NoteOff { channel: ch, pitch } if channel.is_none_or(|c| c == ch) => {
                if let Some(note) = open.remove(&(ch, pitch)) {
                    closed.push(ClosedNote {
                        onset_tick: note.onset_tick,
                        end_tick: tick,
                        channel: ch,
                        pitch,
                        velocity: note.velocity,
                        order: note.order,
                    });
                }
            }
            _ => {}
        }
    }

    for ((ch, pitch), note) in open {
        closed.push(ClosedNote {
            onset_tick: note.onset_tick,
            end_tick: note.onset_tick,
            channel: ch,
            pitch,
            velocity: note.velocity,
            order: note.order,
        });
    }

    // order follows file order of the note on, so it is also onset order
    closed.sort_by_key(|note| note.order);
    closed
}

fn select_track<'a>(
    tracks: &'a [Vec<TimedMessage>],
    selector: &TrackSelector,
) -> Result<&'a [TimedMessage], ParseError> {
    let found = match selector {
        TrackSelector::Index(index) => tracks.get(*index),
        TrackSelector::Name(name) => tracks
            .iter()
            .find(|track| track_name(track) == Some(name.trim())),
    };
    found
        .map(|track| track.as_slice())
        .ok_or_else(|| ParseError::TrackNotFound(selector.to_string()))
}

pub fn extract_from_bytes(
    bytes: &[u8],
    selector: &TrackSelector,
    channel: Option<u8>,
) -> Result<Vec<NoteEvent>, ParseError> {
    let smf = Smf::parse(bytes)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(..) => return Err(ParseError::UnsupportedTiming),
    };
    if ticks_per_beat == 0 {
        return Err(ParseError::ZeroTicksPerBeat);
    }

    let tracks: Vec<Vec<TimedMessage>> = smf.tracks.iter().map(|t| decode_track(t)).collect();
    let tempo = Tempo::scan(&tracks, ticks_per_beat);
    let track = select_track(&tracks, selector)?;
    tracing::debug!(
        track = %selector,
        name = track_name(track).unwrap_or(""),
        messages = track.len(),
        bpm = tempo.bpm(),
        ticks_per_beat,
        "decoded track"
    );

    let closed = pair_notes(track, channel);
    if closed.is_empty() {
        return Err(match channel {
            Some(channel) => ParseError::ChannelNotFound {
                track: selector.to_string(),
                channel,
            },
            None => ParseError::NoNotes(selector.to_string()),
        });
    }

    Ok(closed
        .into_iter()
        .map(|note| {
            let onset = tempo.seconds(note.onset_tick);
            NoteEvent {
                onset,
                pitch: note.pitch,
                velocity: note.velocity,
                duration: tempo.seconds(note.end_tick) - onset,
                channel: note.channel,
            }
        })
        .collect())
}

pub fn extract(
    path: &Path,
    selector: &TrackSelector,
    channel: Option<u8>,
) -> Result<Vec<NoteEvent>, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let notes = extract_from_bytes(&bytes, selector, channel)?;
    tracing::info!(path = %path.display(), notes = notes.len(), "extracted notes");
    Ok(notes)
}
