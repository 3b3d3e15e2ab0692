use midly::{MetaMessage, TrackEvent, TrackEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    /// Also produced by a note on with velocity 0.
    NoteOff { channel: u8, pitch: u8 },
    Tempo { micros_per_beat: u32 },
    TrackName(String),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedMessage {
    pub delta_ticks: u32,
    pub message: MidiMessage,
}

impl MidiMessage {
    pub fn decode(kind: &TrackEventKind) -> Self {
        match kind {
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    midly::MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        MidiMessage::NoteOn {
                            channel,
                            pitch: key.as_int(),
                            velocity: vel.as_int(),
                        }
                    }
                    midly::MidiMessage::NoteOn { key, .. }
                    | midly::MidiMessage::NoteOff { key, .. } => MidiMessage::NoteOff {
                        channel,
                        pitch: key.as_int(),
                    },
                    _ => MidiMessage::Other,
                }
            }
            TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => MidiMessage::Tempo {
                micros_per_beat: tempo.as_int(),
            },
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                MidiMessage::TrackName(String::from_utf8_lossy(name).trim().to_string())
            }
            _ => MidiMessage::Other,
        }
    }
}

pub fn decode_track(track: &[TrackEvent]) -> Vec<TimedMessage> {
    track
        .iter()
        .map(|event| TimedMessage {
            delta_ticks: event.delta.as_int(),
            message: MidiMessage::decode(&event.kind),
        })
        .collect()
}

pub fn track_name(messages: &[TimedMessage]) -> Option<&str> {
    messages.iter().find_map(|m| match &m.message {
        MidiMessage::TrackName(name) => Some(name.as_str()),
        _ => None,
    })
}
