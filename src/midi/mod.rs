mod extract;
mod message;
mod note;
mod stats;

pub use extract::{DEFAULT_MICROS_PER_BEAT, Tempo, TrackSelector, extract, extract_from_bytes};
pub use message::{MidiMessage, TimedMessage, decode_track, track_name};
pub use note::{NoteEvent, pitch_name};
pub use stats::NoteStats;
