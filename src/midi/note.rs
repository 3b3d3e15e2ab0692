const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    /// Seconds from the start of the piece.
    pub onset: f64,
    pub pitch: u8,
    pub velocity: u8,
    /// Seconds, 0 when the note was never released.
    pub duration: f64,
    pub channel: u8,
}

impl NoteEvent {
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }

    pub fn name(&self) -> String {
        pitch_name(self.pitch)
    }
}

/// Scientific pitch notation, middle C (60) is "C4".
pub fn pitch_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[(pitch % 12) as usize], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_pitches() {
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(61), "C#4");
        assert_eq!(pitch_name(0), "C-1");
        assert_eq!(pitch_name(127), "G9");
    }

    #[test]
    fn end_adds_duration() {
        let note = NoteEvent {
            onset: 1.25,
            pitch: 69,
            velocity: 90,
            duration: 0.5,
            channel: 0,
        };
        assert_eq!(note.end(), 1.75);
        assert_eq!(note.name(), "A4");
    }
}
