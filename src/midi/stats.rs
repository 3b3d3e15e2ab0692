use super::note::NoteEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteStats {
    pub count: usize,
    pub pitch_range: (u8, u8),
    pub velocity_range: (u8, u8),
    pub last_onset: f64,
    /// Latest note release, the musical length of the piece.
    pub end_time: f64,
}

impl NoteStats {
    pub fn from_notes(notes: &[NoteEvent]) -> Self {
        if notes.is_empty() {
            return Self {
                count: 0,
                pitch_range: (0, 127),
                velocity_range: (0, 127),
                last_onset: 0.0,
                end_time: 0.0,
            };
        }

        let min_pitch = notes.iter().map(|n| n.pitch).min().unwrap_or(0);
        let max_pitch = notes.iter().map(|n| n.pitch).max().unwrap_or(127);
        let min_velocity = notes.iter().map(|n| n.velocity).min().unwrap_or(0);
        let max_velocity = notes.iter().map(|n| n.velocity).max().unwrap_or(127);
        let last_onset = notes.iter().map(|n| n.onset).fold(0.0, f64::max);
        let end_time = notes.iter().map(|n| n.end()).fold(0.0, f64::max);

        Self {
            count: notes.len(),
            pitch_range: (min_pitch, max_pitch),
            velocity_range: (min_velocity, max_velocity),
            last_onset,
            end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(onset: f64, pitch: u8, velocity: u8, duration: f64) -> NoteEvent {
        NoteEvent {
            onset,
            pitch,
            velocity,
            duration,
            channel: 0,
        }
    }

    #[test]
    fn collects_ranges() {
        let notes = vec![
            note(0.0, 60, 100, 2.0),
            note(0.5, 48, 30, 0.1),
            note(1.0, 84, 64, 0.5),
        ];
        let stats = NoteStats::from_notes(&notes);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.pitch_range, (48, 84));
        assert_eq!(stats.velocity_range, (30, 100));
        assert_eq!(stats.last_onset, 1.0);
        assert_eq!(stats.end_time, 2.0);
    }

    #[test]
    fn empty_uses_full_ranges() {
        let stats = NoteStats::from_notes(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.pitch_range, (0, 127));
        assert_eq!(stats.end_time, 0.0);
    }
}
