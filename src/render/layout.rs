use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Layout {
    /// Pitch across the width, every dot on the center line.
    #[default]
    Line,
    /// Pitch class across the width, one row per octave, low octaves at the
    /// bottom.
    Octaves,
    /// Pitch across the width, height picked by a hash of pitch and seed.
    Scatter { seed: u64 },
}

/// Canvas coordinates for a pitch. Depends only on the pitch and the
/// layout, never on the piece being rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub layout: Layout,
}

const OCTAVES: f64 = 11.0;

fn spread(fraction: f64, length: u32) -> f64 {
    let length = length as f64;
    let margin = length * 0.05;
    margin + fraction * (length - 2.0 * margin)
}

fn mix(seed: u64, pitch: u8) -> u64 {
    // splitmix64 finalizer
    let mut z = seed ^ (pitch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Placement {
    pub fn position(&self, pitch: u8) -> (f64, f64) {
        let across = (pitch as f64 + 0.5) / 128.0;
        match self.layout {
            Layout::Line => (spread(across, self.width), self.height as f64 / 2.0),
            Layout::Octaves => {
                let column = ((pitch % 12) as f64 + 0.5) / 12.0;
                let row = (pitch / 12) as f64;
                let up = (OCTAVES - row - 0.5) / OCTAVES;
                (spread(column, self.width), spread(up, self.height))
            }
            Layout::Scatter { seed } => {
                let unit = (mix(seed, pitch) >> 11) as f64 / (1u64 << 53) as f64;
                (spread(across, self.width), spread(unit, self.height))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(layout: Layout) -> Placement {
        Placement {
            width: 1280,
            height: 720,
            layout,
        }
    }

    #[test]
    fn higher_pitch_is_further_right() {
        let line = placement(Layout::Line);
        let (low, y) = line.position(40);
        let (high, _) = line.position(80);
        assert!(low < high);
        assert_eq!(y, 360.0);
    }

    #[test]
    fn positions_stay_on_canvas() {
        for layout in [Layout::Line, Layout::Octaves, Layout::Scatter { seed: 99 }] {
            let placement = placement(layout);
            for pitch in 0..=127u8 {
                let (x, y) = placement.position(pitch);
                assert!((0.0..1280.0).contains(&x), "x {} for pitch {}", x, pitch);
                assert!((0.0..720.0).contains(&y), "y {} for pitch {}", y, pitch);
            }
        }
    }

    #[test]
    fn same_pitch_same_position() {
        let a = placement(Layout::Scatter { seed: 7 });
        let b = placement(Layout::Scatter { seed: 7 });
        for pitch in 0..=127u8 {
            assert_eq!(a.position(pitch), b.position(pitch));
            assert_eq!(a.position(pitch), a.position(pitch));
        }
    }

    #[test]
    fn scatter_seed_moves_dots() {
        let a = placement(Layout::Scatter { seed: 1 });
        let b = placement(Layout::Scatter { seed: 2 });
        let moved = (0..=127u8).filter(|&p| a.position(p) != b.position(p)).count();
        assert!(moved > 100);
    }

    #[test]
    fn octaves_share_columns() {
        let grid = placement(Layout::Octaves);
        let (c4_x, c4_y) = grid.position(60);
        let (c5_x, c5_y) = grid.position(72);
        assert_eq!(c4_x, c5_x);
        assert!(c5_y < c4_y);
    }
}
